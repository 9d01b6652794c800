use flank_core::{
    feature::{Feature, FeatureType, Qualifier},
    record::{Record, Topology},
};
use tracing::debug;

use crate::location::parse_location;
use crate::ParseError;

/// Column where qualifier and location continuation text begins.
const FEATURE_INDENT: &str = "                     ";

/// Parse the first record of a GenBank flat file.
pub fn parse(input: &str) -> Result<Record, ParseError> {
    parse_records(input)?
        .into_iter()
        .next()
        .ok_or(ParseError::UnexpectedEnd)
}

/// Parse every record in a GenBank flat file. Records are separated by `//`.
pub fn parse_records(input: &str) -> Result<Vec<Record>, ParseError> {
    let lines: Vec<&str> = input.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("LOCUS") {
            let record = parse_record(&lines, &mut i)?;
            debug!(
                name = %record.name,
                length = record.len(),
                features = record.features.len(),
                "Parsed GenBank record"
            );
            records.push(record);
        } else {
            i += 1;
        }
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No LOCUS line found in GenBank input".to_string(),
        ));
    }

    Ok(records)
}

/// Header value: everything after the 12-column keyword field.
fn field_value(line: &str) -> &str {
    line.get(12..).unwrap_or("").trim()
}

fn is_continuation(line: &str) -> bool {
    line.starts_with("            ")
}

fn parse_record(lines: &[&str], i: &mut usize) -> Result<Record, ParseError> {
    let mut rec = Record::new("", "", Topology::Linear);
    parse_locus_line(lines[*i], &mut rec);
    *i += 1;

    while *i < lines.len() {
        let line = lines[*i];

        if line.starts_with("//") {
            *i += 1;
            return Ok(rec);
        } else if line.starts_with("LOCUS") {
            // next record started without a terminator
            return Err(ParseError::InvalidFormat(format!(
                "Record {} is missing its // terminator",
                rec.name
            )));
        } else if line.starts_with("DEFINITION") {
            let mut def = field_value(line).to_string();
            *i += 1;
            while *i < lines.len() && is_continuation(lines[*i]) {
                def.push(' ');
                def.push_str(lines[*i].trim());
                *i += 1;
            }
            rec.description = def.trim_end_matches('.').to_string();
            continue;
        } else if line.starts_with("ACCESSION") {
            rec.accession = field_value(line).split_whitespace().next().map(String::from);
        } else if line.starts_with("VERSION") {
            rec.version = field_value(line).split_whitespace().next().map(String::from);
        } else if line.starts_with("KEYWORDS") {
            rec.metadata.keywords = Some(field_value(line).to_string());
        } else if line.starts_with("SOURCE") {
            rec.metadata.source = Some(field_value(line).to_string());
            *i += 1;
            if *i < lines.len() && lines[*i].trim_start().starts_with("ORGANISM") {
                rec.metadata.organism = Some(lines[*i].trim_start()[8..].trim().to_string());
                *i += 1;
            }
            // Skip taxonomy lines
            while *i < lines.len() && is_continuation(lines[*i]) {
                *i += 1;
            }
            continue;
        } else if line.starts_with("FEATURES") {
            *i += 1;
            parse_features(lines, i, &mut rec.features)?;
            continue;
        } else if line.starts_with("ORIGIN") {
            *i += 1;
            rec.sequence = parse_origin(lines, i);
            continue;
        }

        *i += 1;
    }

    Err(ParseError::UnexpectedEnd)
}

fn parse_locus_line(line: &str, rec: &mut Record) {
    // LOCUS       name    length bp    type    topology    division    date
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.len() >= 2 {
        rec.name = parts[1].to_string();
    }

    if parts.len() >= 4 && matches!(parts[3], "bp" | "aa") {
        rec.metadata.declared_length = parts[2].parse().ok();
    }

    for part in &parts {
        match *part {
            "circular" => rec.topology = Topology::Circular,
            "linear" => rec.topology = Topology::Linear,
            _ => {}
        }
    }

    for part in parts.iter().skip(2) {
        let lower = part.to_lowercase();
        if lower.contains("dna") || lower.contains("rna") {
            rec.metadata.molecule_type = Some(part.to_string());
            break;
        }
    }

    // Division is the three-letter code following the topology
    if let Some(idx) = parts.iter().position(|p| matches!(*p, "linear" | "circular")) {
        if let Some(div) = parts.get(idx + 1) {
            if div.len() == 3 && div.chars().all(|c| c.is_ascii_uppercase()) {
                rec.metadata.division = Some(div.to_string());
            }
        }
    }

    // Date is last, DD-MMM-YYYY
    if let Some(last) = parts.last() {
        if last.contains('-') && last.len() >= 9 {
            rec.metadata.date = Some(last.to_string());
        }
    }
}

fn parse_features(
    lines: &[&str],
    i: &mut usize,
    features: &mut Vec<Feature>,
) -> Result<(), ParseError> {
    while *i < lines.len() {
        let line = lines[*i];

        // Any line starting in column 1 ends the table (ORIGIN, CONTIG, BASE COUNT, //)
        if !line.starts_with(' ') && !line.is_empty() {
            break;
        }

        if line.len() > 5 && line.starts_with("     ") && !line[5..].starts_with(' ') {
            let body = &line[5..];
            let key = body.split_whitespace().next().unwrap_or_default().to_string();
            let mut location_str = body[key.len()..].trim().to_string();

            // Location continuation lines are concatenated without spaces
            *i += 1;
            while *i < lines.len()
                && lines[*i].starts_with(FEATURE_INDENT)
                && !lines[*i].trim_start().starts_with('/')
            {
                location_str.push_str(lines[*i].trim());
                *i += 1;
            }

            let qualifiers = parse_qualifiers(lines, i);

            let (location, strand) = parse_location(&location_str).map_err(|e| match e {
                ParseError::InvalidLocation(loc) => {
                    ParseError::InvalidLocation(format!("{key} feature at {loc}"))
                }
                other => other,
            })?;

            features.push(Feature {
                feature_type: FeatureType::from_genbank_key(&key),
                key,
                location,
                strand,
                qualifiers,
            });
        } else {
            *i += 1;
        }
    }

    Ok(())
}

fn parse_qualifiers(lines: &[&str], i: &mut usize) -> Vec<Qualifier> {
    let mut qualifiers = Vec::new();

    while *i < lines.len()
        && lines[*i].starts_with(FEATURE_INDENT)
        && lines[*i].trim_start().starts_with('/')
    {
        let qual_content = &lines[*i].trim()[1..]; // skip the /
        *i += 1;

        let Some(eq_pos) = qual_content.find('=') else {
            // Flag qualifier (no value)
            qualifiers.push(Qualifier {
                key: qual_content.to_string(),
                value: String::new(),
            });
            continue;
        };

        let key = qual_content[..eq_pos].to_string();
        let mut raw = qual_content[eq_pos + 1..].to_string();
        let quoted = raw.starts_with('"');

        // A quoted value runs until its quotes balance, even across lines
        // starting with '/'. Unquoted values stop at the next qualifier.
        while *i < lines.len() && lines[*i].starts_with(FEATURE_INDENT) {
            let next = lines[*i].trim();
            let open = quoted && raw.matches('"').count() % 2 == 1;
            if !open && (quoted || next.starts_with('/')) {
                break;
            }
            if key != "translation" {
                raw.push(' ');
            }
            raw.push_str(next);
            *i += 1;
        }

        let value = if quoted {
            unquote(&raw)
        } else {
            raw
        };
        qualifiers.push(Qualifier { key, value });
    }

    qualifiers
}

/// Strip the surrounding quotes and collapse `""` escapes.
fn unquote(raw: &str) -> String {
    let inner = raw.strip_prefix('"').unwrap_or(raw);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    inner.replace("\"\"", "\"")
}

fn parse_origin(lines: &[&str], i: &mut usize) -> String {
    let mut seq = String::new();

    while *i < lines.len() {
        let line = lines[*i];
        if line.starts_with("//") {
            break;
        }

        // Origin lines: "        1 atcgatcg atcgatcg ..."
        for ch in line.chars() {
            if ch.is_ascii_alphabetic() {
                seq.push(ch.to_ascii_uppercase());
            }
        }

        *i += 1;
    }

    seq
}
