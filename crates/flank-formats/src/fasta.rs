use std::io::Write;

use flank_core::{
    extract::ProteinRecord,
    record::{Record, Topology},
};

use crate::ParseError;

/// Residues per line in written FASTA files.
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// Parse a FASTA format string into one or more records
pub fn parse(input: &str) -> Result<Vec<Record>, ParseError> {
    let mut records = Vec::new();
    let mut current_name: Option<String> = None;
    let mut current_desc: Option<String> = None;
    let mut current_seq = String::new();

    for line in input.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('>') {
            // Save previous record if exists
            if let Some(name) = current_name.take() {
                if !current_seq.is_empty() {
                    let mut rec =
                        Record::new(name, std::mem::take(&mut current_seq), Topology::Linear);
                    if let Some(desc) = current_desc.take() {
                        rec.description = desc;
                    }
                    records.push(rec);
                }
            }

            let parts: Vec<&str> = header.splitn(2, |c: char| c.is_whitespace()).collect();
            current_name = Some(parts[0].to_string());
            current_desc = parts.get(1).map(|s| s.trim().to_string());
            current_seq = String::new();
        } else if trimmed.starts_with(';') {
            // Comment line, skip
            continue;
        } else {
            current_seq.push_str(
                &trimmed
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic() || *c == '*')
                    .collect::<String>()
                    .to_uppercase(),
            );
        }
    }

    // Don't forget the last record
    if let Some(name) = current_name {
        if !current_seq.is_empty() {
            let mut rec = Record::new(name, current_seq, Topology::Linear);
            if let Some(desc) = current_desc {
                rec.description = desc;
            }
            records.push(rec);
        }
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA input".to_string(),
        ));
    }

    Ok(records)
}

/// Write one FASTA entry per protein: `>{locus_tag} {product}` followed by
/// the translation wrapped at `line_width` residues.
pub fn write_proteins<W: Write>(
    proteins: &[ProteinRecord],
    mut writer: W,
    line_width: usize,
) -> Result<(), ParseError> {
    let width = line_width.max(1);

    for protein in proteins {
        writeln!(writer, ">{}", title(protein))?;

        for chunk in protein.sequence.as_bytes().chunks(width) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Header text after `>`. A description that already starts with the id
/// is used on its own so the id is not written twice.
fn title(protein: &ProteinRecord) -> String {
    let first_word = protein.description.split_whitespace().next();
    if protein.description.is_empty() {
        protein.id.clone()
    } else if first_word == Some(protein.id.as_str()) {
        protein.description.clone()
    } else {
        format!("{} {}", protein.id, protein.description)
    }
}

/// Serialize proteins to a FASTA string
pub fn serialize(proteins: &[ProteinRecord], line_width: usize) -> Result<String, ParseError> {
    let mut out = Vec::new();
    write_proteins(proteins, &mut out, line_width)?;
    String::from_utf8(out).map_err(|e| ParseError::InvalidFormat(e.to_string()))
}
