//! End-to-end run: load or download the GenBank file, pick the record,
//! select the flanking proteins and write them out.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use flank_core::{extract_proteins, Extraction, Record};
use flank_entrez::{fetch_genbank_text, EntrezApi, EntrezClient};
use flank_formats::detect::{detect_format, detect_format_from_extension};
use flank_formats::{fasta, genbank, FileFormat};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::report::RunReport;

/// Run with a live NCBI client, created only if a download is needed.
pub fn run(settings: &Settings) -> Result<Extraction> {
    run_with(settings, || {
        let client = EntrezClient::new(settings.entrez_config())?;
        Ok(Box::new(client) as Box<dyn EntrezApi>)
    })
}

/// Run with the E-utilities backend produced by `connect`.
pub fn run_with<F>(settings: &Settings, connect: F) -> Result<Extraction>
where
    F: FnOnce() -> Result<Box<dyn EntrezApi>>,
{
    let records = load_records(settings, connect)?;
    let record = select_record(&records, settings.record_name())?;
    info!(
        record = %record.name,
        length = record.len(),
        features = record.features.len(),
        "Selected record"
    );

    let extraction = extract_proteins(
        record,
        &settings.locus_tags,
        settings.flank,
        settings.missing_translation,
    )
    .with_context(|| format!("Failed to extract proteins from {}", record.name))?;

    let output = settings.output_path();
    write_fasta(&output, &extraction, settings.line_width)?;
    info!(
        "Wrote {} proteins in window {} to {}",
        extraction.proteins.len(),
        extraction.window,
        output.display()
    );

    if let Some(path) = &settings.report {
        RunReport::new(settings, &extraction).write(path)?;
        debug!(path = %path.display(), "Wrote run report");
    }

    Ok(extraction)
}

/// Parse the local GenBank file, downloading it first when it is missing or
/// `refresh` is set.
pub fn load_records<F>(settings: &Settings, connect: F) -> Result<Vec<Record>>
where
    F: FnOnce() -> Result<Box<dyn EntrezApi>>,
{
    let path = settings.genbank_path();

    let text = if path.is_file() && !settings.refresh {
        info!(path = %path.display(), "Reading GenBank file");
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read GenBank file {}", path.display()))?
    } else {
        info!(accession = %settings.accession, "Downloading GenBank records from NCBI");
        let api = connect().context("Failed to create NCBI client")?;
        let text = fetch_genbank_text(api.as_ref(), &settings.accession, settings.retmax)
            .with_context(|| format!("Failed to download {}", settings.accession))?;
        save_download(&path, &text)?;
        text
    };

    let format = detect_format(&text);
    if format != FileFormat::GenBank {
        bail!("{} is not a GenBank file (detected {:?})", path.display(), format);
    }

    let records = genbank::parse_records(&text)
        .with_context(|| format!("Failed to parse GenBank file {}", path.display()))?;
    debug!(count = records.len(), "Parsed GenBank records");
    Ok(records)
}

fn save_download(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to save {}", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "Saved GenBank file");
    Ok(())
}

/// The record whose LOCUS name is `name`.
pub fn select_record<'a>(records: &'a [Record], name: &str) -> Result<&'a Record> {
    records.iter().find(|r| r.name == name).ok_or_else(|| {
        let available: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        anyhow!(
            "Record '{}' not found; available records: {}",
            name,
            available.join(", ")
        )
    })
}

fn write_fasta(path: &Path, extraction: &Extraction, line_width: usize) -> Result<()> {
    if detect_format_from_extension(path) != FileFormat::Fasta {
        warn!(path = %path.display(), "Output file does not have a FASTA extension");
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    fasta::write_proteins(&extraction.proteins, BufWriter::new(file), line_width)
        .with_context(|| format!("Failed to write {}", path.display()))
}
