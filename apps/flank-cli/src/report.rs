//! JSON run summary written by `--report`.

use std::path::Path;

use anyhow::{Context, Result};
use flank_core::{Extraction, ProteinRecord, TranslationPolicy};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub accession: String,
    pub record_name: String,
    pub genbank: String,
    pub output: String,
    pub operon: Vec<String>,
    pub flank: usize,
    /// 1-based inclusive window bounds
    pub window_start: usize,
    pub window_end: usize,
    pub missing_translation: TranslationPolicy,
    pub protein_count: usize,
    pub proteins: Vec<ProteinSummary>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinSummary {
    pub locus_tag: String,
    pub protein_id: String,
    pub product: String,
    pub start: usize,
    pub end: usize,
    pub strand: i8,
    pub length_aa: usize,
    pub translated_locally: bool,
}

impl From<&ProteinRecord> for ProteinSummary {
    fn from(protein: &ProteinRecord) -> Self {
        Self {
            locus_tag: protein.id.clone(),
            protein_id: protein.name.clone(),
            product: protein.description.clone(),
            start: protein.start + 1,
            end: protein.end,
            strand: protein.strand.as_i8(),
            length_aa: protein.sequence.len(),
            translated_locally: protein.translated_locally,
        }
    }
}

impl RunReport {
    pub fn new(settings: &Settings, extraction: &Extraction) -> Self {
        Self {
            accession: settings.accession.clone(),
            record_name: extraction.record_name.clone(),
            genbank: settings.genbank_path().display().to_string(),
            output: settings.output_path().display().to_string(),
            operon: extraction.operon.clone(),
            flank: settings.flank,
            window_start: extraction.window.start + 1,
            window_end: extraction.window.end,
            missing_translation: settings.missing_translation,
            protein_count: extraction.proteins.len(),
            proteins: extraction.proteins.iter().map(ProteinSummary::from).collect(),
            skipped: extraction.skipped.clone(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write report {}", path.display()))
    }
}
