//! Flat-file readers and writers: GenBank records in, protein FASTA out.

pub mod detect;
pub mod fasta;
pub mod genbank;
pub mod location;

use flank_core::Record;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    GenBank,
    Fasta,
    /// Recognised but not readable
    Embl,
    Unknown,
}

/// Read every record from GenBank or FASTA text.
pub fn parse_file(content: &str) -> Result<Vec<Record>, ParseError> {
    let format = detect::detect_format(content);
    match format {
        FileFormat::GenBank => genbank::parse_records(content),
        FileFormat::Fasta => fasta::parse(content),
        FileFormat::Embl | FileFormat::Unknown => Err(ParseError::InvalidFormat(format!(
            "cannot read {format:?} input"
        ))),
    }
}
