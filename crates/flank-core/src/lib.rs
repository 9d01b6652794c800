pub mod codon;
pub mod extract;
pub mod feature;
pub mod operations;
pub mod record;
pub mod window;

pub use extract::*;
pub use feature::*;
pub use record::*;
pub use window::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Operon locus tags not found in record: {}", missing.join(", "))]
    OperonNotFound { missing: Vec<String> },
    #[error("CDS {locus_tag} has no /{qualifier} qualifier")]
    MissingQualifier { locus_tag: String, qualifier: String },
    #[error("CDS {locus_tag} has an invalid /{qualifier} value: {value}")]
    InvalidQualifier {
        locus_tag: String,
        qualifier: String,
        value: String,
    },
    #[error("Unsupported translation table: {0}")]
    UnsupportedCodonTable(u8),
    #[error("No nucleotide sequence available to translate CDS {locus_tag}")]
    NoSequence { locus_tag: String },
}

impl ExtractError {
    pub fn missing_qualifier(locus_tag: &str, qualifier: &str) -> Self {
        Self::MissingQualifier {
            locus_tag: locus_tag.to_string(),
            qualifier: qualifier.to_string(),
        }
    }
}
