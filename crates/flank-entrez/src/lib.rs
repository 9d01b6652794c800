//! NCBI Entrez access for operon-flank
//!
//! Resolves an accession to GenBank text through the E-utilities
//! esearch → elink → efetch chain.

pub mod client;
pub mod endpoints;
pub mod resolve;
pub mod types;

pub use client::{EntrezClient, EntrezConfig};
pub use resolve::{fetch_genbank_text, resolve_genbank, INSDC_LINK_NAME};
pub use types::LinkSetDb;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EntrezError>;

#[derive(Debug, Error)]
pub enum EntrezError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("E-utilities returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Failed to decode E-utilities response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("E-utilities error: {0}")]
    Api(String),
    #[error("No {db} entries found for '{term}'")]
    NoResults { db: String, term: String },
    #[error("No '{link_name}' links found")]
    LinkSetMissing { link_name: String },
    #[error("Link set '{link_name}' contains no ids")]
    EmptyLinkSet { link_name: String },
    #[error("Failed to parse fetched GenBank text: {0}")]
    Parse(#[from] flank_formats::ParseError),
}

impl EntrezError {
    /// Timeouts, connection failures, 429 and 5xx responses are retried.
    pub fn is_transient(&self) -> bool {
        match self {
            EntrezError::Http(e) => e.is_timeout() || e.is_connect(),
            EntrezError::Status { status, .. } => client::is_transient_status(*status),
            _ => false,
        }
    }
}

/// The three E-utilities calls the resolver needs.
///
/// Implemented by [`EntrezClient`] over HTTP; tests supply in-memory fakes.
pub trait EntrezApi {
    /// Search `db` for `term`, returning at most `retmax` UIDs.
    fn esearch(&self, db: &str, term: &str, retmax: usize) -> Result<Vec<String>>;

    /// Link `ids` in `dbfrom` to `db`, returning the link groups of the first link set.
    fn elink(&self, dbfrom: &str, db: &str, ids: &[String]) -> Result<Vec<LinkSetDb>>;

    /// Fetch one entry as text.
    fn efetch(&self, db: &str, id: &str, rettype: &str, retmode: &str) -> Result<String>;
}
