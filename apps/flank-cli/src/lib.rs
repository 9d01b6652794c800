//! operon-flank
//!
//! Extracts every protein encoded within a flanking window around an operon
//! of a GenBank record and writes them as FASTA.

pub mod cli;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use cli::Cli;
pub use config::Settings;
pub use pipeline::{run, run_with};
