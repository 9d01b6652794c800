//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use flank_core::TranslationPolicy;

/// Extract every protein encoded within a flanking window around an operon.
///
/// Reads a local GenBank file when present, otherwise downloads the assembly's
/// INSDC sequences from NCBI and keeps a copy next to the output.
#[derive(Parser, Debug, Default)]
#[command(name = "operon-flank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Assembly accession to search for [default: AE016877.1]
    #[arg(short, long)]
    pub accession: Option<String>,

    /// LOCUS name of the record to scan [default: accession without version]
    #[arg(long)]
    pub record_name: Option<String>,

    /// Local GenBank file; downloaded here when missing [default: <accession>.gb]
    #[arg(short, long)]
    pub genbank: Option<PathBuf>,

    /// Protein FASTA output [default: <accession>.faa]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Locus tag of an operon member; repeat for each gene
    #[arg(short = 't', long = "locus-tag", value_name = "TAG")]
    pub locus_tags: Vec<String>,

    /// Bases to extend the window on each side of the operon [default: 10000]
    #[arg(short, long)]
    pub flank: Option<usize>,

    /// Maximum number of assembly search hits [default: 1]
    #[arg(long)]
    pub retmax: Option<usize>,

    /// Handling of CDS features without a /translation [default: require]
    #[arg(long, value_name = "POLICY")]
    pub missing_translation: Option<TranslationPolicy>,

    /// Residues per FASTA line [default: 60]
    #[arg(long)]
    pub line_width: Option<usize>,

    /// Write a JSON summary of the run
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Download again even if the GenBank file exists
    #[arg(long)]
    pub refresh: bool,

    /// TOML settings file [default: ./operon-flank.toml if present]
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Contact email sent to NCBI
    #[arg(long, env = "NCBI_EMAIL")]
    pub email: Option<String>,

    /// NCBI API key; raises the request rate limit
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// E-utilities base URL
    #[arg(long, env = "NCBI_EUTILS_URL", hide = true)]
    pub eutils_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
