//! Run settings
//!
//! Values are layered: built-in defaults, then a TOML file, then the
//! environment (through clap's `env` fallbacks), then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flank_core::TranslationPolicy;
use flank_entrez::EntrezConfig;
use flank_formats::fasta::DEFAULT_LINE_WIDTH;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Cli;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ACCESSION: &str = "AE016877.1";
pub const DEFAULT_LOCUS_TAGS: [&str; 4] = ["BC_3514", "BC_3515", "BC_3516", "BC_3517"];
pub const DEFAULT_FLANK: usize = 10_000;
pub const DEFAULT_RETMAX: usize = 1;

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "operon-flank.toml";

/// INSDC or assembly accession with an optional `.N` version.
const ACCESSION_PATTERN: &str = r"^(?P<base>[A-Z]{1,6}_?[0-9]+)(?:\.(?P<version>[0-9]+))?$";

/// Accession with its `.N` version suffix removed, e.g. `AE016877.1` → `AE016877`.
/// `None` when `accession` is not an accession.
pub fn unversioned(accession: &str) -> Result<Option<&str>> {
    let pattern = Regex::new(ACCESSION_PATTERN)?;
    Ok(pattern
        .captures(accession)
        .and_then(|c| c.name("base"))
        .map(|m| m.as_str()))
}

/// NCBI connection settings (`[ncbi]` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NcbiSettings {
    pub email: Option<String>,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for NcbiSettings {
    fn default() -> Self {
        let entrez = EntrezConfig::default();
        Self {
            email: None,
            api_key: None,
            base_url: entrez.base_url,
            timeout_secs: entrez.timeout_secs,
            max_retries: entrez.max_retries,
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub accession: String,
    /// Defaults to the accession without its version
    pub record_name: Option<String>,
    /// Defaults to `<accession>.gb`
    pub genbank: Option<PathBuf>,
    /// Defaults to `<accession>.faa`
    pub output: Option<PathBuf>,
    pub locus_tags: Vec<String>,
    pub flank: usize,
    pub retmax: usize,
    pub missing_translation: TranslationPolicy,
    pub line_width: usize,
    pub report: Option<PathBuf>,
    pub refresh: bool,
    pub ncbi: NcbiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accession: DEFAULT_ACCESSION.to_string(),
            record_name: None,
            genbank: None,
            output: None,
            locus_tags: DEFAULT_LOCUS_TAGS.iter().map(|s| s.to_string()).collect(),
            flank: DEFAULT_FLANK,
            retmax: DEFAULT_RETMAX,
            missing_translation: TranslationPolicy::default(),
            line_width: DEFAULT_LINE_WIDTH,
            report: None,
            refresh: false,
            ncbi: NcbiSettings::default(),
        }
    }
}

impl Settings {
    /// Resolve settings for `cli`: the `--config` file (which must exist) or
    /// `./operon-flank.toml` if present, overridden by flags and environment.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_cli(cli);
        settings.finalize()?;
        Ok(settings)
    }

    /// Read a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Override with every value given on the command line or in the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(accession) = &cli.accession {
            self.accession = accession.clone();
        }
        if let Some(name) = &cli.record_name {
            self.record_name = Some(name.clone());
        }
        if let Some(path) = &cli.genbank {
            self.genbank = Some(path.clone());
        }
        if let Some(path) = &cli.output {
            self.output = Some(path.clone());
        }
        if !cli.locus_tags.is_empty() {
            self.locus_tags = cli.locus_tags.clone();
        }
        if let Some(flank) = cli.flank {
            self.flank = flank;
        }
        if let Some(retmax) = cli.retmax {
            self.retmax = retmax;
        }
        if let Some(policy) = cli.missing_translation {
            self.missing_translation = policy;
        }
        if let Some(width) = cli.line_width {
            self.line_width = width;
        }
        if let Some(path) = &cli.report {
            self.report = Some(path.clone());
        }
        self.refresh |= cli.refresh;
        if let Some(email) = &cli.email {
            self.ncbi.email = Some(email.clone());
        }
        if let Some(key) = &cli.api_key {
            self.ncbi.api_key = Some(key.clone());
        }
        if let Some(url) = &cli.eutils_url {
            self.ncbi.base_url = url.clone();
        }
    }

    /// Check the layered values and fill in the record name.
    pub fn finalize(&mut self) -> Result<()> {
        let Some(base) = unversioned(&self.accession)? else {
            bail!("Invalid accession: '{}'", self.accession);
        };
        if self.record_name.is_none() {
            self.record_name = Some(base.to_string());
        }
        if self.locus_tags.is_empty() {
            bail!("At least one operon locus tag is required");
        }
        if self.line_width == 0 {
            bail!("Line width must be at least 1");
        }
        if self.retmax == 0 {
            bail!("retmax must be at least 1");
        }
        Ok(())
    }

    /// LOCUS name to select
    pub fn record_name(&self) -> &str {
        self.record_name.as_deref().unwrap_or(&self.accession)
    }

    pub fn genbank_path(&self) -> PathBuf {
        self.genbank
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.gb", self.accession)))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.faa", self.accession)))
    }

    pub fn entrez_config(&self) -> EntrezConfig {
        let mut config = EntrezConfig::new()
            .with_base_url(self.ncbi.base_url.clone())
            .with_timeout(self.ncbi.timeout_secs)
            .with_max_retries(self.ncbi.max_retries);
        if let Some(email) = &self.ncbi.email {
            config = config.with_email(email.clone());
        }
        if let Some(key) = &self.ncbi.api_key {
            config = config.with_api_key(key.clone());
        }
        config
    }
}
