use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codon::CodonTable;
use crate::feature::{Feature, Strand};
use crate::operations::translate_cds;
use crate::record::Record;
use crate::window::{cds_with_locus_tag, select_in_window, OperonWindow};
use crate::ExtractError;

/// What to do with a CDS that has no `/translation` (typically a pseudogene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationPolicy {
    /// Every selected CDS must carry `/translation`, `/protein_id` and `/product`.
    #[default]
    Require,
    /// Drop CDS entries without `/translation`.
    Skip,
    /// Translate the nucleotides of CDS entries without `/translation`.
    Translate,
}

impl std::str::FromStr for TranslationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "require" => Ok(TranslationPolicy::Require),
            "skip" => Ok(TranslationPolicy::Skip),
            "translate" => Ok(TranslationPolicy::Translate),
            _ => Err(format!("invalid translation policy: {s}")),
        }
    }
}

impl std::fmt::Display for TranslationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationPolicy::Require => write!(f, "require"),
            TranslationPolicy::Skip => write!(f, "skip"),
            TranslationPolicy::Translate => write!(f, "translate"),
        }
    }
}

/// A protein ready to be written as one FASTA entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinRecord {
    /// `/locus_tag`
    pub id: String,
    /// `/protein_id`
    pub name: String,
    /// `/product`
    pub description: String,
    pub sequence: String,
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
    /// True when the sequence came from translating the nucleotides rather
    /// than from the `/translation` qualifier.
    #[serde(default)]
    pub translated_locally: bool,
}

impl ProteinRecord {
    /// Build from a locus-tagged CDS. `record` supplies the nucleotides when
    /// the policy asks for local translation. Returns `Ok(None)` when the
    /// feature is skipped.
    pub fn from_feature(
        feature: &Feature,
        record: &Record,
        policy: TranslationPolicy,
    ) -> Result<Option<Self>, ExtractError> {
        let id = feature.locus_tag().unwrap_or_default().to_string();

        let (sequence, translated_locally) = match (feature.get_qualifier("translation"), policy) {
            (Some(t), _) => (t.to_string(), false),
            (None, TranslationPolicy::Require) => {
                return Err(ExtractError::missing_qualifier(&id, "translation"))
            }
            (None, TranslationPolicy::Skip) => {
                warn!(locus_tag = %id, "CDS has no translation, skipping");
                return Ok(None);
            }
            (None, TranslationPolicy::Translate) => (translate_feature(feature, record)?, true),
        };

        let name = required_or_empty(feature, &id, "protein_id", policy)?;
        let description = required_or_empty(feature, &id, "product", policy)?;

        Ok(Some(Self {
            id,
            name,
            description,
            sequence,
            start: feature.start(),
            end: feature.end(),
            strand: feature.strand,
            translated_locally,
        }))
    }
}

fn required_or_empty(
    feature: &Feature,
    locus_tag: &str,
    key: &str,
    policy: TranslationPolicy,
) -> Result<String, ExtractError> {
    match feature.get_qualifier(key) {
        Some(v) => Ok(v.to_string()),
        None if policy == TranslationPolicy::Require => {
            Err(ExtractError::missing_qualifier(locus_tag, key))
        }
        None => Ok(String::new()),
    }
}

fn translate_feature(feature: &Feature, record: &Record) -> Result<String, ExtractError> {
    let table_id: u8 = match feature.get_qualifier("transl_table") {
        Some(v) => v
            .parse()
            .map_err(|_| ExtractError::InvalidQualifier {
                locus_tag: feature.display_name().to_string(),
                qualifier: "transl_table".to_string(),
                value: v.to_string(),
            })?,
        None => 11,
    };
    let table = CodonTable::for_id(table_id).ok_or(ExtractError::UnsupportedCodonTable(table_id))?;

    let codon_start = feature
        .get_qualifier("codon_start")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let nucleotides = record.feature_sequence(feature);
    if nucleotides.is_empty() {
        return Err(ExtractError::NoSequence {
            locus_tag: feature.display_name().to_string(),
        });
    }

    debug!(locus_tag = feature.display_name(), table = table_id, "Translating CDS locally");
    Ok(translate_cds(&nucleotides, &table, codon_start))
}

/// Result of running the selection over one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub record_name: String,
    pub window: OperonWindow,
    /// Locus tags of the operon members, in record order.
    pub operon: Vec<String>,
    pub proteins: Vec<ProteinRecord>,
    /// Locus tags dropped under [`TranslationPolicy::Skip`].
    #[serde(default)]
    pub skipped: Vec<String>,
}

/// Collect every locus-tagged CDS whose start or end falls within `flank`
/// bases of the operon named by `operon_tags`.
pub fn extract_proteins(
    record: &Record,
    operon_tags: &[String],
    flank: usize,
    policy: TranslationPolicy,
) -> Result<Extraction, ExtractError> {
    let features = cds_with_locus_tag(record);
    debug!(record = %record.name, cds = features.len(), "Collected locus-tagged CDS features");

    let window = OperonWindow::around(features.iter().copied(), operon_tags, flank)?;
    let operon: Vec<String> = features
        .iter()
        .filter_map(|f| f.locus_tag())
        .filter(|tag| operon_tags.iter().any(|t| t == tag))
        .map(String::from)
        .collect();

    let selected = select_in_window(&features, &window);
    debug!(window = %window, selected = selected.len(), "Selected features in window");

    let mut proteins = Vec::with_capacity(selected.len());
    let mut skipped = Vec::new();
    for feature in selected {
        match ProteinRecord::from_feature(feature, record, policy)? {
            Some(protein) => proteins.push(protein),
            None => skipped.push(feature.locus_tag().unwrap_or_default().to_string()),
        }
    }

    Ok(Extraction {
        record_name: record.name.clone(),
        window,
        operon,
        proteins,
        skipped,
    })
}
