use serde::{Deserialize, Serialize};

use crate::feature::{Feature, Strand};
use crate::operations::reverse_complement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Linear,
    Circular,
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topology::Linear => write!(f, "linear"),
            Topology::Circular => write!(f, "circular"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub organism: Option<String>,
    #[serde(default)]
    pub molecule_type: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Length declared on the LOCUS line, which may differ from the parsed
    /// sequence when the record carries a CONTIG instead of an ORIGIN.
    #[serde(default)]
    pub declared_length: Option<usize>,
}

/// One annotated genomic record (a chromosome, plasmid or contig).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// LOCUS name, e.g. `AE016877`.
    pub name: String,
    #[serde(default)]
    pub accession: Option<String>,
    /// Accession with version, e.g. `AE016877.1`.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: String,
    pub topology: Topology,
    pub sequence: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub metadata: RecordMetadata,
}

impl Record {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>, topology: Topology) -> Self {
        Self {
            name: name.into(),
            accession: None,
            version: None,
            description: String::new(),
            topology,
            sequence: sequence.into().to_uppercase(),
            features: Vec::new(),
            metadata: RecordMetadata::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_circular(&self) -> bool {
        self.topology == Topology::Circular
    }

    /// Bases `start..end`. On a circular record `start > end` wraps through
    /// the origin. Out-of-range requests yield an empty string.
    pub fn subsequence(&self, start: usize, end: usize) -> String {
        let seq = self.sequence.as_str();
        let piece = if start <= end {
            seq.get(start..end).map(str::to_string)
        } else if self.is_circular() {
            seq.get(start..)
                .zip(seq.get(..end))
                .map(|(tail, head)| format!("{tail}{head}"))
        } else {
            None
        };
        piece.unwrap_or_default()
    }

    /// Spliced nucleotide sequence of a feature, read in the feature's
    /// orientation.
    pub fn feature_sequence(&self, feature: &Feature) -> String {
        let spliced: String = feature
            .location
            .parts()
            .into_iter()
            .map(|(s, e)| self.subsequence(s, e))
            .collect();

        match feature.strand {
            Strand::Reverse => reverse_complement(&spliced),
            _ => spliced,
        }
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }
}
