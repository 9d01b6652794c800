use serde::{Deserialize, Serialize};

/// Feature table keys the extraction distinguishes; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    Source,
    Gene,
    Cds,
    Mrna,
    Trna,
    Rrna,
    Ncrna,
    Tmrna,
    MiscRna,
    Operon,
    MobileElement,
    RepeatRegion,
    Misc,
    #[serde(other)]
    Other,
}

/// INSDC feature keys as they appear in the feature table.
const FEATURE_KEYS: [(&str, FeatureType); 13] = [
    ("source", FeatureType::Source),
    ("gene", FeatureType::Gene),
    ("CDS", FeatureType::Cds),
    ("mRNA", FeatureType::Mrna),
    ("tRNA", FeatureType::Trna),
    ("rRNA", FeatureType::Rrna),
    ("ncRNA", FeatureType::Ncrna),
    ("tmRNA", FeatureType::Tmrna),
    ("misc_RNA", FeatureType::MiscRna),
    ("operon", FeatureType::Operon),
    ("mobile_element", FeatureType::MobileElement),
    ("repeat_region", FeatureType::RepeatRegion),
    ("misc_feature", FeatureType::Misc),
];

impl FeatureType {
    /// Keys are matched case-insensitively; unknown keys map to `Other`.
    pub fn from_genbank_key(key: &str) -> Self {
        FEATURE_KEYS
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, t)| *t)
            .unwrap_or(FeatureType::Other)
    }

    pub fn to_genbank_key(&self) -> &'static str {
        FEATURE_KEYS
            .iter()
            .find(|(_, t)| t == self)
            .map(|(k, _)| *k)
            .unwrap_or("misc_feature")
    }

    /// Protein-coding features are the only ones carrying a `/translation`.
    pub fn is_coding(&self) -> bool {
        matches!(self, FeatureType::Cds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
    None,
}

impl Strand {
    pub fn as_i8(&self) -> i8 {
        match self {
            Strand::Forward => 1,
            Strand::Reverse => -1,
            Strand::None => 0,
        }
    }

    pub fn flip(&self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
            Strand::None => Strand::None,
        }
    }
}

/// Represents the location of a feature on the sequence.
///
/// Coordinates are 0-based and half-open. Join parts are kept in the order they
/// were written, which for reverse-strand features is usually descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Location {
    /// Simple range: start..end
    Simple { start: usize, end: usize },
    /// Join of multiple ranges: join(1..100, 200..300)
    Join { ranges: Vec<(usize, usize)> },
}

impl Location {
    pub fn simple(start: usize, end: usize) -> Self {
        Location::Simple { start, end }
    }

    /// Lowest coordinate covered by any part.
    pub fn start(&self) -> usize {
        match self {
            Location::Simple { start, .. } => *start,
            Location::Join { ranges } => ranges.iter().map(|r| r.0).min().unwrap_or(0),
        }
    }

    /// One past the highest coordinate covered by any part.
    pub fn end(&self) -> usize {
        match self {
            Location::Simple { end, .. } => *end,
            Location::Join { ranges } => ranges.iter().map(|r| r.1).max().unwrap_or(0),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Location::Simple { start, end } => end.saturating_sub(*start),
            Location::Join { ranges } => ranges.iter().map(|(s, e)| e.saturating_sub(*s)).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The individual parts, in written order.
    pub fn parts(&self) -> Vec<(usize, usize)> {
        match self {
            Location::Simple { start, end } => vec![(*start, *end)],
            Location::Join { ranges } => ranges.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Feature key exactly as written in the feature table.
    pub key: String,
    pub feature_type: FeatureType,
    pub location: Location,
    pub strand: Strand,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
}

impl Feature {
    pub fn new(feature_type: FeatureType, start: usize, end: usize, strand: Strand) -> Self {
        Self {
            key: feature_type.to_genbank_key().to_string(),
            feature_type,
            location: Location::simple(start, end),
            strand,
            qualifiers: Vec::new(),
        }
    }

    pub fn start(&self) -> usize {
        self.location.start()
    }

    pub fn end(&self) -> usize {
        self.location.end()
    }

    /// First value for `key`. Qualifiers may repeat; the first one wins.
    pub fn get_qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|q| q.key == key)
            .map(|q| q.value.as_str())
    }

    pub fn has_qualifier(&self, key: &str) -> bool {
        self.qualifiers.iter().any(|q| q.key == key)
    }

    pub fn add_qualifier(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.qualifiers.push(Qualifier {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_qualifier(key, value);
        self
    }

    pub fn locus_tag(&self) -> Option<&str> {
        self.get_qualifier("locus_tag")
    }

    /// Short human-readable label: locus tag, then gene, then product.
    pub fn display_name(&self) -> &str {
        self.locus_tag()
            .or_else(|| self.get_qualifier("gene"))
            .or_else(|| self.get_qualifier("product"))
            .unwrap_or(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_type_from_genbank() {
        assert_eq!(FeatureType::from_genbank_key("CDS"), FeatureType::Cds);
        assert_eq!(FeatureType::from_genbank_key("gene"), FeatureType::Gene);
        assert_eq!(FeatureType::from_genbank_key("rRNA"), FeatureType::Rrna);
        assert_eq!(FeatureType::from_genbank_key("cds"), FeatureType::Cds);
        assert_eq!(
            FeatureType::from_genbank_key("mobile_element"),
            FeatureType::MobileElement
        );
        assert_eq!(FeatureType::from_genbank_key("STS"), FeatureType::Other);
        assert_eq!(FeatureType::Trna.to_genbank_key(), "tRNA");
        assert_eq!(FeatureType::Other.to_genbank_key(), "misc_feature");
    }

    #[test]
    fn test_location_simple() {
        let loc = Location::simple(100, 500);
        assert_eq!(loc.start(), 100);
        assert_eq!(loc.end(), 500);
        assert_eq!(loc.len(), 400);
    }

    #[test]
    fn test_location_join_bounds_ignore_order() {
        let loc = Location::Join {
            ranges: vec![(300, 400), (100, 200)],
        };
        assert_eq!(loc.start(), 100);
        assert_eq!(loc.end(), 400);
        assert_eq!(loc.len(), 200);
    }

    #[test]
    fn test_first_qualifier_wins() {
        let f = Feature::new(FeatureType::Cds, 100, 800, Strand::Forward)
            .with_qualifier("locus_tag", "BC_0001")
            .with_qualifier("note", "first")
            .with_qualifier("note", "second");
        assert_eq!(f.locus_tag(), Some("BC_0001"));
        assert_eq!(f.get_qualifier("note"), Some("first"));
        assert!(!f.has_qualifier("translation"));
        assert_eq!(f.display_name(), "BC_0001");
        assert_eq!(f.key, "CDS");
    }

    #[test]
    fn test_strand() {
        assert_eq!(Strand::Reverse.as_i8(), -1);
        assert_eq!(Strand::Forward.flip(), Strand::Reverse);
        assert_eq!(Strand::None.flip(), Strand::None);
    }
}
