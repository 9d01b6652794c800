use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::record::Record;
use crate::ExtractError;

/// Half-open, 0-based coordinate window around an operon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperonWindow {
    pub start: usize,
    pub end: usize,
}

impl OperonWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Window spanning every feature whose locus tag is in `tags`, padded by
    /// `flank` bases on each side.
    ///
    /// The right edge is the operon's last included base plus `flank`
    /// (exclusive). Every tag must match at least one feature.
    pub fn around<'a, I>(features: I, tags: &[String], flank: usize) -> Result<Self, ExtractError>
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        let mut found = vec![false; tags.len()];
        let mut bounds: Option<(usize, usize)> = None;

        for feature in features {
            let Some(tag) = feature.locus_tag() else {
                continue;
            };
            let Some(idx) = tags.iter().position(|t| t == tag) else {
                continue;
            };
            found[idx] = true;

            let (lo, hi) = bounds.unwrap_or((feature.start(), feature.end()));
            bounds = Some((lo.min(feature.start()), hi.max(feature.end())));
        }

        let missing: Vec<String> = tags
            .iter()
            .zip(&found)
            .filter(|(_, hit)| !**hit)
            .map(|(t, _)| t.clone())
            .collect();

        match bounds {
            Some((lo, hi)) if missing.is_empty() => {
                let last_base = hi.saturating_sub(1);
                Ok(Self::new(
                    lo.saturating_sub(flank),
                    last_base.saturating_add(flank),
                ))
            }
            _ => Err(ExtractError::OperonNotFound { missing }),
        }
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A feature is in the window when its start or its end coordinate is.
    /// Features spanning the whole window match neither and are left out.
    pub fn touches(&self, feature: &Feature) -> bool {
        self.contains(feature.start()) || self.contains(feature.end())
    }
}

impl std::fmt::Display for OperonWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-based inclusive, the way GenBank writes ranges
        write!(f, "{}..{}", self.start + 1, self.end)
    }
}

/// CDS features that carry a `/locus_tag`. Genes, operons, RNAs and
/// untagged CDS entries are dropped.
pub fn cds_with_locus_tag(record: &Record) -> Vec<&Feature> {
    record
        .features
        .iter()
        .filter(|f| f.feature_type.is_coding() && f.has_qualifier("locus_tag"))
        .collect()
}

/// Features touching the window, in input order.
pub fn select_in_window<'a>(features: &[&'a Feature], window: &OperonWindow) -> Vec<&'a Feature> {
    features
        .iter()
        .copied()
        .filter(|f| window.touches(f))
        .collect()
}
