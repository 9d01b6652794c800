use crate::codon::CodonTable;

/// IUPAC complement of one nucleotide; unknown symbols pass through.
pub fn complement_base(base: char) -> char {
    const PAIRS: [(char, char); 8] = [
        ('A', 'T'),
        ('G', 'C'),
        ('R', 'Y'),
        ('K', 'M'),
        ('B', 'V'),
        ('D', 'H'),
        ('S', 'S'),
        ('W', 'W'),
    ];
    let upper = base.to_ascii_uppercase();
    PAIRS
        .iter()
        .find_map(|&(a, b)| match upper {
            u if u == a => Some(b),
            u if u == b => Some(a),
            _ => None,
        })
        .unwrap_or(upper)
}

/// Reverse complement of a nucleotide sequence, uppercased
pub fn reverse_complement(seq: &str) -> String {
    seq.chars().rev().map(complement_base).collect()
}

/// Translate codon by codon; a trailing partial codon is ignored
pub fn translate(seq: &str, table: &CodonTable) -> String {
    seq.as_bytes()
        .chunks_exact(3)
        .map(|codon| table.translate_bytes(codon))
        .collect()
}

/// Translate a complete coding sequence the way GenBank `/translation`
/// values are produced: skip `codon_start - 1` bases, read an alternative
/// start codon as Met, and drop the terminal stop.
pub fn translate_cds(seq: &str, table: &CodonTable, codon_start: usize) -> String {
    let offset = codon_start.saturating_sub(1).min(seq.len());
    let coding = &seq[offset..];
    let mut protein = translate(coding, table);

    if coding.len() >= 3 && offset == 0 && table.is_start_codon(&coding[..3]) {
        protein.replace_range(..1, "M");
    }

    if protein.ends_with('*') {
        protein.pop();
    }

    protein
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement_base() {
        assert_eq!(complement_base('A'), 'T');
        assert_eq!(complement_base('t'), 'A');
        assert_eq!(complement_base('C'), 'G');
        assert_eq!(complement_base('R'), 'Y');
        assert_eq!(complement_base('S'), 'S');
        assert_eq!(complement_base('N'), 'N');
        assert_eq!(complement_base('-'), '-');
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement("ATCGATCG"), "CGATCGAT");
        assert_eq!(reverse_complement("aacg"), "CGTT");
        assert_eq!(reverse_complement(""), "");
    }

    #[test]
    fn test_translate() {
        let table = CodonTable::standard();
        assert_eq!(translate("ATGAAATTT", &table), "MKF");
        assert_eq!(translate("ATGTAA", &table), "M*");
        assert_eq!(translate("AT", &table), ""); // incomplete codon
    }

    #[test]
    fn test_translate_cds_alternative_start() {
        let table = CodonTable::bacterial();
        // GTG start reads as Met, stop is dropped
        assert_eq!(translate_cds("GTGAAATTTTAA", &table, 1), "MKF");
    }

    #[test]
    fn test_translate_cds_codon_start_offset() {
        let table = CodonTable::bacterial();
        // partial CDS: first two bases belong to the previous codon
        assert_eq!(translate_cds("CCAAATTT", &table, 3), "KF");
    }
}
