use std::path::Path;

use crate::FileFormat;

/// Guess the format from the first non-blank line.
pub fn detect_format(content: &str) -> FileFormat {
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

    match first.split_whitespace().next() {
        Some("LOCUS") => FileFormat::GenBank,
        Some("ID") => FileFormat::Embl,
        Some(token) if token.starts_with('>') => FileFormat::Fasta,
        _ => FileFormat::Unknown,
    }
}

/// Guess the format from the file extension.
pub fn detect_format_from_extension(path: impl AsRef<Path>) -> FileFormat {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("gb" | "gbk" | "gbff" | "genbank") => FileFormat::GenBank,
        Some("fa" | "fasta" | "faa" | "fna" | "fsa") => FileFormat::Fasta,
        Some("embl") => FileFormat::Embl,
        _ => FileFormat::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_genbank() {
        assert_eq!(
            detect_format("LOCUS       AE016877             5411809 bp    DNA"),
            FileFormat::GenBank
        );
    }

    #[test]
    fn test_detect_fasta() {
        assert_eq!(detect_format("\n>BC_3514\nMKV"), FileFormat::Fasta);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_format("<?xml version=\"1.0\"?>"), FileFormat::Unknown);
    }

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(detect_format_from_extension("AE016877.1.gb"), FileFormat::GenBank);
        assert_eq!(detect_format_from_extension("AE016877.1.faa"), FileFormat::Fasta);
        assert_eq!(detect_format_from_extension("x.embl"), FileFormat::Embl);
        assert_eq!(detect_format_from_extension("notes.txt"), FileFormat::Unknown);
    }
}
