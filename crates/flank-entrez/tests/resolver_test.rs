use std::cell::RefCell;

use flank_entrez::types::{LinkSetDb, Uid};
use flank_entrez::{fetch_genbank_text, resolve_genbank, EntrezApi, EntrezError, Result};
use pretty_assertions::assert_eq;

const TEST_GB: &str = include_str!("../../flank-formats/tests/fixtures/TS000001.1.gb");

/// In-memory E-utilities serving the two entries of the fixture file.
struct FakeEntrez {
    assembly_ids: Vec<String>,
    link_sets: Vec<LinkSetDb>,
    calls: RefCell<Vec<String>>,
}

impl FakeEntrez {
    fn new() -> Self {
        Self {
            assembly_ids: vec!["31908".to_string()],
            link_sets: vec![
                LinkSetDb {
                    dbto: "nuccore".to_string(),
                    linkname: "assembly_nuccore_refseq".to_string(),
                    links: vec![Uid::Number(999)],
                },
                LinkSetDb {
                    dbto: "nuccore".to_string(),
                    linkname: "assembly_nuccore_insdc".to_string(),
                    links: vec![Uid::Number(1001), Uid::Text("1002".to_string())],
                },
            ],
            calls: RefCell::new(Vec::new()),
        }
    }

    fn entry(id: &str) -> Option<String> {
        let mut entries = TEST_GB.split_inclusive("//\n");
        match id {
            "1001" => entries.next().map(str::to_string),
            "1002" => entries.nth(1).map(str::to_string),
            _ => None,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl EntrezApi for FakeEntrez {
    fn esearch(&self, db: &str, term: &str, retmax: usize) -> Result<Vec<String>> {
        self.calls
            .borrow_mut()
            .push(format!("esearch {db} {term} {retmax}"));
        Ok(self.assembly_ids.iter().take(retmax).cloned().collect())
    }

    fn elink(&self, dbfrom: &str, db: &str, ids: &[String]) -> Result<Vec<LinkSetDb>> {
        self.calls
            .borrow_mut()
            .push(format!("elink {dbfrom}->{db} {}", ids.join(",")));
        Ok(self.link_sets.clone())
    }

    fn efetch(&self, db: &str, id: &str, rettype: &str, retmode: &str) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(format!("efetch {db} {id} {rettype} {retmode}"));
        Self::entry(id).ok_or_else(|| EntrezError::Api(format!("unknown id {id}")))
    }
}

#[test]
fn test_resolve_follows_insdc_links() {
    let api = FakeEntrez::new();
    let records = resolve_genbank(&api, "TS000001.1", 1).unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["TS000001", "pTS1"]);
    assert_eq!(
        api.calls(),
        vec![
            "esearch assembly TS000001.1 1",
            "elink assembly->nucleotide 31908",
            "efetch nucleotide 1001 gbwithparts text",
            "efetch nucleotide 1002 gbwithparts text",
        ]
    );
}

#[test]
fn test_fetched_text_is_reparseable() {
    let api = FakeEntrez::new();
    let text = fetch_genbank_text(&api, "TS000001.1", 1).unwrap();
    assert!(text.starts_with("LOCUS"));
    assert!(text.ends_with("//\n"));
    assert_eq!(text.matches("\n//\n").count(), 2);
}

#[test]
fn test_no_search_results() {
    let mut api = FakeEntrez::new();
    api.assembly_ids.clear();
    let err = resolve_genbank(&api, "XX000000.1", 1).unwrap_err();
    assert!(matches!(err, EntrezError::NoResults { .. }));
    assert_eq!(api.calls().len(), 1);
}

#[test]
fn test_missing_insdc_link_set() {
    let mut api = FakeEntrez::new();
    api.link_sets.retain(|set| set.linkname != "assembly_nuccore_insdc");
    let err = fetch_genbank_text(&api, "TS000001.1", 1).unwrap_err();
    assert!(matches!(err, EntrezError::LinkSetMissing { .. }));
    assert!(err.to_string().contains("assembly_nuccore_insdc"));
}

#[test]
fn test_empty_insdc_link_set() {
    let mut api = FakeEntrez::new();
    for set in &mut api.link_sets {
        set.links.clear();
    }
    let err = fetch_genbank_text(&api, "TS000001.1", 1).unwrap_err();
    assert!(matches!(err, EntrezError::EmptyLinkSet { .. }));
}

#[test]
fn test_fetch_error_propagates() {
    let mut api = FakeEntrez::new();
    api.link_sets[1].links.push(Uid::Number(7));
    let err = resolve_genbank(&api, "TS000001.1", 1).unwrap_err();
    assert!(matches!(err, EntrezError::Api(msg) if msg.contains("unknown id 7")));
}
