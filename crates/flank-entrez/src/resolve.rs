//! Accession → GenBank resolution
//!
//! An assembly accession is searched in the `assembly` database, linked to its
//! INSDC nucleotide entries and each entry is fetched with all sequence parts
//! inlined.

use flank_core::Record;
use flank_formats::genbank;
use tracing::{debug, info};

use crate::{EntrezApi, EntrezError, Result};

/// Link group holding the INSDC (GenBank/ENA/DDBJ) nucleotide entries of an assembly.
pub const INSDC_LINK_NAME: &str = "assembly_nuccore_insdc";

const SEARCH_DB: &str = "assembly";
const FETCH_DB: &str = "nucleotide";

/// Download the GenBank text of every INSDC sequence linked to `accession`.
///
/// Entries are concatenated in link order, each ending with its own `//`.
pub fn fetch_genbank_text<A: EntrezApi + ?Sized>(
    api: &A,
    accession: &str,
    retmax: usize,
) -> Result<String> {
    let assembly_ids = api.esearch(SEARCH_DB, accession, retmax)?;
    if assembly_ids.is_empty() {
        return Err(EntrezError::NoResults {
            db: SEARCH_DB.to_string(),
            term: accession.to_string(),
        });
    }
    debug!(ids = ?assembly_ids, "Assembly search results");

    let link_sets = api.elink(SEARCH_DB, FETCH_DB, &assembly_ids)?;
    let insdc = link_sets
        .iter()
        .find(|set| set.linkname == INSDC_LINK_NAME)
        .ok_or_else(|| EntrezError::LinkSetMissing {
            link_name: INSDC_LINK_NAME.to_string(),
        })?;

    let nucleotide_ids = insdc.link_ids();
    if nucleotide_ids.is_empty() {
        return Err(EntrezError::EmptyLinkSet {
            link_name: INSDC_LINK_NAME.to_string(),
        });
    }
    info!(
        "Fetching {} nucleotide entries for {}",
        nucleotide_ids.len(),
        accession
    );

    let mut text = String::new();
    for id in &nucleotide_ids {
        let entry = api.efetch(FETCH_DB, id, "gbwithparts", "text")?;
        debug!(id = %id, bytes = entry.len(), "Fetched entry");
        text.push_str(entry.trim_end());
        text.push('\n');
    }

    Ok(text)
}

/// Download and parse every INSDC sequence linked to `accession`.
pub fn resolve_genbank<A: EntrezApi + ?Sized>(
    api: &A,
    accession: &str,
    retmax: usize,
) -> Result<Vec<Record>> {
    let text = fetch_genbank_text(api, accession, retmax)?;
    Ok(genbank::parse_records(&text)?)
}
