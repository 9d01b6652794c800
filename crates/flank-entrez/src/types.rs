//! E-utilities JSON response types
//!
//! Only the fields this crate reads are modelled; everything else in the
//! payloads is ignored.

use serde::{Deserialize, Serialize};

/// NCBI sometimes sends UIDs as strings and sometimes as bare numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Uid {
    Text(String),
    Number(u64),
}

impl From<Uid> for String {
    fn from(uid: Uid) -> Self {
        match uid {
            Uid::Text(s) => s,
            Uid::Number(n) => n.to_string(),
        }
    }
}

/// Top-level esearch response (`retmode=json`)
#[derive(Debug, Clone, Deserialize)]
pub struct ESearchResponse {
    pub esearchresult: Option<ESearchResult>,
    /// Set instead of `esearchresult` on malformed requests
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ESearchResult {
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<Uid>,
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
}

/// Top-level elink response (`retmode=json`)
#[derive(Debug, Clone, Deserialize)]
pub struct ELinkResponse {
    #[serde(default)]
    pub linksets: Vec<LinkSet>,
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkSet {
    pub dbfrom: String,
    #[serde(default)]
    pub ids: Vec<Uid>,
    #[serde(default)]
    pub linksetdbs: Vec<LinkSetDb>,
}

/// One named group of links, e.g. `assembly_nuccore_insdc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSetDb {
    pub dbto: String,
    pub linkname: String,
    #[serde(default)]
    pub links: Vec<Uid>,
}

impl LinkSetDb {
    pub fn link_ids(&self) -> Vec<String> {
        self.links.iter().cloned().map(String::from).collect()
    }
}
