//! E-utilities endpoint URL builders

/// Public E-utilities base URL.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

fn endpoint(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}

/// Build esearch URL
pub fn esearch_url(base_url: &str) -> String {
    endpoint(base_url, "esearch.fcgi")
}

/// Build elink URL
pub fn elink_url(base_url: &str) -> String {
    endpoint(base_url, "elink.fcgi")
}

/// Build efetch URL
pub fn efetch_url(base_url: &str) -> String {
    endpoint(base_url, "efetch.fcgi")
}
