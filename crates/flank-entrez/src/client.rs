//! Blocking HTTP client for NCBI E-utilities
//!
//! Every request carries the `tool`/`email` identification NCBI asks for and
//! the API key when one is configured. Requests are spaced to stay under the
//! published rate limits and transient failures are retried with exponential
//! backoff.

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::endpoints;
use crate::types::{ELinkResponse, ESearchResponse, LinkSetDb};
use crate::{EntrezApi, EntrezError, Result};

// ============================================================================
// Client Constants
// ============================================================================

/// Default timeout for a single request in seconds. Whole-genome `gbwithparts`
/// downloads are several megabytes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of retries after a failed first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Value sent as the `tool` parameter.
pub const DEFAULT_TOOL: &str = "operon-flank";

/// NCBI allows 3 requests per second without an API key and 10 with one.
const MIN_INTERVAL_ANONYMOUS: Duration = Duration::from_millis(340);
const MIN_INTERVAL_WITH_KEY: Duration = Duration::from_millis(100);

/// Connection settings for [`EntrezClient`].
#[derive(Debug, Clone)]
pub struct EntrezConfig {
    pub base_url: String,
    pub tool: String,
    pub email: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: u32,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::DEFAULT_BASE_URL.to_string(),
            tool: DEFAULT_TOOL.to_string(),
            email: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl EntrezConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Spacing enforced between consecutive requests.
    pub fn min_interval(&self) -> Duration {
        if self.api_key.is_some() {
            MIN_INTERVAL_WITH_KEY
        } else {
            MIN_INTERVAL_ANONYMOUS
        }
    }

    /// Identification parameters appended to every request.
    pub fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("tool", self.tool.clone())];
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }
}

/// E-utilities client
pub struct EntrezClient {
    client: Client,
    config: EntrezConfig,
    last_request: Cell<Option<Instant>>,
}

impl EntrezClient {
    /// Create a new client
    pub fn new(config: EntrezConfig) -> Result<Self> {
        if config.email.is_none() {
            warn!("No contact email configured; NCBI may block anonymous heavy users");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("{}/{}", config.tool, env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Cell::new(None),
        })
    }

    pub fn config(&self) -> &EntrezConfig {
        &self.config
    }

    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let wait = self.config.min_interval().saturating_sub(last.elapsed());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    /// GET `url` with `params`, retrying transient failures
    fn get_text(&self, url: &str, params: &[(&str, String)]) -> Result<String> {
        let max_retries = self.config.max_retries;
        let mut retry = 0;

        loop {
            self.throttle();
            debug!(url = %url, retry, "E-utilities request");

            match self.get_once(url, params) {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && retry < max_retries => {
                    retry += 1;
                    warn!("Request failed (retry {}/{}): {}", retry, max_retries, e);
                    // Exponential backoff: 2^retry seconds
                    let backoff_secs = 2u64.saturating_pow(retry);
                    info!("Retrying in {} seconds...", backoff_secs);
                    thread::sleep(Duration::from_secs(backoff_secs));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn get_once(&self, url: &str, params: &[(&str, String)]) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&self.config.common_params())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(EntrezError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text()?)
    }
}

/// Whether a status code is worth retrying.
pub(crate) fn is_transient_status(status: u16) -> bool {
    StatusCode::from_u16(status)
        .map(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
        .unwrap_or(false)
}

impl EntrezApi for EntrezClient {
    fn esearch(&self, db: &str, term: &str, retmax: usize) -> Result<Vec<String>> {
        let params = [
            ("db", db.to_string()),
            ("term", term.to_string()),
            ("retmax", retmax.to_string()),
            ("retmode", "json".to_string()),
        ];
        let body = self.get_text(&endpoints::esearch_url(&self.config.base_url), &params)?;
        parse_esearch(&body)
    }

    fn elink(&self, dbfrom: &str, db: &str, ids: &[String]) -> Result<Vec<LinkSetDb>> {
        let params = [
            ("dbfrom", dbfrom.to_string()),
            ("db", db.to_string()),
            ("id", ids.join(",")),
            ("retmode", "json".to_string()),
        ];
        let body = self.get_text(&endpoints::elink_url(&self.config.base_url), &params)?;
        parse_elink(&body)
    }

    fn efetch(&self, db: &str, id: &str, rettype: &str, retmode: &str) -> Result<String> {
        let params = [
            ("db", db.to_string()),
            ("id", id.to_string()),
            ("rettype", rettype.to_string()),
            ("retmode", retmode.to_string()),
        ];
        let body = self.get_text(&endpoints::efetch_url(&self.config.base_url), &params)?;

        // efetch reports bad ids with a 200 and an error document
        if body.trim_start().starts_with("Error") || body.contains("<ERROR>") {
            return Err(EntrezError::Api(body.trim().to_string()));
        }
        Ok(body)
    }
}

/// Decode an esearch JSON body into its UID list
pub fn parse_esearch(body: &str) -> Result<Vec<String>> {
    let resp: ESearchResponse = serde_json::from_str(body)?;

    if let Some(err) = resp.error {
        return Err(EntrezError::Api(err));
    }

    let result = resp
        .esearchresult
        .ok_or_else(|| EntrezError::Api("esearch response has no esearchresult".to_string()))?;

    if let Some(err) = result.error {
        return Err(EntrezError::Api(err));
    }

    Ok(result.idlist.into_iter().map(String::from).collect())
}

/// Decode an elink JSON body into the link groups of its first link set
pub fn parse_elink(body: &str) -> Result<Vec<LinkSetDb>> {
    let resp: ELinkResponse = serde_json::from_str(body)?;

    if let Some(err) = resp.error {
        return Err(EntrezError::Api(err));
    }

    Ok(resp
        .linksets
        .into_iter()
        .next()
        .map(|set| set.linksetdbs)
        .unwrap_or_default())
}
