//! HTTP tests for `EntrezClient` against a local mock E-utilities server
//!
//! The client is blocking, so each call runs on tokio's blocking pool while
//! the mock server keeps serving on the runtime.

use flank_entrez::{resolve_genbank, EntrezApi, EntrezClient, EntrezConfig, EntrezError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const TEST_GB: &str = include_str!("../../flank-formats/tests/fixtures/TS000001.1.gb");

fn config_for(server: &MockServer) -> EntrezConfig {
    EntrezConfig::new()
        .with_base_url(server.uri())
        .with_email("maintainer@example.org")
        .with_timeout(10)
}

async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

// ============================================================================
// Query parameters
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_esearch_sends_identification_and_json_mode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "assembly"))
        .and(query_param("term", "TS000001.1"))
        .and(query_param("retmax", "1"))
        .and(query_param("retmode", "json"))
        .and(query_param("tool", "operon-flank"))
        .and(query_param("email", "maintainer@example.org"))
        .and(query_param("api_key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": "1", "idlist": ["31908"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_api_key("secret-key");
    let ids = blocking(move || {
        let client = EntrezClient::new(config)?;
        client.esearch("assembly", "TS000001.1", 1)
    })
    .await
    .unwrap();

    assert_eq!(ids, vec!["31908".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_over_http() {
    let server = MockServer::start().await;
    let first_entry = TEST_GB
        .split_inclusive("//\n")
        .next()
        .unwrap()
        .to_string();

    Mock::given(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": "1", "idlist": ["31908"]}
        })))
        .mount(&server)
        .await;

    Mock::given(path("/elink.fcgi"))
        .and(query_param("dbfrom", "assembly"))
        .and(query_param("db", "nucleotide"))
        .and(query_param("id", "31908"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "linksets": [{
                "dbfrom": "assembly",
                "ids": ["31908"],
                "linksetdbs": [
                    {"dbto": "nuccore", "linkname": "assembly_nuccore_refseq", "links": [999]},
                    {"dbto": "nuccore", "linkname": "assembly_nuccore_insdc", "links": ["1001"]}
                ]
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(path("/efetch.fcgi"))
        .and(query_param("db", "nucleotide"))
        .and(query_param("id", "1001"))
        .and(query_param("rettype", "gbwithparts"))
        .and(query_param("retmode", "text"))
        .respond_with(ResponseTemplate::new(200).set_body_string(first_entry))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let records = blocking(move || {
        let client = EntrezClient::new(config)?;
        resolve_genbank(&client, "TS000001.1", 1)
    })
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "TS000001");
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEST_GB))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_max_retries(1);
    let body = blocking(move || {
        let client = EntrezClient::new(config)?;
        client.efetch("nucleotide", "1001", "gbwithparts", "text")
    })
    .await
    .unwrap();

    assert!(body.starts_with("LOCUS"));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_retries_makes_one_attempt() {
    let server = MockServer::start().await;

    Mock::given(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config_for(&server).with_max_retries(0);
    let result = blocking(move || {
        let client = EntrezClient::new(config)?;
        client.esearch("assembly", "TS000001.1", 1)
    })
    .await;

    match result {
        Err(EntrezError::Status { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected a 503 status error, got {other:?}"),
    }
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = config_for(&server).with_max_retries(3);
    let result = blocking(move || {
        let client = EntrezClient::new(config)?;
        client.efetch("nucleotide", "1001", "gbwithparts", "text")
    })
    .await;

    match result {
        Err(EntrezError::Status { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/efetch.fcgi"));
        }
        other => panic!("expected a 404 status error, got {other:?}"),
    }
    assert_eq!(request_count(&server).await, 1);
}

// ============================================================================
// Error documents
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_efetch_error_document_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Error: Failed to retrieve sequence id 0 from nuccore\n"),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        let client = EntrezClient::new(config)?;
        client.efetch("nucleotide", "0", "gbwithparts", "text")
    })
    .await;

    match result {
        Err(EntrezError::Api(message)) => assert!(message.contains("id 0")),
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_esearch_error_field_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"ERROR": "Invalid db name specified: assembli"}
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        let client = EntrezClient::new(config)?;
        client.esearch("assembli", "TS000001.1", 1)
    })
    .await;

    assert!(matches!(result, Err(EntrezError::Api(ref m)) if m.contains("Invalid db")));
}
