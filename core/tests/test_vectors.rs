//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected results. Parsed JSON is compared as values, not raw strings,
//! so field ordering in the vectors does not matter.

use serde_json::Value;
use shortener_core::{
    find_urls, ApiError, ClientConfig, HttpMethod, HttpRequest, HttpResponse, ShortenerClient,
    Stats,
};

const BASE_URL: &str = "http://lk2.in/";

/// Client whose transport answers every request with `body`.
fn client_answering(
    body: String,
) -> ShortenerClient<impl Fn(&HttpRequest) -> Result<HttpResponse, ApiError>> {
    let transport = move |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse::ok(body.clone()))
    };
    ShortenerClient::with_transport(ClientConfig::default(), transport)
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, HttpMethod::Get, "{name}: method");
    assert_eq!(expected["method"], "GET", "{name}: vector method");
    assert_eq!(
        req.url,
        format!("{BASE_URL}{}", expected["url"].as_str().unwrap()),
        "{name}: url"
    );
    assert!(req.proxy.is_none(), "{name}: proxy");
    assert_eq!(
        expected["headers"].as_array().unwrap().len(),
        req.headers.len(),
        "{name}: headers"
    );
}

// ---------------------------------------------------------------------------
// Shorten
// ---------------------------------------------------------------------------

#[test]
fn shorten_test_vectors() {
    let raw = include_str!("../../test-vectors/shorten.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = ShortenerClient::new(ClientConfig::default());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let url = case["input"]["url"].as_str().unwrap();
        let url_encode = case["input"]["url_encode"].as_bool().unwrap();

        // Verify build
        let req = c.build_shorten(url, url_encode);
        check_request(name, &req, &case["expected_request"]);

        // Verify parse
        let short = c.parse_shorten(&simulated(case)).unwrap();
        let expected = case["expected_result"]
            .as_str()
            .map(|hash| format!("{BASE_URL}{hash}"));
        assert_eq!(short, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Stats and clicks
// ---------------------------------------------------------------------------

#[test]
fn stats_test_vectors() {
    let raw = include_str!("../../test-vectors/stats.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = ShortenerClient::new(ClientConfig::default());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let hash = case["input_hash"].as_str().unwrap();

        // Verify build
        let req = c.build_stats(hash);
        check_request(name, &req, &case["expected_request"]);

        // Verify parse
        let stats = c.parse_stats(&simulated(case)).unwrap();
        let expected: Option<Stats> = serde_json::from_value(case["expected_stats"].clone()).unwrap();
        assert_eq!(stats, expected, "{name}: parsed stats");

        // Verify clicks through a stub transport
        let body = simulated(case).body;
        let clicks = client_answering(body).clicks(hash).unwrap().into_value();
        assert_eq!(clicks, case["expected_clicks"].as_u64(), "{name}: clicks");
    }
}

// ---------------------------------------------------------------------------
// Rewrite
// ---------------------------------------------------------------------------

#[test]
fn rewrite_test_vectors() {
    let raw = include_str!("../../test-vectors/rewrite.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client_answering(r#"{"data":{"hash":"S"}}"#.to_string());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();

        let expected_urls: Vec<&str> = case["expected_urls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u.as_str().unwrap())
            .collect();
        assert_eq!(find_urls(input), expected_urls, "{name}: detected urls");

        let rewritten = c.rewrite(input).unwrap();
        assert_eq!(rewritten, case["expected_result"].as_str().unwrap(), "{name}: rewritten");
    }
}
