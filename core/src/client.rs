//! Request builder, response parser and executor for the shortener API.
//!
//! # Design
//! `ShortenerClient` holds an immutable `ClientConfig` and a `Transport`.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that reads an `HttpResponse`; both are
//! pure. The executing methods (`shorten`, `stats`, `clicks`, `rewrite`) run
//! the pair through the transport and return a `Reply` describing the whole
//! exchange.
//!
//! A response whose body is JSON is always inspected for the expected
//! envelope fields, whatever its status; missing fields mean "not available".

use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;

use crate::config::{ClientConfig, ProxyConfig, API_PATH};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::rewrite::rewrite_urls;
use crate::transport::{Transport, UreqTransport};
use crate::types::{ApiMethod, Reply, Stats};

/// Synchronous client for a lk2.in-style URL shortener.
#[derive(Debug, Clone)]
pub struct ShortenerClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ShortenerClient<UreqTransport> {
    /// Client that talks to the network through ureq, honouring the
    /// configured timeout.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::with_timeout(config.timeout());
        Self { config, transport }
    }
}

impl<T: Transport> ShortenerClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shorten `url`, form-urlencoding it first.
    pub fn shorten(&self, url: &str) -> Result<Reply<String>, ApiError> {
        self.shorten_with(url, true)
    }

    /// Shorten a URL the caller has already encoded for a query string.
    pub fn shorten_unencoded(&self, url: &str) -> Result<Reply<String>, ApiError> {
        self.shorten_with(url, false)
    }

    fn shorten_with(&self, url: &str, url_encode: bool) -> Result<Reply<String>, ApiError> {
        let request = self.build_shorten(url, url_encode);
        let response = self.dispatch(ApiMethod::Shorten, &request)?;
        let value = self.parse_shorten(&response)?;
        Ok(Reply::new(ApiMethod::Shorten, request, response, value))
    }

    /// Statistics object for `shortcode`.
    pub fn stats(&self, shortcode: &str) -> Result<Reply<Stats>, ApiError> {
        let request = self.build_stats(shortcode);
        let response = self.dispatch(ApiMethod::Stats, &request)?;
        let value = self.parse_stats(&response)?;
        Ok(Reply::new(ApiMethod::Stats, request, response, value))
    }

    /// Number of times `shortcode` has been visited.
    pub fn clicks(&self, shortcode: &str) -> Result<Reply<u64>, ApiError> {
        Ok(self.stats(shortcode)?.and_then(|stats| stats.total_visits()))
    }

    /// Replace every URL in `text` with its short form.
    ///
    /// URLs the service declines to shorten are replaced by
    /// [`crate::rewrite::NOT_AVAILABLE`]. A transport or decoding failure
    /// aborts the whole rewrite.
    pub fn rewrite(&self, text: &str) -> Result<String, ApiError> {
        rewrite_urls(text, |url| self.shorten(url).map(Reply::into_value))
    }

    fn dispatch(&self, operation: ApiMethod, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            %operation,
            method = request.method.as_str(),
            url = %request.url,
            proxy = ?request.proxy.as_ref().map(ProxyConfig::authority),
            "dispatching request"
        );
        let response = self.transport.execute(request)?;
        debug!(%operation, status = response.status, bytes = response.body.len(), "response received");
        Ok(response)
    }
}

impl<T> ShortenerClient<T> {
    pub fn build_shorten(&self, url: &str, url_encode: bool) -> HttpRequest {
        let long_url = if url_encode {
            encode_query_value(url)
        } else {
            url.to_string()
        };
        self.build_request(ApiMethod::Shorten, "long_url", &long_url)
    }

    pub fn build_stats(&self, shortcode: &str) -> HttpRequest {
        self.build_request(ApiMethod::Stats, "hash", &encode_query_value(shortcode))
    }

    /// Full short URL when the response carries `data.hash`.
    pub fn parse_shorten(&self, response: &HttpResponse) -> Result<Option<String>, ApiError> {
        let body = decode_body(response)?;
        Ok(envelope_hash(&body).map(|hash| format!("{}{hash}", self.config.base_url())))
    }

    /// `data.stats` when the response carries `data.hash`.
    pub fn parse_stats(&self, response: &HttpResponse) -> Result<Option<Stats>, ApiError> {
        let body = decode_body(response)?;
        if envelope_hash(&body).is_none() {
            return Ok(None);
        }
        match body.pointer("/data/stats") {
            Some(Value::Object(stats)) => Ok(Some(Stats(stats.clone()))),
            _ => Ok(None),
        }
    }

    fn build_request(&self, operation: ApiMethod, param: &str, value: &str) -> HttpRequest {
        let proxy = self.config.proxy().cloned();
        let headers = proxy
            .as_ref()
            .and_then(|p| p.auth.as_ref())
            .map(|auth| vec![("proxy-authorization".to_string(), auth.header_value())])
            .unwrap_or_default();

        HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}{API_PATH}{}?{param}={value}",
                self.config.base_url(),
                operation.as_str()
            ),
            headers,
            proxy,
        }
    }
}

/// Query-string encoding with `+` for spaces.
fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Decode a JSON body. Non-JSON bodies are reported according to the status.
fn decode_body(response: &HttpResponse) -> Result<Value, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| {
        if response.is_success() {
            ApiError::Deserialization(e.to_string())
        } else {
            ApiError::HttpError {
                status: response.status,
                body: response.body.clone(),
            }
        }
    })
}

/// `data.hash` as text, if present as a string or number. An empty string
/// still counts as present.
fn envelope_hash(body: &Value) -> Option<String> {
    match body.pointer("/data/hash")? {
        Value::String(hash) => Some(hash.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
