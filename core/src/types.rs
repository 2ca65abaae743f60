//! Domain types for the shortener API.
//!
//! # Design
//! Every executed call returns a `Reply<T>`: the request that was sent, the
//! raw response that came back and the decoded value, if the service provided
//! one. Replies are immutable values, so the client itself keeps no record of
//! the last exchange and can be shared freely.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// The web service operation a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Shorten,
    Stats,
}

impl ApiMethod {
    /// Path segment below `api/v1/`.
    pub fn as_str(self) -> &'static str {
        match self {
            ApiMethod::Shorten => "shorten",
            ApiMethod::Stats => "stats",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `data.stats` object of a stats response.
///
/// Kept as an open map because the service may report more metrics than the
/// ones this crate knows about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(pub Map<String, Value>);

impl Stats {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of recorded visits. Accepts an integer or a numeric string.
    pub fn total_visits(&self) -> Option<u64> {
        match self.0.get("total_visits")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Outcome of one request/response cycle.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    operation: ApiMethod,
    request: HttpRequest,
    response: HttpResponse,
    value: Option<T>,
}

impl<T> Reply<T> {
    pub(crate) fn new(
        operation: ApiMethod,
        request: HttpRequest,
        response: HttpResponse,
        value: Option<T>,
    ) -> Self {
        Self {
            operation,
            request,
            response,
            value,
        }
    }

    pub fn operation(&self) -> ApiMethod {
        self.operation
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    /// The response body exactly as received.
    pub fn raw_response(&self) -> &str {
        &self.response.body
    }

    /// Decodes the raw body again on every call.
    pub fn response_object(&self) -> Result<Value, ApiError> {
        serde_json::from_str(&self.response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// `None` means the service answered without the expected data.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn is_available(&self) -> bool {
        self.value.is_some()
    }

    /// Derive another reply from the same exchange.
    pub fn and_then<U, F>(self, f: F) -> Reply<U>
    where
        F: FnOnce(T) -> Option<U>,
    {
        Reply {
            operation: self.operation,
            request: self.request,
            response: self.response,
            value: self.value.and_then(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;

    fn stats(value: Value) -> Stats {
        serde_json::from_value(value).unwrap()
    }

    fn reply(body: &str, value: Option<u64>) -> Reply<u64> {
        Reply::new(
            ApiMethod::Stats,
            HttpRequest {
                method: HttpMethod::Get,
                url: "http://lk2.in/api/v1/stats?hash=x".to_string(),
                headers: Vec::new(),
                proxy: None,
            },
            HttpResponse::ok(body),
            value,
        )
    }

    #[test]
    fn total_visits_reads_integers() {
        assert_eq!(stats(json!({"total_visits": 3})).total_visits(), Some(3));
    }

    #[test]
    fn total_visits_accepts_numeric_strings() {
        assert_eq!(stats(json!({"total_visits": "12"})).total_visits(), Some(12));
    }

    #[test]
    fn total_visits_missing_or_malformed() {
        assert_eq!(stats(json!({})).total_visits(), None);
        assert_eq!(stats(json!({"total_visits": null})).total_visits(), None);
        assert_eq!(stats(json!({"total_visits": -1})).total_visits(), None);
        assert_eq!(stats(json!({"total_visits": "many"})).total_visits(), None);
    }

    #[test]
    fn stats_keeps_unknown_metrics() {
        let s = stats(json!({"total_visits": 1, "unique_visits": 1}));
        assert_eq!(s.get("unique_visits"), Some(&json!(1)));
    }

    #[test]
    fn response_object_is_decoded_fresh_each_time() {
        let r = reply(r#"{"data":{"hash":"x"}}"#, None);
        let first = r.response_object().unwrap();
        let second = r.response_object().unwrap();
        assert_eq!(first, second);
        assert_eq!(first["data"]["hash"], "x");
    }

    #[test]
    fn response_object_reports_bad_json() {
        let r = reply("<html>", None);
        assert_eq!(r.raw_response(), "<html>");
        assert!(matches!(
            r.response_object().unwrap_err(),
            ApiError::Deserialization(_)
        ));
    }

    #[test]
    fn and_then_keeps_exchange() {
        let r = reply("{}", Some(2)).and_then(|n| if n > 1 { Some(n * 10) } else { None });
        assert_eq!(r.value(), Some(&20));
        assert_eq!(r.operation(), ApiMethod::Stats);
        assert_eq!(r.raw_response(), "{}");

        let r = reply("{}", Some(1)).and_then(|n| if n > 1 { Some(n) } else { None });
        assert!(!r.is_available());
    }
}
