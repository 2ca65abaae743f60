//! Client configuration: API location, optional proxy and transport timeout.
//!
//! # Design
//! Configuration is assembled once through `ClientConfigBuilder` and then
//! handed to `ShortenerClient`, which never mutates it. Proxy settings follow
//! the usual shortener-client conventions: the port defaults to 8080 and is
//! only replaced when a caller passes one explicitly.
//!
//! ## Environment variables
//!
//! - `SHORTENER_BASE_URL` - service root (default: `http://lk2.in/`)
//! - `SHORTENER_PROXY_HOST` / `SHORTENER_PROXY_PORT` - outbound proxy
//! - `SHORTENER_PROXY_USER` / `SHORTENER_PROXY_PASSWORD` - proxy BASIC auth
//! - `SHORTENER_TIMEOUT_SECS` - global request timeout for `UreqTransport`

use std::env;
use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ApiError;

/// Root of the public lk2.in service.
pub const DEFAULT_BASE_URL: &str = "http://lk2.in/";

/// Path of the versioned web service below the base URL.
pub const API_PATH: &str = "api/v1/";

pub const DEFAULT_PROXY_PORT: u16 = 8080;

/// Credentials for proxy BASIC authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl ProxyAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Base64 of `username:password`, as carried after `Basic ` in the
    /// `Proxy-Authorization` header.
    pub fn encoded(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    pub fn header_value(&self) -> String {
        format!("Basic {}", self.encoded())
    }
}

impl fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// An HTTP proxy that outbound requests are routed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    /// `host:port`, the form proxies are addressed by.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Immutable configuration for a `ShortenerClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    proxy: Option<ProxyConfig>,
    timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Service root, always ending in `/`. Short URLs are this plus a hash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Loads configuration from `SHORTENER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if a numeric variable does not
    /// parse or the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(base_url) = var("SHORTENER_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Some(host) = var("SHORTENER_PROXY_HOST") {
            let port = var("SHORTENER_PROXY_PORT")
                .map(|raw| {
                    raw.trim().parse::<u16>().map_err(|_| {
                        ApiError::InvalidConfig(format!("SHORTENER_PROXY_PORT is not a port: {raw}"))
                    })
                })
                .transpose()?;
            builder = builder.proxy(host, port);
        }

        if let Some(username) = var("SHORTENER_PROXY_USER") {
            let password = lookup("SHORTENER_PROXY_PASSWORD").unwrap_or_default();
            builder = builder.proxy_auth(username, password);
        }

        if let Some(raw) = var("SHORTENER_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ApiError::InvalidConfig(format!("SHORTENER_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    proxy_host: Option<String>,
    proxy_port: u16,
    proxy_auth: Option<ProxyAuth>,
    timeout: Option<Duration>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy_host: None,
            proxy_port: DEFAULT_PROXY_PORT,
            proxy_auth: None,
            timeout: None,
        }
    }
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Route requests through `host`. The port is only overwritten when
    /// `port` is `Some`, so a previously chosen port survives a host change.
    pub fn proxy(mut self, host: impl Into<String>, port: Option<u16>) -> Self {
        self.proxy_host = Some(host.into());
        if let Some(port) = port {
            self.proxy_port = port;
        }
        self
    }

    /// Authenticate against the proxy with BASIC credentials.
    /// Has no effect unless a proxy host is also configured.
    pub fn proxy_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.proxy_auth = Some(ProxyAuth::new(username, password));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the base URL is not an
    /// absolute http(s) URL.
    pub fn build(self) -> Result<ClientConfig, ApiError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidConfig(format!("base URL {:?}: {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must be http or https: {}",
                self.base_url
            )));
        }

        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let proxy_auth = self.proxy_auth;
        let proxy_port = self.proxy_port;
        let proxy = self.proxy_host.map(|host| ProxyConfig {
            host,
            port: proxy_port,
            auth: proxy_auth,
        });

        Ok(ClientConfig {
            base_url,
            proxy,
            timeout: self.timeout,
        })
    }
}
