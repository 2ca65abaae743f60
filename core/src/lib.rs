//! Synchronous client for a lk2.in-style URL shortener web service.
//!
//! # Overview
//! Shortens long URLs, reads click statistics for a short code and rewrites
//! every URL found in a block of text into its short form. Outbound calls may
//! go through an HTTP proxy with optional BASIC authentication.
//!
//! # Design
//! - `ShortenerClient` holds only an immutable `ClientConfig` and a
//!   `Transport`; every call returns a self-contained `Reply`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit and testable.
//! - "Not available" is a reply without a value; `ApiError` is reserved for
//!   transport, decoding and configuration faults.
//!
//! ```no_run
//! use shortener_core::{ClientConfig, ShortenerClient};
//!
//! let config = ClientConfig::builder().proxy("proxy.local", Some(3128)).build()?;
//! let client = ShortenerClient::new(config);
//! if let Some(short) = client.shorten("http://example.com/a/long/path")?.value() {
//!     println!("{short}");
//! }
//! # Ok::<(), shortener_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod rewrite;
pub mod transport;
pub mod types;

pub use client::ShortenerClient;
pub use config::{ClientConfig, ClientConfigBuilder, ProxyAuth, ProxyConfig};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use rewrite::{find_urls, rewrite_urls, NOT_AVAILABLE};
pub use transport::{Transport, UreqTransport};
pub use types::{ApiMethod, Reply, Stats};
