//! Print how many times a short link has been clicked.
//!
//! ```text
//! cargo run -p shortener-core --example link_clicks -- vwhi5
//! ```
//!
//! Configuration comes from `SHORTENER_*` variables, optionally in `.env`.

use shortener_core::{ApiError, ClientConfig, ShortenerClient};
use tracing_subscriber::EnvFilter;

fn describe(clicks: u64) -> String {
    match clicks {
        0 => "never".to_string(),
        1 => "once".to_string(),
        n => format!("{n} times"),
    }
}

fn main() -> Result<(), ApiError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let shortcode = std::env::args().nth(1).unwrap_or_else(|| "vwhi5".to_string());
    let config = ClientConfig::from_env()?;
    let client = ShortenerClient::new(config.clone());
    let link = format!("{}{shortcode}", config.base_url());

    match client.clicks(&shortcode)?.into_value() {
        Some(clicks) => println!("The URL {link} has been clicked {}.", describe(clicks)),
        None => println!("No statistics are available for {link}."),
    }
    Ok(())
}
