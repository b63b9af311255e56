//! Shared HTTP client with a browser-like header profile.
//!
//! The portal rejects requests from unbranded clients, so every request
//! carries a desktop Chrome User-Agent along with matching `Accept` and
//! `Accept-Language` headers.

use crate::config::ScraperConfig;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::error::Error;
use tracing::{debug, instrument};

/// Build a client that sends the configured headers and honours the request timeout.
pub fn build_client(config: &ScraperConfig) -> Result<Client, Box<dyn Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

/// GET a page and return its body.
///
/// Non-success statuses become errors carrying the status, so callers can
/// tell a rejected request (`err.status()` is `Some`) from a transport failure.
#[instrument(level = "debug", skip(client))]
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    debug!(bytes = body.len(), "Fetched page");
    Ok(body)
}
