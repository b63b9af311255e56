//! Full-text extraction for a single article page.
//!
//! The body lives in one of several containers depending on the article
//! layout. They are tried in order; the first one present is used even if
//! it turns out to hold no text.

use super::client::fetch_html;
use super::extract::{FallbackChain, visible_text};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument, warn};

static ARTICLE_BODY: Lazy<FallbackChain<String>> = Lazy::new(|| {
    FallbackChain::uniform(
        &[
            "div.article-formatted-body",
            "div.tm-article-presenter__content",
            "article",
            "main",
        ],
        container_text,
    )
});

fn container_text(container: ElementRef<'_>) -> Option<String> {
    Some(visible_text(container))
}

/// Body text of an article document, `None` if no known container exists.
pub fn extract_article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    ARTICLE_BODY.first_in(&document)
}

/// Downloads article pages and pulls out their body text.
#[derive(Debug, Clone)]
pub struct ArticleTextFetcher {
    client: Client,
}

impl ArticleTextFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the article at `url` and return its body text.
    ///
    /// Never fails: network errors, error statuses and pages without a known
    /// content container all yield an empty string.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the article page
    ///
    /// # Returns
    ///
    /// The visible body text with scripts and styles removed, or `""`.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_text(&self, url: &str) -> String {
        info!("Scraping article text | start");
        let html = match fetch_html(&self.client, url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Scraping article text | failed");
                return String::new();
            }
        };

        match extract_article_text(&html) {
            Some(text) => {
                info!(chars = text.chars().count(), "Scraping article text | done");
                debug!(preview = %truncate_for_log(&text, 120), "Article text");
                text
            }
            None => {
                warn!("Scraping article text | done | no content container found");
                String::new()
            }
        }
    }
}
