//! Paginated harvesting of Habr search results.
//!
//! Pages are requested one at a time. Each result item is turned into an
//! [`ArticleRecord`]; records whose title was already seen are dropped, and
//! when full text is requested every new record's article page is fetched
//! before moving on.
//!
//! Titles are trimmed when parsed, so `" Same "` and `"Same"` count as one.
//!
//! # Stopping
//!
//! Harvesting ends at the page limit, on the first page without result
//! items, or on a request failure. A status listed in
//! [`ScraperConfig::retry_statuses`] earns the page one retry after
//! [`ScraperConfig::retry_delay`]. Whatever was collected up to that point is
//! returned; failures never propagate to the caller.

use super::article::ArticleTextFetcher;
use super::client::{build_client, fetch_html};
use super::extract::{FallbackChain, Strategy, collapsed_text, select_all_first_nonempty, trimmed_text};
use crate::config::ScraperConfig;
use crate::models::{ArticleRecord, SearchParams};
use once_cell::sync::Lazy;
use rand::{Rng, rng};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static RESULT_ITEMS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article.tm-articles-list__item", "li.tm-articles-list__item"]
        .iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});

static TITLE_LINK: Lazy<FallbackChain<TitleLink>> = Lazy::new(|| {
    FallbackChain::new(vec![
        Strategy::new("a.tm-article-snippet__title-link", title_link),
        Strategy::new("a.tm-title__link", title_link),
    ])
});

static AUTHOR: Lazy<FallbackChain<String>> = Lazy::new(|| {
    FallbackChain::uniform(
        &["a.tm-user-info__username", "span.tm-user-info__username"],
        trimmed_text,
    )
});

static ANNOTATION: Lazy<FallbackChain<String>> = Lazy::new(|| {
    FallbackChain::uniform(
        &[
            ".tm-article-snippet__description",
            ".article-formatted-body",
            ".tm-article-snippet",
        ],
        collapsed_text,
    )
});

/// Headline text and raw `href` of a result's title link.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TitleLink {
    title: Option<String>,
    href: Option<String>,
}

fn title_link(link: ElementRef<'_>) -> Option<TitleLink> {
    let title = trimmed_text(link);
    let href = link
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string);
    if title.is_none() && href.is_none() {
        return None;
    }
    Some(TitleLink { title, href })
}

/// Drop the query string from `href` and resolve it against `base`.
pub fn canonicalize_url(base: &Url, href: &str) -> Option<String> {
    let without_query = href.split('?').next().unwrap_or_default();
    base.join(without_query).ok().map(|u| u.to_string())
}

/// Build the search URL for one results page.
pub fn search_url(config: &ScraperConfig, params: &SearchParams, page: u32) -> String {
    format!(
        "{}{}?q={}&target_type=posts&order=relevance&period={}&page={}",
        config.base_url.trim_end_matches('/'),
        config.search_path,
        urlencoding::encode(&params.query),
        params.period,
        page
    )
}

/// Parse one search results page into records, in document order.
///
/// An empty vector means the page holds no result items.
pub fn parse_search_page(html: &str, base: &Url) -> Vec<ArticleRecord> {
    let document = Html::parse_document(html);
    select_all_first_nonempty(&document, &RESULT_ITEMS)
        .into_iter()
        .map(|item| {
            let link = TITLE_LINK.first(item);
            let (title, href) = match link {
                Some(TitleLink { title, href }) => (title, href),
                None => (None, None),
            };
            ArticleRecord {
                title,
                url: href.and_then(|h| canonicalize_url(base, &h)),
                authors: AUTHOR.first(item),
                annotation: ANNOTATION.first(item),
                text: None,
            }
        })
        .collect()
}

/// Why a harvesting run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every requested page was processed.
    PageLimit,
    /// The page had no result items.
    EmptyPage { page: u32 },
    /// The server answered with an error status (after any retry).
    HttpStatus { page: u32, status: u16 },
    /// The request failed before a status was received, or the body could not be read.
    Network { page: u32, message: String },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::PageLimit => write!(f, "page limit reached"),
            StopReason::EmptyPage { page } => write!(f, "page {page} is empty"),
            StopReason::HttpStatus { page, status } => {
                write!(f, "page {page} failed with HTTP {status}")
            }
            StopReason::Network { page, message } => {
                write!(f, "page {page} failed: {message}")
            }
        }
    }
}

/// Result of a harvesting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// Accepted records in discovery order.
    pub articles: Vec<ArticleRecord>,
    /// Pages whose items were processed.
    pub pages_scraped: u32,
    /// Items dropped because their title was already harvested.
    pub duplicates_skipped: usize,
    pub stop: StopReason,
}

/// Walks the search result pages of one query.
#[derive(Debug)]
pub struct SearchHarvester {
    config: ScraperConfig,
    base: Url,
    client: Client,
    fetcher: ArticleTextFetcher,
}

impl SearchHarvester {
    pub fn new(config: ScraperConfig) -> Result<Self, Box<dyn Error>> {
        let base = Url::parse(&config.base_url)?;
        let client = build_client(&config)?;
        let fetcher = ArticleTextFetcher::new(client.clone());
        Ok(Self {
            config,
            base,
            client,
            fetcher,
        })
    }

    /// Harvest records for `params`, returning what was collected.
    ///
    /// Page counts and the stop reason are logged, not returned.
    pub async fn harvest(&self, params: &SearchParams) -> Vec<ArticleRecord> {
        let outcome = self.run(params).await;
        info!(
            total = outcome.articles.len(),
            pages_scraped = outcome.pages_scraped,
            duplicates_skipped = outcome.duplicates_skipped,
            stop = %outcome.stop,
            "Harvest finished"
        );
        outcome.articles
    }

    /// Harvest records and report how the run ended.
    ///
    /// # Arguments
    ///
    /// * `params` - Query, period, page limit and full-text flag
    ///
    /// # Returns
    ///
    /// A [`HarvestOutcome`] with the accepted records in discovery order, the
    /// number of pages processed, the duplicates dropped and the [`StopReason`].
    #[instrument(level = "info", skip(self, params), fields(query = %params.query, period = %params.period))]
    pub async fn run(&self, params: &SearchParams) -> HarvestOutcome {
        let mut articles: Vec<ArticleRecord> = Vec::new();
        let mut seen_titles: HashSet<String> = HashSet::new();
        let mut duplicates_skipped = 0usize;
        let mut pages_scraped = 0u32;
        let mut retried = false;
        let mut page = 1u32;

        let stop = loop {
            if page > params.max_pages {
                break StopReason::PageLimit;
            }

            let url = search_url(&self.config, params, page);
            info!(page, %url, "Scraping page | start");

            let body = match fetch_html(&self.client, &url).await {
                Ok(body) => body,
                Err(e) => match e.status().map(|s| s.as_u16()) {
                    Some(status) if !retried && self.config.is_retryable(status) => {
                        warn!(
                            page,
                            status,
                            delay = ?self.config.retry_delay(),
                            "Scraping page | failed | retrying once"
                        );
                        retried = true;
                        sleep(self.config.retry_delay()).await;
                        continue;
                    }
                    Some(status) => {
                        error!(page, status, error = %e, "Scraping page | failed | HTTP error");
                        break StopReason::HttpStatus { page, status };
                    }
                    None => {
                        error!(page, error = %e, "Scraping page | failed | network error");
                        break StopReason::Network {
                            page,
                            message: e.to_string(),
                        };
                    }
                },
            };
            retried = false;

            let items = parse_search_page(&body, &self.base);
            if items.is_empty() {
                info!(page, "Scraping page | done | page is empty");
                break StopReason::EmptyPage { page };
            }
            debug!(page, items = items.len(), "Parsed result items");

            for mut record in items {
                if let Some(title) = record.non_empty_title() {
                    if seen_titles.contains(title) {
                        warn!(page, %title, "[DUPLICATE] Article already scraped | skip");
                        duplicates_skipped += 1;
                        continue;
                    }
                }

                if params.fetch_full_text {
                    if let Some(article_url) = record.url.clone() {
                        record.text = Some(self.fetcher.fetch_text(&article_url).await);
                        self.pause(self.config.article_delay()).await;
                    }
                }

                if record.is_identifiable() {
                    if let Some(title) = record.non_empty_title() {
                        seen_titles.insert(title.to_string());
                    }
                    articles.push(record);
                }
            }

            pages_scraped += 1;
            info!(page, total = articles.len(), "Scraping page | done");
            page += 1;
            self.pause(self.config.page_delay()).await;
        };

        HarvestOutcome {
            articles,
            pages_scraped,
            duplicates_skipped,
            stop,
        }
    }

    /// Politeness pause with random jitter.
    async fn pause(&self, base: Duration) {
        let jitter_ms = if self.config.politeness_jitter_ms == 0 {
            0
        } else {
            rng().random_range(0..=self.config.politeness_jitter_ms)
        };
        let delay = base + Duration::from_millis(jitter_ms);
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
