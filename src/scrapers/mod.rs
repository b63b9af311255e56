//! Habr scraping pipeline.
//!
//! Scraping happens in two stages:
//!
//! 1. **Harvesting** ([`search`]): walk the search result pages of a query
//!    and turn every result item into an `ArticleRecord`
//! 2. **Text fetching** ([`article`]): optionally download each article and
//!    extract its body text
//!
//! | Module | Role |
//! |--------|------|
//! | [`search`] | `SearchHarvester`, page loop, dedup, stop/retry policy |
//! | [`article`] | `ArticleTextFetcher`, content container fallbacks |
//! | [`extract`] | `FallbackChain` and text helpers |
//! | [`client`] | Shared `reqwest::Client` with browser headers |
//!
//! Requests are issued strictly one after another with politeness pauses in
//! between; failures are logged and end the run early instead of erroring.

pub mod article;
pub mod client;
pub mod extract;
pub mod search;
