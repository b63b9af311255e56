//! JSON output.
//!
//! Writes a [`SearchReport`] wrapping the harvested articles together with
//! the query that produced them. Articles harvested without full text carry
//! no `text` key at all.

use crate::models::{ArticleRecord, SearchParams, SearchReport};
use chrono::Local;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Assemble the report for a finished run, stamped with the current local time.
pub fn build_report(params: &SearchParams, articles: Vec<ArticleRecord>) -> SearchReport {
    SearchReport {
        query: params.query.clone(),
        period: params.period,
        full_text: params.fetch_full_text,
        scraped_at: Local::now().to_rfc3339(),
        articles,
    }
}

/// Serialize `report` to `path` as pretty-printed JSON.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `report` - Report built by [`build_report`]
///
/// # Returns
///
/// `Ok(())` on success, or the serialization or write error.
#[instrument(level = "info", skip(report), fields(count = report.articles.len()))]
pub async fn write_report(path: &str, report: &SearchReport) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).await?;
    info!(path, "Wrote JSON report");
    Ok(())
}
