//! Data models for harvested articles and search parameters.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One article discovered on a search results page
//! - [`Period`]: The publication window accepted by the search endpoint
//! - [`SearchParams`]: Everything a single harvesting run needs to know
//! - [`SearchReport`]: The JSON document written by the JSON output

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An article as discovered on a search results page.
///
/// Every field is optional because the markup of a result item varies between
/// site layouts. The harvester only keeps records that carry a non-empty title
/// or URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The headline as shown in the search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Absolute article URL with the query string removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The author's username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    /// The snippet shown under the headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// Full article body. Only present when full text was requested; an empty
    /// string means the fetch failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ArticleRecord {
    /// Title if present and non-empty.
    pub fn non_empty_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether the record carries enough to be worth keeping.
    pub fn is_identifiable(&self) -> bool {
        self.non_empty_title().is_some() || self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Publication window filter of the search endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Year,
    Month,
    Week,
    Day,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Year => "year",
            Period::Month => "month",
            Period::Week => "week",
            Period::Day => "day",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "year" => Ok(Period::Year),
            "month" => Ok(Period::Month),
            "week" => Ok(Period::Week),
            "day" => Ok(Period::Day),
            other => Err(format!(
                "unknown period '{other}', expected one of all/year/month/week/day"
            )),
        }
    }
}

/// Parameters of a single harvesting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Raw search term; percent-encoded when the URL is built.
    pub query: String,
    /// Highest page number to request (inclusive, at least 1).
    pub max_pages: u32,
    pub period: Period,
    /// Fetch every article page and attach its body text.
    pub fetch_full_text: bool,
}

/// JSON output document.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchReport {
    /// The search term the articles were harvested for.
    pub query: String,
    /// Publication window used for the search.
    pub period: Period,
    /// Whether article bodies were fetched.
    pub full_text: bool,
    /// Local time the report was written, RFC 3339.
    pub scraped_at: String,
    /// Harvested articles in discovery order.
    pub articles: Vec<ArticleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parsing_is_case_insensitive() {
        assert_eq!("Week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!(" day ".parse::<Period>().unwrap(), Period::Day);
        assert_eq!("ALL".parse::<Period>().unwrap(), Period::All);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_display_matches_query_value() {
        assert_eq!(Period::Month.to_string(), "month");
        assert_eq!(Period::default(), Period::All);
    }

    #[test]
    fn test_record_without_text_has_no_text_key() {
        let record = ArticleRecord {
            title: Some("Ownership in Rust".to_string()),
            url: Some("https://habr.com/ru/articles/1/".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["title"], "Ownership in Rust");
    }

    #[test]
    fn test_record_with_empty_text_keeps_key() {
        let record = ArticleRecord {
            title: Some("Borrowing".to_string()),
            text: Some(String::new()),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["text"], "");
    }

    #[test]
    fn test_is_identifiable() {
        assert!(!ArticleRecord::default().is_identifiable());
        assert!(
            !ArticleRecord {
                title: Some(String::new()),
                ..Default::default()
            }
            .is_identifiable()
        );
        assert!(
            ArticleRecord {
                url: Some("https://habr.com/ru/articles/2/".to_string()),
                ..Default::default()
            }
            .is_identifiable()
        );
    }

    #[test]
    fn test_search_report_deserialization() {
        let json = r#"{
            "query": "rust",
            "period": "week",
            "full_text": false,
            "scraped_at": "2025-05-06T20:30:00+03:00",
            "articles": [{"title": "A", "url": "https://habr.com/ru/articles/3/"}]
        }"#;

        let report: SearchReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.period, Period::Week);
        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].text, None);
    }
}
