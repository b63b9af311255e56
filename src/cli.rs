//! Command-line interface definitions for the Habr scraper.
//!
//! Search parameters can be given as flags; when `--query` is missing (or
//! `--interactive` is set) the scraper asks for them on the terminal instead.
//! Network settings come from an optional YAML file and can be overridden
//! with the flags below.

use crate::config::ScraperConfig;
use crate::models::{Period, SearchParams};
use crate::outputs::OutputFormat;
use clap::Parser;

/// Command-line arguments for the Habr scraper.
///
/// # Examples
///
/// ```sh
/// # Two pages of this week's results, metadata only
/// habr_scraper -q rust -p 2 --period week -o rust.csv
///
/// # Full article text, saved as JSON
/// habr_scraper -q "async rust" -t --format json -o rust.json
///
/// # Ask for everything interactively
/// habr_scraper -i
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search term
    #[arg(short, long)]
    pub query: Option<String>,

    /// Number of result pages to scrape
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Publication period to search in
    #[arg(long, value_enum, default_value_t = Period::All)]
    pub period: Period,

    /// Also fetch the full text of every article
    #[arg(short = 't', long)]
    pub full_text: bool,

    /// File to save results to; results are only listed when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Format of the output file
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Optional path to a YAML scraper configuration
    #[arg(short, long, env = "HABR_SCRAPER_CONFIG")]
    pub config: Option<String>,

    /// Request timeout in seconds (overrides the configuration file)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Site origin (overrides the configuration file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Prompt for search parameters even if flags were given
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Whether the search parameters have to be collected interactively.
    pub fn needs_prompt(&self) -> bool {
        self.interactive || self.query.as_deref().is_none_or(|q| q.trim().is_empty())
    }

    /// Search parameters from flags, `None` if no query was given.
    pub fn search_params(&self) -> Option<SearchParams> {
        let query = self.query.as_deref()?.trim();
        if query.is_empty() {
            return None;
        }
        Some(SearchParams {
            query: query.to_string(),
            max_pages: self.pages,
            period: self.period,
            fetch_full_text: self.full_text,
        })
    }

    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, mut config: ScraperConfig) -> ScraperConfig {
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "habr_scraper",
            "--query",
            "rust",
            "--pages",
            "2",
            "--period",
            "week",
            "--output",
            "rust.csv",
        ]);

        assert!(!cli.needs_prompt());
        assert_eq!(cli.output.as_deref(), Some("rust.csv"));
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(
            cli.search_params(),
            Some(SearchParams {
                query: "rust".to_string(),
                max_pages: 2,
                period: Period::Week,
                fetch_full_text: false,
            })
        );
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["habr_scraper", "-q", "go", "-p", "3", "-t", "-o", "/tmp/go.json"]);

        let params = cli.search_params().unwrap();
        assert_eq!(params.max_pages, 3);
        assert!(params.fetch_full_text);
        assert_eq!(params.period, Period::All);
    }

    #[test]
    fn test_missing_query_needs_prompt() {
        let cli = Cli::parse_from(["habr_scraper"]);
        assert!(cli.needs_prompt());
        assert_eq!(cli.search_params(), None);

        let cli = Cli::parse_from(["habr_scraper", "-q", "rust", "-i"]);
        assert!(cli.needs_prompt());
    }

    #[test]
    fn test_zero_pages_rejected() {
        assert!(Cli::try_parse_from(["habr_scraper", "-q", "rust", "-p", "0"]).is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::parse_from([
            "habr_scraper",
            "--timeout-secs",
            "60",
            "--base-url",
            "http://localhost:9000",
            "--format",
            "json",
        ]);
        let config = cli.apply_overrides(ScraperConfig::default());

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.search_path, ScraperConfig::default().search_path);
    }
}
