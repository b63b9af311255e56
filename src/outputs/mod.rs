//! Output sinks for harvested articles.
//!
//! # Submodules
//!
//! - [`csv`]: BOM-prefixed CSV file, the default format
//! - [`json`]: `SearchReport` JSON document
//! - [`console`]: numbered listing printed after a run

pub mod console;
pub mod csv;
pub mod json;

use clap::ValueEnum;

/// File format used when saving results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// File name used when none is given.
    pub fn default_filename(self) -> &'static str {
        match self {
            OutputFormat::Csv => "articles.csv",
            OutputFormat::Json => "articles.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filename_matches_format() {
        assert_eq!(OutputFormat::Csv.default_filename(), "articles.csv");
        assert_eq!(OutputFormat::Json.default_filename(), "articles.json");
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }
}
