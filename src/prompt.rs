//! Interactive prompts used when no query is given on the command line.
//!
//! The dialogue is driven by `dialoguer`; the answer checks it relies on are
//! plain functions so they can be exercised without a terminal.

use crate::models::{Period, SearchParams};
use crate::outputs::OutputFormat;
use clap::ValueEnum;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::error::Error;

/// What to do with the results once harvesting is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveChoice {
    Save { filename: String },
    Skip,
}

/// Reject blank search terms.
pub fn validate_query(query: &str) -> Result<(), String> {
    if query.trim().is_empty() {
        Err("The search string cannot be empty.".to_string())
    } else {
        Ok(())
    }
}

/// Page counts start at 1.
pub fn validate_pages(pages: u32) -> Result<(), String> {
    if pages >= 1 {
        Ok(())
    } else {
        Err("Please enter a whole number of at least 1.".to_string())
    }
}

/// Period shown at `index` of the selection list, `all` when out of range.
pub fn period_at(index: usize) -> Period {
    Period::value_variants()
        .get(index)
        .copied()
        .unwrap_or_default()
}

/// Empty file names fall back to the format's default.
pub fn resolve_filename(answer: &str, format: OutputFormat) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        format.default_filename().to_string()
    } else {
        answer.to_string()
    }
}

/// Terminal prompts for search parameters and the save decision.
#[derive(Default)]
pub struct Prompter {
    theme: ColorfulTheme,
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Ask for the search term, page count, period and full-text flag.
    pub fn search_params(&self) -> Result<SearchParams, Box<dyn Error>> {
        let query: String = Input::with_theme(&self.theme)
            .with_prompt("Enter search string")
            .validate_with(|input: &String| validate_query(input))
            .interact_text()?;

        let max_pages: u32 = Input::with_theme(&self.theme)
            .with_prompt("Number of pages to scrape")
            .default(1)
            .validate_with(|pages: &u32| validate_pages(*pages))
            .interact_text()?;

        let period = Select::with_theme(&self.theme)
            .with_prompt("Period")
            .items(Period::value_variants())
            .default(0)
            .interact()?;

        let fetch_full_text = Confirm::with_theme(&self.theme)
            .with_prompt("Scrape the full article text?")
            .default(false)
            .interact()?;

        Ok(SearchParams {
            query: query.trim().to_string(),
            max_pages,
            period: period_at(period),
            fetch_full_text,
        })
    }

    /// Ask whether to save the results and under which file name.
    pub fn save_choice(&self, format: OutputFormat) -> Result<SaveChoice, Box<dyn Error>> {
        let save = Confirm::with_theme(&self.theme)
            .with_prompt("Save the result to a file?")
            .default(true)
            .interact()?;
        if !save {
            return Ok(SaveChoice::Skip);
        }

        let answer: String = Input::with_theme(&self.theme)
            .with_prompt("File name")
            .default(format.default_filename().to_string())
            .interact_text()?;
        Ok(SaveChoice::Save {
            filename: resolve_filename(&answer, format),
        })
    }
}
