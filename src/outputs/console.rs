//! Human-readable listing of harvested articles.

use crate::models::ArticleRecord;
use std::io::{self, Write};

const UNTITLED: &str = "Untitled";

/// Print `Found N articles:` followed by one numbered line per article.
pub fn print_articles<W: Write>(out: &mut W, articles: &[ArticleRecord]) -> io::Result<()> {
    writeln!(out, "Found {} articles:\n", articles.len())?;
    for (idx, article) in articles.iter().enumerate() {
        writeln!(
            out,
            "[{}] {} - {}",
            idx + 1,
            article.non_empty_title().unwrap_or(UNTITLED),
            article.url.as_deref().unwrap_or_default()
        )?;
    }
    out.flush()
}
