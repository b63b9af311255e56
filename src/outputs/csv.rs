//! CSV output.
//!
//! The file starts with a UTF-8 byte order mark so spreadsheet applications
//! pick the right encoding for Cyrillic titles. Columns are
//! `title, authors, annotation, [text,] url`; the `text` column only exists
//! when article bodies were fetched.

use crate::models::ArticleRecord;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column names in output order.
pub fn header(include_text: bool) -> Vec<&'static str> {
    if include_text {
        vec!["title", "authors", "annotation", "text", "url"]
    } else {
        vec!["title", "authors", "annotation", "url"]
    }
}

/// Replace carriage returns and line feeds with spaces.
pub fn flatten_newlines(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn field(value: &Option<String>) -> String {
    value.as_deref().map(flatten_newlines).unwrap_or_default()
}

/// Render records as CSV bytes, BOM included.
pub fn render(articles: &[ArticleRecord], include_text: bool) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(header(include_text))?;

    for article in articles {
        let mut row = vec![
            field(&article.title),
            field(&article.authors),
            field(&article.annotation),
        ];
        if include_text {
            row.push(field(&article.text));
        }
        row.push(field(&article.url));
        writer.write_record(&row)?;
    }

    Ok(writer.into_inner()?)
}

/// Write records to `path` as CSV.
///
/// # Arguments
///
/// * `path` - Destination file, replaced if it exists
/// * `articles` - Records in output order
/// * `include_text` - Whether to add the `text` column
///
/// # Returns
///
/// `Ok(())` once the file is written; rendering and I/O errors are returned.
#[instrument(level = "info", skip(articles), fields(count = articles.len()))]
pub async fn write_articles(
    path: &str,
    articles: &[ArticleRecord],
    include_text: bool,
) -> Result<(), Box<dyn Error>> {
    let bytes = render(articles, include_text)?;
    fs::write(path, bytes).await?;
    info!(path, "Wrote CSV file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(i: usize) -> ArticleRecord {
        ArticleRecord {
            title: Some(format!("Статья {i}")),
            url: Some(format!("https://habr.com/ru/articles/{i}/")),
            authors: Some(format!("author{i}")),
            annotation: Some(format!("Line one\r\nline two of {i}")),
            text: Some(format!("Body,\n\"quoted\" {i}")),
        }
    }

    fn read_back(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        assert!(bytes.starts_with(UTF8_BOM));
        let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_round_trip_with_text() {
        let articles: Vec<_> = (1..=3).map(record).collect();
        let (headers, rows) = read_back(&render(&articles, true).unwrap());

        assert_eq!(headers, vec!["title", "authors", "annotation", "text", "url"]);
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            let n = i + 1;
            assert_eq!(row.len(), 5);
            assert_eq!(row[0], format!("Статья {n}"));
            assert_eq!(row[1], format!("author{n}"));
            assert_eq!(row[2], format!("Line one  line two of {n}"));
            assert_eq!(row[3], format!("Body, \"quoted\" {n}"));
            assert_eq!(row[4], format!("https://habr.com/ru/articles/{n}/"));
        }
    }

    #[test]
    fn test_text_column_omitted_without_full_text() {
        let articles = vec![record(1)];
        let (headers, rows) = read_back(&render(&articles, false).unwrap());

        assert_eq!(headers, vec!["title", "authors", "annotation", "url"]);
        assert_eq!(rows[0].len(), 4);
        assert_eq!(rows[0][3], "https://habr.com/ru/articles/1/");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let articles = vec![ArticleRecord {
            url: Some("https://habr.com/ru/articles/7/".to_string()),
            ..Default::default()
        }];
        let (_, rows) = read_back(&render(&articles, true).unwrap());
        assert_eq!(rows[0], vec!["", "", "", "", "https://habr.com/ru/articles/7/"]);
    }

    #[test]
    fn test_empty_result_still_has_header() {
        let (headers, rows) = read_back(&render(&[], false).unwrap());
        assert_eq!(headers.len(), 4);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_write_articles_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        let path = path.to_str().unwrap();

        write_articles(path, &[record(1), record(2)], false)
            .await
            .unwrap();

        let bytes = std::fs::read(path).unwrap();
        let (_, rows) = read_back(&bytes);
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let result = write_articles("/definitely/not/here/articles.csv", &[record(1)], false).await;
        assert!(result.is_err());
    }
}
