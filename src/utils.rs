//! Small helpers for logging and output paths.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut at a character boundary with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Create the directory that will hold `file_path` if it does not exist yet.
#[instrument(level = "debug")]
pub async fn ensure_parent_dir(file_path: &str) -> Result<(), Box<dyn Error>> {
    let Some(parent) = Path::new(file_path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(parent).await?;
    debug!(dir = %parent.display(), "Output directory ready");
    Ok(())
}
