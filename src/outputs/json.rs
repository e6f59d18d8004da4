//! JSON output for one-shot fetches.
//!
//! Files are organized by local date, one per category:
//! `{json_output_dir}/{YYYY-MM-DD}/{CATEGORY}.json`. A later fetch for the
//! same category on the same day overwrites the earlier one.

use crate::error::Result;
use crate::models::{Category, FetchResult};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Where the batch for `category` fetched on `date` is written.
pub fn output_path(json_output_dir: &Path, date: NaiveDate, category: Category) -> PathBuf {
    json_output_dir
        .join(date.format("%Y-%m-%d").to_string())
        .join(format!("{}.json", category))
}

pub fn to_pretty_json(result: &FetchResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write `result` under `json_output_dir`, creating the dated directory.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display(), %category))]
pub async fn write_fetch_result(
    result: &FetchResult,
    json_output_dir: &Path,
    category: Category,
) -> Result<PathBuf> {
    let json = to_pretty_json(result)?;
    let path = output_path(json_output_dir, Local::now().date_naive(), category);

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), count = result.articles.len(), "Wrote JSON file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::fallback_article;

    #[test]
    fn test_output_path() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let path = output_path(Path::new("/tmp/out"), date, Category::Rockets);
        assert_eq!(path, PathBuf::from("/tmp/out/2025-05-06/ROCKETS.json"));
    }

    #[tokio::test]
    async fn test_write_fetch_result() {
        let dir = tempfile::tempdir().unwrap();
        let result = FetchResult {
            articles: vec![fallback_article("2025.05.06".to_string())],
        };

        let path = write_fetch_result(&result, dir.path(), Category::All).await.unwrap();
        assert!(path.ends_with("ALL.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: FetchResult = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, result);
        assert!(written.contains("\"readTime\": \"0 min\""));
    }
}
