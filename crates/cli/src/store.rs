// Report history persisted as a JSON array

use anyhow::{Context, Result};
use pfolio_core::domain::ReportHistory;
use std::path::Path;

/// Missing file means an empty history
pub fn load_history(path: &Path) -> Result<ReportHistory> {
    if !path.exists() {
        return Ok(ReportHistory::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(ReportHistory::new());
    }
    serde_json::from_str(&text)
        .with_context(|| format!("History file {} is not a report list", path.display()))
}

pub fn save_history(path: &Path, history: &ReportHistory) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(history)?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write history file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_history() {
        let history = load_history(Path::new("/nonexistent/pfolio/history.json")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = std::env::temp_dir().join(format!("pfolio-history-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();

        assert!(load_history(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_history_roundtrip() {
        let path = std::env::temp_dir().join(format!("pfolio-history-{}.json", std::process::id()));
        save_history(&path, &ReportHistory::new()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(load_history(&path).unwrap().is_empty());

        std::fs::remove_file(&path).unwrap();
    }
}
