// Diet log sources: published spreadsheet (CSV export URL) or local CSV file

use crate::connection::{create_client, describe, parse_base_url};
use async_trait::async_trait;
use pfolio_core::domain::DietLog;
use pfolio_core::error::{AppError, Result};
use pfolio_core::port::{DietLogSource, GatewayError};
use reqwest::{Client, Url};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

const SHEET_TIMEOUT: Duration = Duration::from_secs(30);

enum Location {
    Url(Url),
    File(PathBuf),
}

pub struct CsvSheetSource {
    location: Location,
    client: Option<Client>,
}

impl CsvSheetSource {
    /// Published sheet; `pubhtml` links are rewritten to their CSV export
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = parse_base_url(&csv_export_url(raw))?;
        Ok(Self {
            location: Location::Url(url),
            client: Some(create_client()?),
        })
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            client: None,
        }
    }

    async fn read_text(&self) -> Result<String> {
        match (&self.location, &self.client) {
            (Location::File(path), _) => {
                debug!(path = %path.display(), "Reading diet log file");
                Ok(tokio::fs::read_to_string(path).await?)
            }
            (Location::Url(url), Some(client)) => {
                debug!(url = %url, "Downloading diet log sheet");
                let response = client
                    .get(url.clone())
                    .timeout(SHEET_TIMEOUT)
                    .send()
                    .await
                    .map_err(|e| GatewayError::Network(describe(&e)))?;
                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| GatewayError::Network(describe(&e)))?;
                if !status.is_success() {
                    return Err(GatewayError::Rejected {
                        status: status.as_u16(),
                        body: text,
                    }
                    .into());
                }
                Ok(text)
            }
            (Location::Url(_), None) => Err(AppError::Internal(
                "Sheet source has no HTTP client".to_string(),
            )),
        }
    }
}

#[async_trait]
impl DietLogSource for CsvSheetSource {
    async fn load(&self) -> Result<DietLog> {
        let text = self.read_text().await?;
        let log = diet_log_from_csv(&text)?;
        info!(entries = log.entries().len(), "Diet log loaded");
        Ok(log)
    }
}

/// Parse CSV text and validate it as a diet log
pub fn diet_log_from_csv(text: &str) -> Result<DietLog> {
    let mut rows = parse_csv(text)?;
    if rows.is_empty() {
        return Err(AppError::Validation("Sheet is empty".to_string()));
    }
    let headers = rows.remove(0);
    Ok(DietLog::from_table(&headers, &rows)?)
}

/// Split CSV text into rows of fields.
///
/// Handles quoted fields (with `""` escapes and embedded newlines), CRLF line
/// endings and a leading byte-order mark. Empty lines are dropped.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Current field opened with a quote; a later quote is literal
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
                quoted = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(AppError::Validation(
            "Unterminated quoted field in CSV".to_string(),
        ));
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }
    Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|cell| !cell.is_empty()) {
        rows.push(row);
    }
}

/// Rewrite a Google Sheets "publish to web" HTML link to its CSV export.
///
/// `.../pubhtml?gid=0&single=true` becomes `.../pub?output=csv&gid=0&single=true`.
/// Other URLs are returned unchanged.
pub fn csv_export_url(raw: &str) -> String {
    let raw = raw.trim();
    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    };
    let Some(prefix) = path.strip_suffix("/pubhtml") else {
        return raw.to_string();
    };

    let mut url = format!("{}/pub?output=csv", prefix);
    for pair in query.unwrap_or("").split('&') {
        if pair.is_empty() || pair.starts_with("output=") {
            continue;
        }
        url.push('&');
        url.push_str(pair);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_csv_quotes_and_newlines() {
        let text = "date,entry_text\r\n2025-01-04,\"Breakfast: oats, berries\nDinner: \"\"light\"\"\"\r\n\r\n";
        let rows = parse_csv(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["date", "entry_text"]);
        assert_eq!(rows[1][1], "Breakfast: oats, berries\nDinner: \"light\"");
    }

    #[test]
    fn test_parse_csv_trailing_empty_field() {
        let rows = parse_csv("a,b,\n1,2,").unwrap();
        assert_eq!(rows, vec![vec!["a", "b", ""], vec!["1", "2", ""]]);
    }

    #[test]
    fn test_parse_csv_empty_quoted_fields() {
        let rows = parse_csv("\"\",x\n2025-01-04,\"\"\n\"\"\"\",y\n").unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["", "x"],
                vec!["2025-01-04", ""],
                vec!["\"", "y"],
            ]
        );
    }

    #[test]
    fn test_parse_csv_quote_after_closed_field_is_literal() {
        let rows = parse_csv("\"a\"b\"c,d\n").unwrap();
        assert_eq!(rows, vec![vec!["ab\"c", "d"]]);
    }

    #[test]
    fn test_parse_csv_unterminated_quote() {
        tokio_test::assert_err!(parse_csv("date,entry_text\n2025-01-04,\"open"));
    }

    #[test]
    fn test_parse_csv_strips_bom() {
        let rows = parse_csv("\u{feff}date,entry_text\n").unwrap();
        assert_eq!(rows[0][0], "date");
    }

    #[test]
    fn test_diet_log_from_csv() {
        let text = "Date,Entry_Text\n2025-01-04,eggs\n01/04/2025,salad\n2025-01-05,fish\n";
        let log = diet_log_from_csv(text).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        assert_eq!(log.entry_text_for(day), "eggs\n\nsalad");
        assert_eq!(log.entries().len(), 3);
    }

    #[test]
    fn test_diet_log_from_csv_missing_column() {
        let err = diet_log_from_csv("day,notes\n2025-01-04,eggs\n").unwrap_err();
        assert!(err.to_string().contains("date, entry_text"));
    }

    #[test]
    fn test_diet_log_from_empty_csv() {
        assert!(matches!(diet_log_from_csv("\n\n"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_csv_export_url() {
        assert_eq!(
            csv_export_url("https://docs.google.com/spreadsheets/d/e/KEY/pubhtml?gid=0&single=true"),
            "https://docs.google.com/spreadsheets/d/e/KEY/pub?output=csv&gid=0&single=true"
        );
        assert_eq!(
            csv_export_url("https://docs.google.com/spreadsheets/d/e/KEY/pubhtml"),
            "https://docs.google.com/spreadsheets/d/e/KEY/pub?output=csv"
        );
        let csv = "https://docs.google.com/spreadsheets/d/e/KEY/pub?output=csv";
        assert_eq!(csv_export_url(csv), csv);
    }

    #[tokio::test]
    async fn test_file_source() {
        let path = std::env::temp_dir().join(format!("pfolio-sheet-{}.csv", std::process::id()));
        tokio::fs::write(&path, "date,entry_text\n2025-01-04,eggs\n")
            .await
            .unwrap();

        let log = tokio_test::assert_ok!(CsvSheetSource::from_file(path.clone()).load().await);
        assert_eq!(log.entries().len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = CsvSheetSource::from_file("/nonexistent/pfolio/diet.csv");
        assert!(matches!(source.load().await, Err(AppError::Io(_))));
    }
}
