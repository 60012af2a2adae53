// Diet Log - free-text daily entries keyed by date (from a spreadsheet export)

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::error::{DomainError, Result};

/// Columns the sheet must provide
pub const DATE_COLUMN: &str = "date";
pub const ENTRY_TEXT_COLUMN: &str = "entry_text";

/// Date layouts accepted in the sheet
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietEntry {
    pub date: NaiveDate,
    pub entry_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DietLog {
    entries: Vec<DietEntry>,
}

impl DietLog {
    /// Build from a header row and data rows.
    ///
    /// Header names are trimmed and lower-cased before lookup. Short rows
    /// count as empty cells.
    pub fn from_table(headers: &[String], rows: &[Vec<String>]) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let position = |name: &str| normalized.iter().position(|h| h == name);

        let (date_idx, text_idx) = match (position(DATE_COLUMN), position(ENTRY_TEXT_COLUMN)) {
            (Some(d), Some(t)) => (d, t),
            _ => {
                return Err(DomainError::ValidationError(format!(
                    "Sheet must contain columns: {}, {}",
                    DATE_COLUMN, ENTRY_TEXT_COLUMN
                )))
            }
        };

        let mut entries = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let raw_date = row.get(date_idx).map(|s| s.trim()).unwrap_or("");
            if raw_date.is_empty() && row.iter().all(|cell| cell.trim().is_empty()) {
                // Trailing blank lines in exported sheets
                continue;
            }
            let date = parse_date(raw_date).ok_or_else(|| {
                DomainError::ValidationError(format!(
                    "Row {}: unrecognised date '{}'",
                    line + 2,
                    raw_date
                ))
            })?;
            let entry_text = row.get(text_idx).cloned().unwrap_or_default();
            entries.push(DietEntry { date, entry_text });
        }

        entries.sort_by_key(|e| e.date);
        Ok(Self { entries })
    }

    /// All text logged for a date, joined by blank lines
    pub fn entry_text_for(&self, date: NaiveDate) -> String {
        self.entries
            .iter()
            .filter(|e| e.date == date)
            .map(|e| e.entry_text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string()
    }

    pub fn entries(&self) -> &[DietEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalise a sheet date cell
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_requires_columns() {
        let err = DietLog::from_table(&strings(&["Date", "notes"]), &[]).unwrap_err();
        assert!(err
            .to_string()
            .contains("Sheet must contain columns: date, entry_text"));
    }

    #[test]
    fn test_headers_are_normalised() {
        let log = DietLog::from_table(
            &strings(&[" DATE ", "Entry_Text"]),
            &[strings(&["2025-01-04", "oatmeal"])],
        )
        .unwrap();
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn test_entries_sorted_and_joined() {
        let log = DietLog::from_table(
            &strings(&["date", "entry_text"]),
            &[
                strings(&["01/05/2025", "dinner: salmon"]),
                strings(&["2025-01-04", "breakfast: eggs"]),
                strings(&["2025/01/04", "lunch: salad "]),
                strings(&["2025-01-06"]),
            ],
        )
        .unwrap();

        let dates: Vec<String> = log.entries().iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-01-04", "2025-01-04", "2025-01-05", "2025-01-06"]);

        let day = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        assert_eq!(log.entry_text_for(day), "breakfast: eggs\n\nlunch: salad");

        let empty_day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(log.entry_text_for(empty_day), "");

        let missing = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(log.entry_text_for(missing), "");
    }

    #[test]
    fn test_bad_date_reports_row() {
        let err = DietLog::from_table(
            &strings(&["date", "entry_text"]),
            &[strings(&["yesterday", "pizza"])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let log = DietLog::from_table(
            &strings(&["date", "entry_text"]),
            &[strings(&["2025-01-04", "eggs"]), strings(&["", ""])],
        )
        .unwrap();
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_date("2025-03-01"), expected);
        assert_eq!(parse_date("03/01/2025"), expected);
        assert_eq!(parse_date("2025-03-01T08:30:00Z"), expected);
        assert_eq!(parse_date("2025-03-01 08:30:00"), expected);
        assert_eq!(parse_date("not a date"), None);
    }
}
