// Report History - caller-owned, ordered by date, one report per date

use serde::{Deserialize, Serialize};

use crate::domain::report::A1cReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<A1cReport>", into = "Vec<A1cReport>")]
pub struct ReportHistory {
    reports: Vec<A1cReport>,
}

impl ReportHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the report with the same date, else append; keeps date order
    pub fn upsert(&mut self, report: A1cReport) {
        self.reports.retain(|r| r.date != report.date);
        self.reports.push(report);
        // ISO dates sort lexicographically; stable sort keeps ties in arrival order
        self.reports.sort_by(|a, b| a.date.cmp(&b.date));
    }

    /// Report with the latest date
    pub fn latest(&self) -> Option<&A1cReport> {
        self.reports.last()
    }

    pub fn get(&self, date: &str) -> Option<&A1cReport> {
        self.reports.iter().find(|r| r.date == date)
    }

    pub fn reports(&self) -> &[A1cReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl From<Vec<A1cReport>> for ReportHistory {
    fn from(reports: Vec<A1cReport>) -> Self {
        reports.into_iter().collect()
    }
}

impl From<ReportHistory> for Vec<A1cReport> {
    fn from(history: ReportHistory) -> Self {
        history.reports
    }
}

impl FromIterator<A1cReport> for ReportHistory {
    fn from_iter<T: IntoIterator<Item = A1cReport>>(iter: T) -> Self {
        let mut history = Self::new();
        for report in iter {
            history.upsert(report);
        }
        history
    }
}
