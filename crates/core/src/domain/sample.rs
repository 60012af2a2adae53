// Weekly prototype dataset shown by the static A1C dashboards

use serde::Serialize;

pub const WEEK_LABELS: [&str; 17] = [
    "11/23", "11/30", "12/07", "12/14", "12/21", "12/22", "12/23", "12/28", "01/04", "01/11",
    "01/18", "01/25", "02/01", "02/08", "02/15", "02/22", "03/01",
];

pub const ACTUAL_A1C: [f64; 17] = [
    6.38, 6.33, 6.29, 6.25, 6.26, 6.24, 6.25, 6.21, 6.17, 6.12, 6.07, 6.02, 5.98, 5.94, 5.90, 5.87,
    5.84,
];

pub const PROJECTED_A1C: [f64; 17] = [
    6.40, 6.25, 6.15, 6.05, 5.98, 5.96, 5.95, 5.92, 5.88, 5.85, 5.82, 5.80, 5.80, 5.80, 5.80, 5.80,
    5.80,
];

pub const FIBER_SCORE: [f64; 17] = [
    4.5, 5.2, 5.8, 6.6, 5.9, 6.4, 6.0, 6.7, 7.0, 7.2, 7.3, 7.4, 7.5, 7.6, 7.7, 7.8, 7.9,
];

pub const PROTEIN_G: [f64; 17] = [
    65.0, 72.0, 78.0, 82.0, 76.0, 92.0, 115.0, 85.0, 88.0, 90.0, 92.0, 94.0, 95.0, 96.0, 97.0,
    98.0, 99.0,
];

pub const FAT_G: [f64; 17] = [
    55.0, 58.0, 62.0, 68.0, 70.0, 72.0, 75.0, 74.0, 76.0, 78.0, 80.0, 82.0, 84.0, 86.0, 88.0, 90.0,
    92.0,
];

/// Week marked as "current" on the dashboards (12/23)
pub const CURRENT_WEEK: usize = 6;

pub const BEST_CASE_OFFSET: f64 = 0.08;
pub const WORST_CASE_OFFSET: f64 = 0.12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleWeek {
    pub label: &'static str,
    pub actual: f64,
    pub projected: f64,
    pub best_case: f64,
    pub worst_case: f64,
    pub fiber: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub current: bool,
}

pub fn weekly_sample() -> Vec<SampleWeek> {
    (0..WEEK_LABELS.len())
        .map(|i| SampleWeek {
            label: WEEK_LABELS[i],
            actual: ACTUAL_A1C[i],
            projected: PROJECTED_A1C[i],
            best_case: PROJECTED_A1C[i] - BEST_CASE_OFFSET,
            worst_case: PROJECTED_A1C[i] + WORST_CASE_OFFSET,
            fiber: FIBER_SCORE[i],
            protein_g: PROTEIN_G[i],
            fat_g: FAT_G[i],
            current: i == CURRENT_WEEK,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_sample_shape() {
        let weeks = weekly_sample();
        assert_eq!(weeks.len(), 17);
        assert_eq!(weeks.iter().filter(|w| w.current).count(), 1);
        assert_eq!(weeks[CURRENT_WEEK].label, "12/23");
        assert!((weeks[0].worst_case - 6.52).abs() < 1e-9);
        assert!(weeks.iter().all(|w| w.best_case < w.worst_case));
    }
}
