// Proxy A1C Trend
//
// Smoothed estimate over daily nutrition reports. Each day's carbs, fiber,
// protein and fat deviate from a baseline; the deviations accumulate with a
// small damping factor on top of a slow linear improvement.

use serde::Serialize;

use crate::domain::history::ReportHistory;
use crate::domain::report::A1cReport;

/// Coefficients of the proxy formula
#[derive(Debug, Clone, PartialEq)]
pub struct TrendModel {
    /// A1C (%) at day 0
    pub base_a1c: f64,
    /// Expected A1C (%) at the last day
    pub target_a1c: f64,
    /// Linear drift per day
    pub daily_slope: f64,
    /// Weight applied to the running sum of adjustments
    pub damping: f64,
    pub carbs_baseline_g: f64,
    pub carbs_weight: f64,
    pub fiber_baseline: f64,
    pub fiber_weight: f64,
    pub protein_baseline_g: f64,
    pub protein_weight: f64,
    pub fat_baseline_g: f64,
    pub fat_weight: f64,
    /// Offset of the best case below the projection
    pub best_case_offset: f64,
    /// Offset of the worst case above the projection
    pub worst_case_offset: f64,
}

impl Default for TrendModel {
    fn default() -> Self {
        Self {
            base_a1c: 6.4,
            target_a1c: 5.8,
            daily_slope: -0.0025,
            damping: 0.02,
            carbs_baseline_g: 110.0,
            carbs_weight: 0.0006,
            fiber_baseline: 6.0,
            fiber_weight: 0.010,
            protein_baseline_g: 90.0,
            protein_weight: 0.0003,
            fat_baseline_g: 75.0,
            fat_weight: 0.0002,
            best_case_offset: 0.08,
            worst_case_offset: 0.12,
        }
    }
}

/// One day of the series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub actual: f64,
    pub projected: f64,
    pub best_case: f64,
    pub worst_case: f64,
    pub fiber: f64,
    pub protein_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    /// Index of the most recent day
    pub current_index: Option<usize>,
}

impl TrendModel {
    /// Daily adjustment from one report's deviations
    pub fn adjustment(&self, report: &A1cReport) -> f64 {
        (report.daily_total_carbs_g.midpoint() - self.carbs_baseline_g) * self.carbs_weight
            - (report.fiber_score_0_10 - self.fiber_baseline) * self.fiber_weight
            - (report.protein_g - self.protein_baseline_g) * self.protein_weight
            + (report.fat_g - self.fat_baseline_g) * self.fat_weight
    }

    /// Build the series for a date-ordered history
    pub fn project(&self, history: &ReportHistory) -> TrendSeries {
        let reports = history.reports();
        let projected = linspace(self.base_a1c, self.target_a1c, reports.len());

        let mut cumulative = 0.0;
        let points: Vec<TrendPoint> = reports
            .iter()
            .zip(projected)
            .enumerate()
            .map(|(day, (report, projected))| {
                cumulative += self.adjustment(report);
                TrendPoint {
                    date: report.date.clone(),
                    actual: self.base_a1c + self.daily_slope * day as f64 + cumulative * self.damping,
                    projected,
                    best_case: projected - self.best_case_offset,
                    worst_case: projected + self.worst_case_offset,
                    fiber: report.fiber_score_0_10,
                    protein_g: report.protein_g,
                    fat_g: report.fat_g,
                }
            })
            .collect();

        // History is sorted by date, so the latest day is the last point
        let current_index = points.len().checked_sub(1);

        TrendSeries {
            points,
            current_index,
        }
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
