// Daily A1C Insight Report
//
// Shape of the JSON object the language model is asked to return.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Bounds on the number of recommendations in a report
pub const MIN_RECOMMENDATIONS: usize = 3;
pub const MAX_RECOMMENDATIONS: usize = 7;

/// Upper bound of the fiber score scale
pub const MAX_FIBER_SCORE: f64 = 10.0;

/// Categorical day rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Compliant,
    Borderline,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Compliant => write!(f, "Compliant"),
            Rating::Borderline => write!(f, "Borderline"),
            Rating::HighRisk => write!(f, "High Risk"),
        }
    }
}

/// Estimated daily carbohydrate range in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbRange {
    pub min: f64,
    pub max: f64,
}

impl CarbRange {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A1cReport {
    /// ISO date (YYYY-MM-DD); also the history key
    pub date: String,
    pub a1c_trend_summary: String,
    pub daily_total_carbs_g: CarbRange,
    pub fiber_score_0_10: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub rating: Rating,
    pub carb_spike_alerts: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub disclaimer: String,
}

impl A1cReport {
    /// Parsed report date
    pub fn day(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            DomainError::ValidationError(format!("Invalid report date '{}': {}", self.date, e))
        })
    }

    /// Check the constraints the model was asked to honour
    pub fn validate(&self) -> Result<()> {
        self.day()?;

        let carbs = &self.daily_total_carbs_g;
        if carbs.min < 0.0 || carbs.max < carbs.min {
            return Err(DomainError::ValidationError(format!(
                "Invalid carb range: {}-{} g",
                carbs.min, carbs.max
            )));
        }

        if !(0.0..=MAX_FIBER_SCORE).contains(&self.fiber_score_0_10) {
            return Err(DomainError::ValidationError(format!(
                "Fiber score out of range: {}",
                self.fiber_score_0_10
            )));
        }

        if self.protein_g < 0.0 || self.fat_g < 0.0 {
            return Err(DomainError::ValidationError(
                "Protein and fat must be non-negative".to_string(),
            ));
        }

        let count = self.recommendations.len();
        if !(MIN_RECOMMENDATIONS..=MAX_RECOMMENDATIONS).contains(&count) {
            return Err(DomainError::ValidationError(format!(
                "Expected {}-{} recommendations, got {}",
                MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS, count
            )));
        }

        if self.disclaimer.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Disclaimer is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Valid report for the given date with the given nutrition values
    pub fn report(date: &str, carbs: (f64, f64), fiber: f64, protein: f64, fat: f64) -> A1cReport {
        A1cReport {
            date: date.to_string(),
            a1c_trend_summary: "Stable trend".to_string(),
            daily_total_carbs_g: CarbRange {
                min: carbs.0,
                max: carbs.1,
            },
            fiber_score_0_10: fiber,
            protein_g: protein,
            fat_g: fat,
            rating: Rating::Compliant,
            carb_spike_alerts: vec![],
            recommendations: vec![
                "Walk after dinner".to_string(),
                "Add legumes".to_string(),
                "Swap white rice".to_string(),
            ],
            notes: None,
            disclaimer: "Not medical advice.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::report;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_model_output() {
        let raw = json!({
            "date": "2025-01-04",
            "a1c_trend_summary": "Improving",
            "daily_total_carbs_g": {"min": 120, "max": 150},
            "fiber_score_0_10": 6.5,
            "protein_g": 95,
            "fat_g": 70,
            "rating": "High Risk",
            "carb_spike_alerts": ["Dinner pasta"],
            "recommendations": ["a", "b", "c"],
            "disclaimer": "These insights are not medical advice."
        });

        let report: A1cReport = serde_json::from_value(raw).unwrap();
        assert_eq!(report.rating, Rating::HighRisk);
        assert_eq!(report.daily_total_carbs_g.midpoint(), 135.0);
        assert!(report.notes.is_none());
        assert!(report.validate().is_ok());
    }

    #[test]
    fn test_unknown_rating_rejected() {
        let raw = json!({
            "date": "2025-01-04",
            "a1c_trend_summary": "x",
            "daily_total_carbs_g": {"min": 1, "max": 2},
            "fiber_score_0_10": 1,
            "protein_g": 1,
            "fat_g": 1,
            "rating": "Excellent",
            "recommendations": ["a", "b", "c"],
            "disclaimer": "d"
        });
        assert!(serde_json::from_value::<A1cReport>(raw).is_err());
    }

    #[test]
    fn test_validate_recommendation_bounds() {
        let mut r = report("2025-01-04", (100.0, 120.0), 5.0, 80.0, 60.0);
        r.recommendations.truncate(2);
        assert!(r.validate().unwrap_err().to_string().contains("recommendations"));

        r.recommendations = (0..8).map(|i| i.to_string()).collect();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let r = report("2025-01-04", (150.0, 120.0), 5.0, 80.0, 60.0);
        assert!(r.validate().unwrap_err().to_string().contains("carb range"));

        let r = report("2025-01-04", (100.0, 120.0), 11.0, 80.0, 60.0);
        assert!(r.validate().unwrap_err().to_string().contains("Fiber"));

        let r = report("01/04/2025", (100.0, 120.0), 5.0, 80.0, 60.0);
        assert!(r.validate().unwrap_err().to_string().contains("date"));
    }

    #[test]
    fn test_rating_display_matches_wire_format() {
        let wire = serde_json::to_value(Rating::HighRisk).unwrap();
        assert_eq!(wire, json!(Rating::HighRisk.to_string()));
    }
}
