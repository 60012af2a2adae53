// Insight Service - diet log text in, validated A1C report out

pub mod prompt;

use crate::domain::{A1cReport, DietLog};
use crate::error::{AppError, Result};
use crate::port::{CompletionRequest, GatewayError, InsightModel};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// Sampling temperature for report generation
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

pub struct InsightService {
    model: Arc<dyn InsightModel>,
    temperature: f32,
}

impl InsightService {
    pub fn new(model: Arc<dyn InsightModel>) -> Self {
        Self {
            model,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Generate one report. Single model call, single parse attempt.
    ///
    /// # Errors
    /// - AppError::Validation if the text is blank
    /// - DomainError::ValidationError if the report breaks its constraints
    /// - AppError::Gateway on model failure or a non-JSON answer
    pub async fn generate_report(&self, entry_date: NaiveDate, entry_text: &str) -> Result<A1cReport> {
        if entry_text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "No diet log text for {}",
                entry_date
            )));
        }

        let date = entry_date.format("%Y-%m-%d").to_string();
        let request = CompletionRequest {
            system: prompt::SYSTEM_PROMPT.to_string(),
            prompt: prompt::user_prompt(&date, entry_text),
            schema: Some(prompt::report_schema()),
            temperature: self.temperature,
        };

        info!(date = %date, model = self.model.name(), "Generating A1C report");
        let answer = self.model.complete(&request).await?;

        let report = parse_report(&answer)?;
        if report.date != date {
            warn!(requested = %date, returned = %report.date, "Model returned a different date");
        }
        report.validate()?;

        info!(date = %report.date, rating = %report.rating, "A1C report generated");
        Ok(report)
    }

    /// Use the edited text when given, else the log entry for that date
    pub async fn generate_for_date(
        &self,
        log: &DietLog,
        entry_date: NaiveDate,
        override_text: Option<&str>,
    ) -> Result<A1cReport> {
        let text = match override_text {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => log.entry_text_for(entry_date),
        };
        self.generate_report(entry_date, &text).await
    }
}

/// Parse the model answer as a report, tolerating a ```json fence
pub fn parse_report(answer: &str) -> Result<A1cReport> {
    let body = strip_code_fence(answer.trim());
    serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Model answer is not a valid report");
        AppError::Gateway(GatewayError::MalformedResponse {
            status: 200,
            body: answer.to_string(),
        })
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
