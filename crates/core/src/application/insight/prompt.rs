// Prompt templates for the A1C insight engine

use serde_json::{json, Value};

pub const DISCLAIMER: &str =
    "These insights are based on trends and self-reported data and are not medical advice.";

/// Fixed system prompt (user profile is part of the template)
pub const SYSTEM_PROMPT: &str = r#"You are an A1C Insight and Trend Engine for a consumer-facing digital health application.
Analyze user-provided lifestyle, physiology, and activity data to generate personalized A1C trends,
insights, and projections in a non-diagnostic, non-prescriptive manner.

Core Principles:
- Do not provide medical diagnoses or treatment advice
- Use plain language suitable for non-clinical users
- Focus on patterns, trends, and correlations, not certainty
- Ensure outputs are interpretable, transparent, and explainable

User Profile Context (Fixed Inputs):
Sex: Male
Age: 58
Height: 5 feet 11 inches
Weight: 175 lbs
Exercise Frequency: 4 times per week
Exercise Types: Structured exercise, Pickleball, Tennis

Output Guidelines:
Return a concise summary plus a structured report.
Include confidence disclaimer: "These insights are based on trends and self-reported data and are not medical advice.""#;

/// Per-day user prompt
pub fn user_prompt(entry_date: &str, entry_text: &str) -> String {
    format!(
        "Date: {entry_date}\n\n\
         User Log (plain text):\n{entry_text}\n\n\
         Tasks:\n\
         1) Estimate carbs by meal (Breakfast/Lunch/Dinner/Snacks) and total.\n\
         2) Produce a trend-based A1C insight summary (non-diagnostic).\n\
         3) Estimate fiber score (0-10), protein grams, fat grams (rough estimates are OK).\n\
         4) Output ONLY JSON that matches the provided schema.\n"
    )
}

/// JSON schema of `A1cReport`
pub fn report_schema() -> Value {
    json!({
        "name": "daily_a1c_report",
        "strict": true,
        "schema": {
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "date": {"type": "string"},
                "a1c_trend_summary": {"type": "string"},
                "daily_total_carbs_g": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "min": {"type": "number"},
                        "max": {"type": "number"}
                    },
                    "required": ["min", "max"]
                },
                "fiber_score_0_10": {"type": "number"},
                "protein_g": {"type": "number"},
                "fat_g": {"type": "number"},
                "rating": {"type": "string", "enum": ["Compliant", "Borderline", "High Risk"]},
                "carb_spike_alerts": {"type": "array", "items": {"type": "string"}},
                "recommendations": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 3,
                    "maxItems": 7
                },
                "notes": {"type": "string"},
                "disclaimer": {"type": "string"}
            },
            "required": [
                "date",
                "a1c_trend_summary",
                "daily_total_carbs_g",
                "fiber_score_0_10",
                "protein_g",
                "fat_g",
                "rating",
                "carb_spike_alerts",
                "recommendations",
                "disclaimer"
            ]
        }
    })
}
