// Terminal rendering: tables and colored status lines

use colored::Colorize;
use pfolio_core::domain::sample::SampleWeek;
use pfolio_core::domain::{A1cReport, JobPhase, JobStatus, Rating, TrendSeries, WorkflowOutput};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "")]
    marker: &'static str,
    date: String,
    actual: String,
    projected: String,
    best: String,
    worst: String,
    fiber: String,
    #[tabled(rename = "protein g")]
    protein: String,
    #[tabled(rename = "fat g")]
    fat: String,
}

#[derive(Tabled)]
struct ReportRow {
    field: &'static str,
    value: String,
}

pub fn phase_label(phase: JobPhase) -> String {
    let label = phase.to_string();
    match phase {
        JobPhase::Succeeded => label.green().bold().to_string(),
        JobPhase::Failed => label.red().bold().to_string(),
        JobPhase::Cancelled => label.yellow().bold().to_string(),
        JobPhase::Running | JobPhase::NotStarted => label.cyan().to_string(),
    }
}

fn rating_label(rating: Rating) -> String {
    let label = rating.to_string();
    match rating {
        Rating::Compliant => label.green().to_string(),
        Rating::Borderline => label.yellow().to_string(),
        Rating::HighRisk => label.red().to_string(),
    }
}

pub fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print the final snapshot and its extracted result
pub fn print_final_status(status: &JobStatus) {
    println!("  {} {}", "Status:".bold(), phase_label(status.phase()));
    println!();

    match status.output() {
        WorkflowOutput::Structured(value) => {
            println!("{}", "Result".cyan().bold());
            println!("{}", pretty_json(&value));
        }
        WorkflowOutput::Text(text) => {
            println!("{}", "Result".cyan().bold());
            println!("{}", text);
        }
        WorkflowOutput::FullSnapshot(value) => {
            println!("{}", "No result field found; full response:".yellow());
            println!("{}", pretty_json(&value));
        }
    }
}

pub fn print_report(report: &A1cReport) {
    println!("{} {}", "A1C report for".cyan().bold(), report.date.cyan().bold());
    println!("  {}", report.a1c_trend_summary);
    println!();

    let mut rows = vec![
        ReportRow {
            field: "carbs (g)",
            value: format!(
                "{:.0}-{:.0}",
                report.daily_total_carbs_g.min, report.daily_total_carbs_g.max
            ),
        },
        ReportRow {
            field: "fiber score",
            value: format!("{:.1} / 10", report.fiber_score_0_10),
        },
        ReportRow {
            field: "protein (g)",
            value: format!("{:.0}", report.protein_g),
        },
        ReportRow {
            field: "fat (g)",
            value: format!("{:.0}", report.fat_g),
        },
        ReportRow {
            field: "rating",
            value: rating_label(report.rating),
        },
    ];
    if !report.carb_spike_alerts.is_empty() {
        rows.push(ReportRow {
            field: "spike alerts",
            value: report.carb_spike_alerts.join("\n"),
        });
    }
    println!("{}", Table::new(rows));

    println!();
    println!("{}", "Recommendations".bold());
    for (i, rec) in report.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }
    if let Some(notes) = &report.notes {
        println!();
        println!("  {} {}", "Notes:".bold(), notes);
    }
    println!();
    println!("{}", report.disclaimer.dimmed());
}

pub fn print_trend(series: &TrendSeries) {
    let rows = series.points.iter().enumerate().map(|(i, p)| TrendRow {
        marker: if Some(i) == series.current_index { "▶" } else { "" },
        date: p.date.clone(),
        actual: format!("{:.2}", p.actual),
        projected: format!("{:.2}", p.projected),
        best: format!("{:.2}", p.best_case),
        worst: format!("{:.2}", p.worst_case),
        fiber: format!("{:.1}", p.fiber),
        protein: format!("{:.0}", p.protein_g),
        fat: format!("{:.0}", p.fat_g),
    });
    println!("{}", Table::new(rows));
}

pub fn print_sample(weeks: &[SampleWeek]) {
    let rows = weeks.iter().map(|w| TrendRow {
        marker: if w.current { "▶" } else { "" },
        date: w.label.to_string(),
        actual: format!("{:.2}", w.actual),
        projected: format!("{:.2}", w.projected),
        best: format!("{:.2}", w.best_case),
        worst: format!("{:.2}", w.worst_case),
        fiber: format!("{:.1}", w.fiber),
        protein: format!("{:.0}", w.protein_g),
        fat: format!("{:.0}", w.fat_g),
    });
    println!("{}", Table::new(rows));
}
