//! PFolio CLI - run the interview-prep workflow and the A1C insight engine

mod output;
mod settings;
mod store;
mod telemetry;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use pfolio_core::application::{InsightService, WaitOptions, WorkflowClient};
use pfolio_core::domain::diet_log::parse_date;
use pfolio_core::domain::sample::weekly_sample;
use pfolio_core::domain::workflow::INTERVIEW_PREP_FIELDS;
use pfolio_core::domain::{JobHandle, KickoffRequest, TrendModel};
use pfolio_core::port::DietLogSource;
use pfolio_core::AppError;
use pfolio_infra_http::{CsvSheetSource, HttpWorkflowGateway, OpenAiChatModel};

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "pfolio")]
#[command(about = "PM interview-prep workflow runner and A1C insight engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Secrets TOML file (default: <config dir>/pfolio/secrets.toml)
    #[arg(long, global = true, env = "PFOLIO_SECRETS")]
    secrets: Option<PathBuf>,

    /// Workflow service base URL (overrides configuration)
    #[arg(long, global = true)]
    workflow_url: Option<String>,

    /// Debug logging for pfolio crates
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the inputs the remote workflow expects (GET /inputs)
    Inputs,

    /// Start a workflow and print its handle (POST /kickoff)
    Kickoff(JobInputs),

    /// Fetch one status snapshot (GET /status/{handle})
    Status {
        /// Job handle returned by kickoff
        handle: String,
    },

    /// Poll an existing job until it finishes
    Wait {
        /// Job handle returned by kickoff
        handle: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Start a workflow and poll it until it finishes
    Run {
        #[command(flatten)]
        inputs: JobInputs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// A1C insight engine
    A1c {
        #[command(subcommand)]
        command: A1cCommands,
    },
}

#[derive(Args)]
struct JobInputs {
    /// Candidate name
    #[arg(long)]
    candidate: Option<String>,

    /// Job title
    #[arg(long)]
    job_title: Option<String>,

    /// Company name
    #[arg(long)]
    company: Option<String>,

    /// Extra input as NAME=VALUE (repeatable)
    #[arg(short, long = "input", value_parser = parse_key_value)]
    inputs: Vec<(String, String)>,
}

#[derive(Args)]
struct WaitArgs {
    /// Seconds between status polls (1-10)
    #[arg(long, default_value = "2")]
    interval: u64,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum A1cCommands {
    /// Generate a daily report from the diet log
    Report {
        /// Day to analyse (default: today)
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,

        /// Use this text instead of the sheet entry
        #[arg(long)]
        text: Option<String>,

        /// Local CSV export of the diet log
        #[arg(long, conflicts_with = "sheet")]
        csv: Option<PathBuf>,

        /// Published sheet URL (default: SHEET_CSV_URL)
        #[arg(long)]
        sheet: Option<String>,

        /// Store the report in this history file (replaces the same date)
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Show the proxy A1C trend for a saved history
    Trend {
        /// History file written by `a1c report --history`
        #[arg(long)]
        history: PathBuf,
    },

    /// Show the weekly prototype dataset
    Sample,
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty input name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_day(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("unrecognised date '{}'", raw))
}

impl JobInputs {
    fn into_request(self) -> Result<KickoffRequest> {
        let interview = self.candidate.is_some() || self.job_title.is_some() || self.company.is_some();
        let mut request = if interview {
            KickoffRequest::interview_prep(
                self.candidate.unwrap_or_default(),
                self.job_title.unwrap_or_default(),
                self.company.unwrap_or_default(),
            )
        } else {
            KickoffRequest::new()
        };
        for (key, value) in self.inputs {
            request = request.with_input(key, value);
        }

        if interview || request.inputs.is_empty() {
            request.validate(&INTERVIEW_PREP_FIELDS)?;
        }
        Ok(request)
    }
}

impl WaitArgs {
    fn options(&self) -> Result<WaitOptions> {
        let mut options = WaitOptions::new(Duration::from_secs(self.interval));
        if let Some(timeout) = self.timeout {
            options = options.with_timeout(Duration::from_secs(timeout));
        }
        options.validate()?;
        Ok(options)
    }
}

fn workflow_client(settings: &Settings, url_override: Option<&str>) -> Result<Arc<WorkflowClient>> {
    let token = settings.bearer_token()?;
    let base_url = url_override.unwrap_or(&settings.workflow_url);
    let gateway = HttpWorkflowGateway::new(base_url, &token)?;
    info!(url = %gateway.base_url(), "Using workflow service");
    Ok(Arc::new(WorkflowClient::with_gateway(Arc::new(gateway))))
}

fn insight_service(settings: &Settings) -> Result<InsightService> {
    let model = OpenAiChatModel::new(
        &settings.openai_base_url,
        &settings.openai_api_key()?,
        &settings.openai_model(),
    )?;
    Ok(InsightService::new(Arc::new(model)))
}

/// Cancel the wait on Ctrl+C
fn cancel_on_ctrl_c(cancel: pfolio_core::application::CancelHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling wait");
            cancel.cancel();
        }
    });
}

fn report_failure(err: AppError) -> anyhow::Error {
    if let Some(body) = err.response_body() {
        eprintln!("{}", "Response body:".yellow());
        eprintln!("{}", body);
    }
    err.into()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose);

    let settings = Settings::load(cli.secrets.as_deref())?;
    let url_override = cli.workflow_url.as_deref();

    match cli.command {
        Commands::Inputs => {
            let client = workflow_client(&settings, url_override)?;
            let schema = client.fetch_inputs().await.map_err(report_failure)?;
            println!("{}", "Workflow inputs".cyan().bold());
            println!("{}", output::pretty_json(&schema));
        }

        Commands::Kickoff(inputs) => {
            let request = inputs.into_request()?;
            let client = workflow_client(&settings, url_override)?;
            let handle = client.start(&request).await.map_err(report_failure)?;
            println!("{}", "✓ Workflow started".green().bold());
            println!("  {} {}", "Handle:".bold(), handle);
        }

        Commands::Status { handle } => {
            let handle = JobHandle::parse(handle)?;
            let client = workflow_client(&settings, url_override)?;
            let status = client.poll(&handle).await.map_err(report_failure)?;
            println!("  {} {}", "Handle:".bold(), handle);
            println!("  {} {}", "Phase:".bold(), output::phase_label(status.phase()));
            println!("{}", output::pretty_json(status.as_value()));
        }

        Commands::Wait { handle, wait } => {
            let handle = JobHandle::parse(handle)?;
            let options = wait.options()?;
            let client = workflow_client(&settings, url_override)?;

            let (cancel, token) = pfolio_core::application::cancel_channel();
            cancel_on_ctrl_c(cancel);

            println!("{} {}", "Waiting for".cyan().bold(), handle.as_str().cyan().bold());
            let status = client
                .await_completion(&handle, &options, Some(&token))
                .await
                .map_err(report_failure)?;
            output::print_final_status(&status);
        }

        Commands::Run { inputs, wait } => {
            let request = inputs.into_request()?;
            let options = wait.options()?;
            let client = workflow_client(&settings, url_override)?;

            println!("{}", "Starting workflow...".cyan().bold());
            let run = client.spawn_run(request, options);
            cancel_on_ctrl_c(run.cancel_handle());

            let run = run.wait().await.map_err(report_failure)?;
            if let Some(handle) = run.handle() {
                println!("  {} {}", "Handle:".bold(), handle);
            }
            println!("  {} {}", "Polls:".bold(), run.poll_count());
            match run.latest() {
                Some(status) => output::print_final_status(status),
                None => bail!("Workflow ended without a status snapshot"),
            }
        }

        Commands::A1c { command } => run_a1c(&settings, command).await?,
    }

    Ok(())
}

async fn run_a1c(settings: &Settings, command: A1cCommands) -> Result<()> {
    match command {
        A1cCommands::Report {
            date,
            text,
            csv,
            sheet,
            history,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let service = insight_service(settings)?;

            let result = match text {
                Some(text) => service.generate_report(date, &text).await,
                None => {
                    let source = diet_log_source(settings, csv.as_deref(), sheet.as_deref())?;
                    let log = source.load().await.context("Failed to load diet log")?;
                    service.generate_for_date(&log, date, None).await
                }
            };
            let report = result.map_err(report_failure)?;

            output::print_report(&report);

            if let Some(path) = history {
                let mut stored = store::load_history(&path)?;
                stored.upsert(report);
                store::save_history(&path, &stored)?;
                println!();
                println!(
                    "{} {} ({} days)",
                    "✓ Saved to".green(),
                    path.display(),
                    stored.len()
                );
            }
        }

        A1cCommands::Trend { history } => {
            let stored = store::load_history(&history)?;
            if stored.is_empty() {
                println!("{}", "No reports yet. Generate one with `pfolio a1c report --history`.".yellow());
                return Ok(());
            }
            let series = TrendModel::default().project(&stored);
            println!("{}", "Proxy A1C trend (estimate, not a lab value)".cyan().bold());
            output::print_trend(&series);
        }

        A1cCommands::Sample => {
            println!("{}", "Weekly prototype data".cyan().bold());
            output::print_sample(&weekly_sample());
        }
    }
    Ok(())
}

fn diet_log_source(
    settings: &Settings,
    csv: Option<&Path>,
    sheet: Option<&str>,
) -> Result<Box<dyn DietLogSource>> {
    if let Some(path) = csv {
        return Ok(Box::new(CsvSheetSource::from_file(path)));
    }
    let url = match sheet.map(str::to_string).or_else(|| settings.sheet_csv_url()) {
        Some(url) => url,
        None => bail!(
            "No diet log: pass --csv or --sheet, or set {}",
            settings::SHEET_URL_ENV
        ),
    };
    Ok(Box::new(CsvSheetSource::from_url(&url)?))
}
