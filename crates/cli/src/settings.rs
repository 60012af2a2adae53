// Configuration loading
//
// Layers, lowest to highest: built-in defaults, secrets TOML file,
// PFOLIO_* environment variables. `.env` is loaded into the environment first.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use pfolio_core::domain::BearerToken;
use pfolio_core::AppError;
use pfolio_infra_http::{DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Remote interview-prep workflow deployment
pub const DEFAULT_WORKFLOW_URL: &str =
    "https://pm-interview-prep-workflow-with-smart-decis-238b266e.crewai.com";

pub const TOKEN_ENV: &str = "CREWAI_BEARER_TOKEN";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
pub const SHEET_URL_ENV: &str = "SHEET_CSV_URL";

const SECRETS_FILE: &str = "secrets.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub workflow_url: String,
    #[serde(default, alias = "CREWAI_BEARER_TOKEN")]
    pub crewai_bearer_token: Option<String>,
    #[serde(default, alias = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,
    #[serde(default, alias = "OPENAI_MODEL")]
    pub openai_model: Option<String>,
    pub openai_base_url: String,
    #[serde(default, alias = "SHEET_CSV_URL")]
    pub sheet_csv_url: Option<String>,
}

/// `<config dir>/pfolio/secrets.toml`
pub fn default_secrets_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pfolio").map(|dirs| dirs.config_dir().join(SECRETS_FILE))
}

impl Settings {
    /// Load settings; a missing secrets file is not an error
    pub fn load(secrets: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("workflow_url", DEFAULT_WORKFLOW_URL)?
            .set_default("openai_base_url", DEFAULT_CHAT_BASE_URL)?;

        let path = secrets.map(Path::to_path_buf).or_else(default_secrets_path);
        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(secrets.is_some()),
            );
        }

        builder
            .add_source(Environment::with_prefix("PFOLIO").try_parsing(false))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Secrets file first, then the process environment. No fallback.
    pub fn bearer_token(&self) -> Result<BearerToken, AppError> {
        BearerToken::resolve([self.crewai_bearer_token.clone(), non_empty_env(TOKEN_ENV)])
            .ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "No bearer token: set crewai_bearer_token in the secrets file or {}",
                    TOKEN_ENV
                ))
            })
    }

    pub fn openai_api_key(&self) -> Result<String, AppError> {
        self.openai_api_key
            .clone()
            .or_else(|| non_empty_env(OPENAI_KEY_ENV))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "Missing {}. Add it to .env or the secrets file.",
                    OPENAI_KEY_ENV
                ))
            })
    }

    pub fn openai_model(&self) -> String {
        self.openai_model
            .clone()
            .or_else(|| non_empty_env(OPENAI_MODEL_ENV))
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string())
    }

    pub fn sheet_csv_url(&self) -> Option<String> {
        self.sheet_csv_url
            .clone()
            .or_else(|| non_empty_env(SHEET_URL_ENV))
            .filter(|url| !url.trim().is_empty())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
