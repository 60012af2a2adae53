// Logging setup
//
// PFOLIO_LOG_FORMAT=json for structured output, anything else is pretty.
// RUST_LOG overrides the default filter. Logs go to stderr so command output
// on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "PFOLIO_LOG_FORMAT";
const DEFAULT_FILTER: &str = "pfolio=info";

pub fn init_logging(verbose: bool) {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());

    let default_filter = if verbose { "pfolio=debug" } else { DEFAULT_FILTER };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
