// PFolio Infrastructure - HTTP Adapters
// Implements: WorkflowGateway, InsightModel, DietLogSource

mod chat_model;
mod connection;
mod sheet;
mod workflow_gateway;

pub use chat_model::{OpenAiChatModel, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL};
pub use connection::{auth_headers, create_client};
pub use sheet::{csv_export_url, diet_log_from_csv, parse_csv, CsvSheetSource};
pub use workflow_gateway::HttpWorkflowGateway;

// Note: reqwest::Error conversion is handled in helper functions
// due to Rust's orphan rules (cannot implement From<reqwest::Error> for GatewayError here)
