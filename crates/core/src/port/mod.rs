// Port Layer - Interfaces for external dependencies

pub mod diet_log_source;
pub mod insight_model;
pub mod sleeper; // For deterministic polling tests
pub mod time_provider;
pub mod workflow_gateway;

// Re-exports
pub use diet_log_source::DietLogSource;
pub use insight_model::{CompletionRequest, InsightModel};
pub use sleeper::{Sleeper, TokioSleeper};
pub use time_provider::{SystemTimeProvider, TimeProvider};
pub use workflow_gateway::{GatewayError, WorkflowGateway};
