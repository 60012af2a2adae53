// Application Layer - Use Cases and Business Logic

pub mod insight;
pub mod workflow;

// Re-exports
pub use insight::InsightService;
pub use workflow::{cancel_channel, CancelHandle, CancelToken, RunHandle, WaitOptions, WorkflowClient};
