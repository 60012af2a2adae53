// Domain Layer - Pure business logic and entities

pub mod diet_log;
pub mod error;
pub mod extract;
pub mod history;
pub mod report;
pub mod sample;
pub mod token;
pub mod trend;
pub mod workflow;

// Re-exports
pub use diet_log::{DietEntry, DietLog};
pub use error::DomainError;
pub use extract::{ExtractionChain, ExtractionStrategy, FieldPath, WorkflowOutput};
pub use history::ReportHistory;
pub use report::{A1cReport, CarbRange, Rating};
pub use token::BearerToken;
pub use trend::{TrendModel, TrendPoint, TrendSeries};
pub use workflow::{JobHandle, JobPhase, JobStatus, KickoffRequest, WorkflowRun};
