// Workflow constants (ADR: No magic values)
use std::time::Duration;

/// Default pause between two status polls (2s)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Shortest accepted poll interval (1s)
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Longest accepted poll interval (10s)
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(10);
