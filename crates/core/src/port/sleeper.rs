// Sleeper Port - the pause between two status polls

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleep (production)
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::port::time_provider::mocks::ManualClock;
    use std::sync::{Arc, Mutex};

    /// Returns immediately and records every requested pause.
    ///
    /// When attached to a `ManualClock`, each pause advances that clock so
    /// deadline logic can be exercised without waiting.
    #[derive(Default)]
    pub struct RecordingSleeper {
        pauses: Mutex<Vec<Duration>>,
        clock: Option<Arc<ManualClock>>,
    }

    impl RecordingSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_clock(clock: Arc<ManualClock>) -> Self {
            Self {
                pauses: Mutex::new(Vec::new()),
                clock: Some(clock),
            }
        }

        pub fn pauses(&self) -> Vec<Duration> {
            self.pauses.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.pauses.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.pauses.lock().unwrap().push(duration);
            if let Some(clock) = &self.clock {
                clock.advance(duration.as_millis() as i64);
            }
            tokio::task::yield_now().await;
        }
    }
}
