// Diet Log Source Port (published spreadsheet, local CSV, ...)

use crate::domain::DietLog;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DietLogSource: Send + Sync {
    /// Load and validate the whole log
    async fn load(&self) -> Result<DietLog>;
}

pub mod mocks {
    use super::*;

    /// Source backed by an in-memory log
    pub struct StaticDietLog(pub DietLog);

    #[async_trait]
    impl DietLogSource for StaticDietLog {
        async fn load(&self) -> Result<DietLog> {
            Ok(self.0.clone())
        }
    }
}
