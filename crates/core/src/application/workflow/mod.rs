// Workflow Client - start one remote job and observe it to completion

mod cancel;
pub mod constants;

pub use cancel::{cancel_channel, CancelHandle, CancelToken};

use constants::*;

use crate::domain::{JobHandle, JobStatus, KickoffRequest, WorkflowRun};
use crate::error::{AppError, Result};
use crate::port::{
    GatewayError, Sleeper, SystemTimeProvider, TimeProvider, TokioSleeper, WorkflowGateway,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long and how often to poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    pub interval: Duration,
    /// Give up once this much time has passed since the first poll
    pub timeout: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl WaitOptions {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_POLL_INTERVAL..=MAX_POLL_INTERVAL).contains(&self.interval) {
            return Err(AppError::Validation(format!(
                "Poll interval must be between {}s and {}s, got {:?}",
                MIN_POLL_INTERVAL.as_secs(),
                MAX_POLL_INTERVAL.as_secs(),
                self.interval
            )));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(AppError::Validation(
                "Timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Workflow Client
///
/// Drives one remote job through kickoff and status polling. Nothing is
/// retried: the first transport or parse failure ends the run.
pub struct WorkflowClient {
    gateway: Arc<dyn WorkflowGateway>,
    sleeper: Arc<dyn Sleeper>,
    time_provider: Arc<dyn TimeProvider>,
}

impl WorkflowClient {
    pub fn new(
        gateway: Arc<dyn WorkflowGateway>,
        sleeper: Arc<dyn Sleeper>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            gateway,
            sleeper,
            time_provider,
        }
    }

    /// Client with real sleeps and system time
    pub fn with_gateway(gateway: Arc<dyn WorkflowGateway>) -> Self {
        Self::new(gateway, Arc::new(TokioSleeper), Arc::new(SystemTimeProvider))
    }

    /// Schema of the parameters the remote job expects
    pub async fn fetch_inputs(&self) -> Result<Value> {
        Ok(self.gateway.fetch_inputs().await?)
    }

    /// Start a job and return its handle
    ///
    /// # Errors
    /// - AppError::Gateway on transport failure or non-JSON body
    /// - DomainError::MissingHandle if the body has no recognizable id
    pub async fn start(&self, request: &KickoffRequest) -> Result<JobHandle> {
        info!(inputs = ?request.inputs.keys().collect::<Vec<_>>(), "Starting workflow");

        let body = self.gateway.kickoff(request).await?;
        let handle = JobHandle::from_kickoff(&body).map_err(|e| {
            warn!(body = %body, "Kickoff response has no job handle");
            e
        })?;

        info!(handle = %handle, "Workflow started");
        Ok(handle)
    }

    /// One status snapshot
    ///
    /// # Errors
    /// - AppError::Gateway on transport failure
    /// - GatewayError::MalformedResponse if the snapshot is not a JSON object
    pub async fn poll(&self, handle: &JobHandle) -> Result<JobStatus> {
        let status = self.gateway.status(handle).await?;
        if !status.as_value().is_object() {
            warn!(handle = %handle, body = %status.as_value(), "Status snapshot is not an object");
            return Err(GatewayError::MalformedResponse {
                status: 200,
                body: status.as_value().to_string(),
            }
            .into());
        }
        debug!(
            handle = %handle,
            label = status.label().unwrap_or(""),
            phase = %status.phase(),
            "Polled workflow status"
        );
        Ok(status)
    }

    /// Poll until the job reaches a terminal state; returns the final snapshot
    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        options: &WaitOptions,
        cancel: Option<&CancelToken>,
    ) -> Result<JobStatus> {
        let mut run = WorkflowRun::resume(handle.clone());
        self.drive(&mut run, options, cancel).await?;
        run.into_latest()
            .ok_or_else(|| AppError::Internal("Wait loop ended without a snapshot".to_string()))
    }

    /// Result payload of a terminal snapshot, if the service reported one
    pub fn extract_result(status: &JobStatus) -> Option<&Value> {
        status.result()
    }

    /// Start and wait in one go
    pub async fn run(
        &self,
        request: &KickoffRequest,
        options: &WaitOptions,
        cancel: Option<&CancelToken>,
    ) -> Result<WorkflowRun> {
        let mut run = WorkflowRun::new();
        let handle = self.start(request).await?;
        run.started(handle)?;
        self.drive(&mut run, options, cancel).await?;
        Ok(run)
    }

    /// Run on a background task so the caller stays responsive
    pub fn spawn_run(self: &Arc<Self>, request: KickoffRequest, options: WaitOptions) -> RunHandle {
        let (cancel, token) = cancel_channel();
        let client = Arc::clone(self);

        let join = tokio::spawn(async move { client.run(&request, &options, Some(&token)).await });

        RunHandle { join, cancel }
    }

    async fn drive(
        &self,
        run: &mut WorkflowRun,
        options: &WaitOptions,
        cancel: Option<&CancelToken>,
    ) -> Result<()> {
        let handle = run
            .handle()
            .cloned()
            .ok_or_else(|| AppError::Internal("Run has no job handle".to_string()))?;

        let started_at = self.time_provider.now_millis();
        let deadline = options
            .timeout
            .map(|t| started_at + t.as_millis() as i64);

        loop {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                info!(handle = %handle, "Wait cancelled");
                return Err(AppError::Cancelled(handle.to_string()));
            }

            let status = or_cancelled(&handle, cancel, self.poll(&handle)).await??;
            let phase = run.observe(status)?;

            if phase.is_terminal() {
                info!(
                    handle = %handle,
                    phase = %phase,
                    polls = run.poll_count(),
                    "Workflow finished"
                );
                return Ok(());
            }

            // Never sleep past the deadline; the poll after a shortened
            // sleep is the last one
            let pause = match deadline {
                Some(deadline) => {
                    let now = self.time_provider.now_millis();
                    let remaining = deadline - now;
                    if remaining <= 0 {
                        warn!(
                            handle = %handle,
                            elapsed_ms = now - started_at,
                            "Workflow did not finish before the deadline"
                        );
                        return Err(AppError::Timeout {
                            handle: handle.to_string(),
                            elapsed_ms: now - started_at,
                        });
                    }
                    options.interval.min(Duration::from_millis(remaining as u64))
                }
                None => options.interval,
            };

            or_cancelled(&handle, cancel, self.sleeper.sleep(pause)).await?;
        }
    }
}

/// Race `work` against the cancel token, if there is one
async fn or_cancelled<T>(
    handle: &JobHandle,
    cancel: Option<&CancelToken>,
    work: impl Future<Output = T>,
) -> Result<T> {
    match cancel {
        Some(token) => {
            tokio::select! {
                out = work => Ok(out),
                _ = token.cancelled() => {
                    info!(handle = %handle, "Wait cancelled");
                    Err(AppError::Cancelled(handle.to_string()))
                }
            }
        }
        None => Ok(work.await),
    }
}

/// Background run started by `WorkflowClient::spawn_run`
pub struct RunHandle {
    join: JoinHandle<Result<WorkflowRun>>,
    cancel: CancelHandle,
}

impl RunHandle {
    /// Request cooperative cancellation
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Sending side of the run's cancel channel (e.g. for a signal handler)
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run to end
    pub async fn wait(self) -> Result<WorkflowRun> {
        match self.join.await {
            Ok(result) => result,
            Err(join_err) => Err(AppError::Internal(format!(
                "Workflow task failed: {}",
                join_err
            ))),
        }
    }
}
