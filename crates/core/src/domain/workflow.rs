// Workflow Domain Model
//
// One remote job: the handle returned by kickoff, the latest status snapshot,
// and the lifecycle NotStarted -> Running -> {Succeeded, Failed, Cancelled}.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{DomainError, Result};
use crate::domain::extract::{ExtractionChain, WorkflowOutput};

/// Status labels that mean the job finished successfully
pub const SUCCESS_LABELS: [&str; 5] = ["completed", "complete", "done", "succeeded", "success"];

/// Status labels that mean the job failed
pub const FAILURE_LABELS: [&str; 2] = ["failed", "error"];

/// Status labels that mean the job was cancelled
pub const CANCELLED_LABELS: [&str; 2] = ["cancelled", "canceled"];

/// Boolean fields that mark a snapshot as finished regardless of its label
pub const DONE_FLAGS: [&str; 2] = ["done", "completed"];

/// Required inputs of the interview-prep crew
pub const INTERVIEW_PREP_FIELDS: [&str; 3] = ["candidate_name", "job_title", "company_name"];

/// Opaque identifier of one remote job execution.
///
/// Only built from a kickoff response or from an identifier the user typed;
/// never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    /// Pull the handle out of a kickoff response body
    pub fn from_kickoff(body: &Value) -> Result<Self> {
        match ExtractionChain::job_handle().first_match(body) {
            Some(Value::String(s)) => Ok(Self(s.clone())),
            Some(Value::Number(n)) => Ok(Self(n.to_string())),
            _ => Err(DomainError::MissingHandle {
                body: body.to_string(),
            }),
        }
    }

    /// Accept a handle supplied explicitly by the user
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Job handle cannot be empty".to_string(),
            ));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phase of a remote job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobPhase {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobPhase::Succeeded | JobPhase::Failed | JobPhase::Cancelled
        )
    }

    /// Map a status label (case-insensitive) to a terminal phase
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        let label = label.as_str();
        if SUCCESS_LABELS.contains(&label) {
            Some(JobPhase::Succeeded)
        } else if FAILURE_LABELS.contains(&label) {
            Some(JobPhase::Failed)
        } else if CANCELLED_LABELS.contains(&label) {
            Some(JobPhase::Cancelled)
        } else {
            None
        }
    }
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobPhase::NotStarted => write!(f, "NOT_STARTED"),
            JobPhase::Running => write!(f, "RUNNING"),
            JobPhase::Succeeded => write!(f, "SUCCEEDED"),
            JobPhase::Failed => write!(f, "FAILED"),
            JobPhase::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Snapshot returned by one status call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobStatus(Value);

impl JobStatus {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// State label: `status`, else `state` (first non-empty string)
    pub fn label(&self) -> Option<&str> {
        ["status", "state"]
            .iter()
            .filter_map(|key| self.0.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    }

    /// True only when the field is the JSON boolean `true`
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(Value::Bool(true)))
    }

    pub fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }

    /// Phase implied by this snapshot.
    ///
    /// A terminal label wins. Without one, a true `done`/`completed` flag
    /// counts as success. Anything else is still running.
    pub fn phase(&self) -> JobPhase {
        if let Some(phase) = self.label().and_then(JobPhase::from_label) {
            return phase;
        }
        if DONE_FLAGS.iter().any(|f| self.flag(f)) {
            return JobPhase::Succeeded;
        }
        JobPhase::Running
    }

    /// First populated result field, if any
    pub fn result(&self) -> Option<&Value> {
        ExtractionChain::job_result().first_match(&self.0)
    }

    /// Result classified for display (falls back to the whole snapshot)
    pub fn output(&self) -> WorkflowOutput {
        WorkflowOutput::from_body(&self.0)
    }
}

/// Parameters sent to the kickoff endpoint: `{"inputs": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KickoffRequest {
    pub inputs: BTreeMap<String, String>,
}

impl KickoffRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one named input (value is trimmed)
    pub fn with_input(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.inputs
            .insert(name.into(), value.as_ref().trim().to_string());
        self
    }

    /// Inputs expected by the PM interview-prep workflow
    pub fn interview_prep(
        candidate_name: impl AsRef<str>,
        job_title: impl AsRef<str>,
        company_name: impl AsRef<str>,
    ) -> Self {
        Self::new()
            .with_input("candidate_name", candidate_name)
            .with_input("job_title", job_title)
            .with_input("company_name", company_name)
    }

    /// Every required field must be present and non-empty
    pub fn validate(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| self.inputs.get(*name).map_or(true, |v| v.is_empty()))
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::ValidationError(format!(
                "Missing required inputs: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

/// Tracks one run: handle, phase, latest snapshot
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    handle: Option<JobHandle>,
    phase: JobPhase,
    latest: Option<JobStatus>,
    polls: u32,
}

impl Default for WorkflowRun {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowRun {
    pub fn new() -> Self {
        Self {
            handle: None,
            phase: JobPhase::NotStarted,
            latest: None,
            polls: 0,
        }
    }

    /// Resume tracking a job started elsewhere
    pub fn resume(handle: JobHandle) -> Self {
        Self {
            handle: Some(handle),
            phase: JobPhase::Running,
            latest: None,
            polls: 0,
        }
    }

    /// Transition NotStarted -> Running
    pub fn started(&mut self, handle: JobHandle) -> Result<()> {
        if self.phase != JobPhase::NotStarted {
            return Err(DomainError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: JobPhase::Running.to_string(),
            });
        }
        self.handle = Some(handle);
        self.phase = JobPhase::Running;
        Ok(())
    }

    /// Record a snapshot; only legal while Running
    pub fn observe(&mut self, status: JobStatus) -> Result<JobPhase> {
        if self.phase != JobPhase::Running {
            let to = status.phase();
            return Err(DomainError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: to.to_string(),
            });
        }
        self.phase = status.phase();
        self.latest = Some(status);
        self.polls += 1;
        Ok(self.phase)
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn latest(&self) -> Option<&JobStatus> {
        self.latest.as_ref()
    }

    pub fn into_latest(self) -> Option<JobStatus> {
        self.latest
    }

    pub fn poll_count(&self) -> u32 {
        self.polls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handle_from_kickoff() {
        let handle = JobHandle::from_kickoff(&json!({"id": "job-42"})).unwrap();
        assert_eq!(handle.as_str(), "job-42");

        let handle = JobHandle::from_kickoff(&json!({"task_id": 1234})).unwrap();
        assert_eq!(handle.as_str(), "1234");
    }

    #[test]
    fn test_missing_handle_keeps_body() {
        let body = json!({"message": "accepted"});
        match JobHandle::from_kickoff(&body) {
            Err(DomainError::MissingHandle { body: raw }) => {
                assert_eq!(serde_json::from_str::<Value>(&raw).unwrap(), body);
            }
            other => panic!("expected MissingHandle, got {:?}", other),
        }
    }

    #[test]
    fn test_non_scalar_handle_is_missing() {
        let result = JobHandle::from_kickoff(&json!({"id": {"nested": true}}));
        assert!(matches!(result, Err(DomainError::MissingHandle { .. })));
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(JobHandle::parse("  ").is_err());
        assert_eq!(JobHandle::parse("abc").unwrap().to_string(), "abc");
    }

    #[test]
    fn test_terminal_labels_case_insensitive() {
        for label in SUCCESS_LABELS
            .iter()
            .chain(FAILURE_LABELS.iter())
            .chain(CANCELLED_LABELS.iter())
        {
            let upper = JobStatus::new(json!({"status": label.to_uppercase()}));
            assert!(upper.is_terminal(), "{} should be terminal", label);

            let via_state = JobStatus::new(json!({"state": label}));
            assert!(via_state.is_terminal(), "state={} should be terminal", label);
        }
    }

    #[test]
    fn test_phase_mapping() {
        assert_eq!(
            JobStatus::new(json!({"status": "Succeeded"})).phase(),
            JobPhase::Succeeded
        );
        assert_eq!(
            JobStatus::new(json!({"status": "error"})).phase(),
            JobPhase::Failed
        );
        assert_eq!(
            JobStatus::new(json!({"state": "canceled"})).phase(),
            JobPhase::Cancelled
        );
        assert_eq!(
            JobStatus::new(json!({"status": "running"})).phase(),
            JobPhase::Running
        );
    }

    #[test]
    fn test_done_flags() {
        assert!(JobStatus::new(json!({"status": "running", "done": true})).is_terminal());
        assert!(JobStatus::new(json!({"completed": true})).is_terminal());
        assert!(!JobStatus::new(json!({"done": "true"})).is_terminal());
        assert!(!JobStatus::new(json!({"done": false, "status": "running"})).is_terminal());
    }

    #[test]
    fn test_label_prefers_status_then_state() {
        let s = JobStatus::new(json!({"status": "", "state": "done"}));
        assert_eq!(s.label(), Some("done"));

        let s = JobStatus::new(json!({"status": "running", "state": "done"}));
        assert_eq!(s.label(), Some("running"));
        assert!(!s.is_terminal());
    }

    #[test]
    fn test_kickoff_request_serialization() {
        let req = KickoffRequest::interview_prep(" Jane Doe ", "PM", "Acme");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({"inputs": {"candidate_name": "Jane Doe", "job_title": "PM", "company_name": "Acme"}})
        );
        assert!(req.validate(&INTERVIEW_PREP_FIELDS).is_ok());
    }

    #[test]
    fn test_kickoff_request_missing_fields() {
        let req = KickoffRequest::interview_prep("Jane", "  ", "");
        let err = req.validate(&INTERVIEW_PREP_FIELDS).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("job_title"));
        assert!(msg.contains("company_name"));
        assert!(!msg.contains("candidate_name"));
    }

    #[test]
    fn test_run_lifecycle() {
        let mut run = WorkflowRun::new();
        assert_eq!(run.phase(), JobPhase::NotStarted);

        run.started(JobHandle::parse("job-1").unwrap()).unwrap();
        assert_eq!(run.phase(), JobPhase::Running);

        let phase = run
            .observe(JobStatus::new(json!({"status": "running"})))
            .unwrap();
        assert_eq!(phase, JobPhase::Running);

        let phase = run
            .observe(JobStatus::new(json!({"status": "failed"})))
            .unwrap();
        assert_eq!(phase, JobPhase::Failed);
        assert_eq!(run.poll_count(), 2);

        // Terminal: no more observations, no restart
        assert!(run.observe(JobStatus::new(json!({"status": "running"}))).is_err());
        assert!(run.started(JobHandle::parse("job-2").unwrap()).is_err());
        assert_eq!(run.handle().unwrap().as_str(), "job-1");
    }

    #[test]
    fn test_observe_before_start_is_rejected() {
        let mut run = WorkflowRun::new();
        let err = run
            .observe(JobStatus::new(json!({"status": "done"})))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }
}
