// Response Field Extraction
//
// Remote services disagree on where they put the job id and the job result.
// Each location is a strategy; a chain tries them in order and the first
// populated value wins.

use serde_json::Value;

/// Locations of the job handle in a kickoff response, in priority order
pub const HANDLE_FIELDS: [FieldPath; 4] = [
    FieldPath::new(&["task_id"]),
    FieldPath::new(&["id"]),
    FieldPath::new(&["taskId"]),
    FieldPath::new(&["data", "task_id"]),
];

/// Locations of the job result in a terminal status snapshot, in priority order
pub const RESULT_FIELDS: [FieldPath; 5] = [
    FieldPath::new(&["result"]),
    FieldPath::new(&["output"]),
    FieldPath::new(&["final_output"]),
    FieldPath::new(&["data", "result"]),
    FieldPath::new(&["data", "output"]),
];

/// One way of pulling a value out of a JSON response body
pub trait ExtractionStrategy: Send + Sync {
    /// Human-readable location (used in logs)
    fn describe(&self) -> String;

    /// Return the populated value at this location, if any
    fn extract<'a>(&self, body: &'a Value) -> Option<&'a Value>;
}

/// Path of object keys from the root of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static [&'static str]);

impl FieldPath {
    pub const fn new(segments: &'static [&'static str]) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &'static [&'static str] {
        self.0
    }
}

impl ExtractionStrategy for FieldPath {
    fn describe(&self) -> String {
        self.0.join(".")
    }

    fn extract<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        let mut current = body;
        for segment in self.0 {
            // Value::get returns None for non-objects, so a scalar "data" is skipped
            current = current.get(*segment)?;
        }
        is_populated(current).then_some(current)
    }
}

/// Whether a value counts as present.
///
/// `null`, `false`, zero, the empty string, and empty arrays/objects are
/// treated as absent so that the next strategy gets a chance.
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Ordered list of extraction strategies
pub struct ExtractionChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ExtractionChain {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Chain for the job handle of a kickoff response
    pub fn job_handle() -> Self {
        Self::from_paths(&HANDLE_FIELDS)
    }

    /// Chain for the result payload of a status snapshot
    pub fn job_result() -> Self {
        Self::from_paths(&RESULT_FIELDS)
    }

    fn from_paths(paths: &[FieldPath]) -> Self {
        Self::new(
            paths
                .iter()
                .map(|p| Box::new(*p) as Box<dyn ExtractionStrategy>)
                .collect(),
        )
    }

    /// First populated value across all strategies
    pub fn first_match<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        self.strategies.iter().find_map(|strategy| {
            let found = strategy.extract(body);
            if found.is_some() {
                tracing::trace!(location = %strategy.describe(), "Extraction strategy matched");
            }
            found
        })
    }
}

/// What to show the user once a job has finished
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutput {
    /// Result is an object or an array
    Structured(Value),
    /// Result is non-blank text
    Text(String),
    /// No usable result field; the whole snapshot is the output
    FullSnapshot(Value),
}

impl WorkflowOutput {
    pub fn from_body(body: &Value) -> Self {
        match ExtractionChain::job_result().first_match(body) {
            Some(v) if v.is_object() || v.is_array() => WorkflowOutput::Structured(v.clone()),
            Some(Value::String(s)) if !s.trim().is_empty() => WorkflowOutput::Text(s.clone()),
            _ => WorkflowOutput::FullSnapshot(body.clone()),
        }
    }
}
