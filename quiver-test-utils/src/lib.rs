//! Quiver Test Utilities
//!
//! Centralized test infrastructure for the quiver workspace:
//! - scripted mock transport with a call counter
//! - recording dispatch and analytics sinks
//! - token sources, including one that never resolves (cancellation tests)
//! - response and entity builders

// Re-export core types for convenience
pub use quiver_core::{
    Action, Analytics, Dispatch, GraphQlError, GraphQlResponse, InstrumentationError, Location,
    MemoryPageStore, Operation, Outcome, PageStore, TokenSource, Transport, TransportError,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

/// Scripted transport: hands out queued results in order and counts calls.
/// When the queue runs dry it answers with an empty successful response.
#[derive(Default)]
pub struct MockTransport {
    results: Mutex<VecDeque<Result<GraphQlResponse, TransportError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Operation>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(response: GraphQlResponse) -> Self {
        let transport = Self::new();
        transport.push_ok(response);
        transport
    }

    pub fn with_failure(error: TransportError) -> Self {
        let transport = Self::new();
        transport.push_err(error);
        transport
    }

    pub fn push_ok(&self, response: GraphQlResponse) {
        self.results.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_err(&self, error: TransportError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Operations as the transport saw them, headers included.
    pub fn seen_operations(&self) -> Vec<Operation> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, op: &Operation) -> Result<GraphQlResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(op.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GraphQlResponse::default()))
    }
}

// ============================================================================
// RECORDING SINKS
// ============================================================================

/// Records every dispatched action for later assertion.
#[derive(Default)]
pub struct RecordingDispatch {
    actions: Mutex<Vec<Action>>,
}

impl RecordingDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn display_errors(&self) -> Vec<(String, u16)> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::DisplayError { message, code } => Some((message, code)),
                _ => None,
            })
            .collect()
    }

    pub fn pushes(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Push(path) => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl Dispatch for RecordingDispatch {
    fn dispatch(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }
}

/// Records timing events; optionally fails every report.
#[derive(Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<(String, Duration)>>,
    fail: bool,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<(String, Duration)> {
        self.events.lock().unwrap().clone()
    }
}

impl Analytics for RecordingAnalytics {
    fn timing(&self, operation: &str, duration: Duration) -> Result<(), InstrumentationError> {
        if self.fail {
            return Err(InstrumentationError::new("analytics sink offline"));
        }
        self.events
            .lock()
            .unwrap()
            .push((operation.to_string(), duration));
        Ok(())
    }
}

// ============================================================================
// TOKEN SOURCES
// ============================================================================

/// Always resolves to the same token (or none).
pub struct StaticTokenSource {
    token: Option<String>,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Never resolves. Lets tests drop an in-flight operation while the auth
/// stage is still waiting and assert the transport was never reached.
#[derive(Default)]
pub struct StallTokenSource {
    gate: Notify,
}

impl StallTokenSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenSource for StallTokenSource {
    async fn token(&self) -> Option<String> {
        // notify_one() is never called.
        self.gate.notified().await;
        None
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A run object as the backend returns it, with optional JSON-string fields.
pub fn run_object(id: &str, config: Option<&str>, summary_metrics: Option<&str>) -> Value {
    let mut object = json!({"__typename": "Run", "id": id});
    if let Some(config) = config {
        object["config"] = json!(config);
    }
    if let Some(summary) = summary_metrics {
        object["summaryMetrics"] = json!(summary);
    }
    object
}

/// A response whose payload is a single list of runs.
pub fn runs_response(runs: Vec<Value>) -> GraphQlResponse {
    GraphQlResponse::data(json!({"runs": runs}))
}

/// A response carrying only application-level errors.
pub fn error_response(errors: Vec<(&str, Option<u16>)>) -> GraphQlResponse {
    GraphQlResponse::errors(
        errors
            .into_iter()
            .map(|(message, code)| GraphQlError::new(message, code))
            .collect(),
    )
}
