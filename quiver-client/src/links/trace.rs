//! Trace link
//!
//! When the page was loaded with a `trace` query parameter, every request
//! carries an `X-Cloud-Trace-Context` header built from the persisted page
//! identifier and a per-page request counter, so backend traces can be tied
//! back to this page load. The header carries the counter value as read;
//! the increment is persisted after.

use crate::links::Link;
use async_trait::async_trait;
use quiver_core::{keys, page_id, Location, Operation, PageStore, QuiverResult};
use std::sync::Arc;

pub const TRACE_HEADER: &str = "X-Cloud-Trace-Context";

pub struct TraceLink {
    store: Arc<dyn PageStore>,
    location: Location,
}

impl TraceLink {
    pub fn new(store: Arc<dyn PageStore>, location: Location) -> Self {
        Self { store, location }
    }
}

#[async_trait]
impl Link for TraceLink {
    async fn before(&self, op: &mut Operation) -> QuiverResult<()> {
        if !self.location.has_param("trace") {
            return Ok(());
        }

        tracing::debug!(operation = %op.operation_name, "attaching trace context");

        // Missing or unparsable counter starts from 0.
        let count: u64 = self
            .store
            .get(keys::REQUEST_COUNT)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);

        let page = page_id(self.store.as_ref());
        op.set_header(TRACE_HEADER, format!("{page}/{count};o=1"));
        self.store.set(keys::REQUEST_COUNT, &(count + 1).to_string());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
