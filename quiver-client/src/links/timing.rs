//! Timing link
//!
//! Response-side observer: measures elapsed time from the page start mark to
//! response arrival and reports it to the analytics sink as a timing event,
//! keyed by operation name. Instrumentation must never break a request, so
//! sink failures are logged at warn and swallowed.

use crate::links::Link;
use quiver_core::{Analytics, Operation, Outcome};
use std::sync::Arc;
use std::time::Instant;

pub struct TimingLink {
    analytics: Option<Arc<dyn Analytics>>,
    /// The page's "start" performance mark.
    page_start: Instant,
    embedded: bool,
}

impl TimingLink {
    pub fn new(analytics: Option<Arc<dyn Analytics>>, page_start: Instant, embedded: bool) -> Self {
        Self {
            analytics,
            page_start,
            embedded,
        }
    }
}

impl Link for TimingLink {
    fn after(&self, op: &Operation, _outcome: &mut Outcome) {
        if self.embedded {
            return;
        }
        let Some(analytics) = &self.analytics else {
            return;
        };

        let elapsed = self.page_start.elapsed();
        if let Err(e) = analytics.timing(&op.operation_name, elapsed) {
            tracing::warn!(operation = %op.operation_name, error = %e, "unable to time operation");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
