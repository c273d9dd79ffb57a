//! The link chain
//!
//! An operation flows through an explicit ordered list of stages. Each stage
//! may mutate the outgoing operation in `before` (headers accumulate in its
//! context) and observe or transform the terminal outcome in `after`.
//! `before` hooks run left-to-right ahead of the transport; `after` hooks
//! compose in reverse order behind it. Order is significant: auth and trace
//! must attach headers before the transport executes.
//!
//! Only the auth stage suspends the forward path (it awaits token
//! resolution); dropping the in-flight future during that await cancels the
//! operation before any network call.

pub mod auth;
pub mod error;
pub mod timing;
pub mod trace;

pub use auth::AuthLink;
pub use error::ErrorLink;
pub use timing::TimingLink;
pub use trace::TraceLink;

use async_trait::async_trait;
use quiver_core::{Operation, Outcome, QuiverResult};

/// One stage of the chain.
#[async_trait]
pub trait Link: Send + Sync {
    /// Observe/mutate the outgoing operation. May suspend; the operation is
    /// not forwarded until this resolves.
    async fn before(&self, op: &mut Operation) -> QuiverResult<()> {
        let _ = op;
        Ok(())
    }

    /// Observe/transform the terminal outcome. Runs for failures too.
    fn after(&self, op: &Operation, outcome: &mut Outcome) {
        let _ = (op, outcome);
    }
}
