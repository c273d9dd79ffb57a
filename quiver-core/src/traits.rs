//! Trait seams the client is generic over
//!
//! Implementations must be thread-safe (Send + Sync); the async traits are
//! object-safe so link stages can hold `Arc<dyn ...>` handles.

use crate::error::{InstrumentationError, TransportError};
use crate::operation::{GraphQlResponse, Operation};
use async_trait::async_trait;
use std::time::Duration;

/// Executes the actual network call. Terminal stage of the link chain;
/// retry, if any, is this layer's responsibility, never the chain's.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, op: &Operation) -> Result<GraphQlResponse, TransportError>;
}

/// Resolves the ambient session token. The auth stage awaits this before
/// forwarding; `None` means the request goes out unauthenticated.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Option<String>;
}

/// Sink for client-side timing events.
pub trait Analytics: Send + Sync {
    /// Report how long an operation took, keyed by its operation name.
    fn timing(&self, operation: &str, duration: Duration) -> Result<(), InstrumentationError>;
}

/// Actions the client raises toward the host application's state store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show a user-visible error notification.
    DisplayError { message: String, code: u16 },
    /// Navigate to a path (auth-expiry redirect).
    Push(String),
}

/// Injected dispatch capability. The facade takes this at construction;
/// nothing in the workspace binds to a host store directly.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: Action);
}
