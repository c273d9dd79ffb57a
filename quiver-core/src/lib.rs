//! Quiver Core - Client Types
//!
//! Shared types for the quiver GraphQL client: the per-call operation and
//! response model, the error taxonomy, cache identity derivation, and the
//! trait seams (transport, token source, dispatch, analytics, page store)
//! the client crate is generic over. No I/O lives here.

pub mod error;
pub mod identity;
pub mod operation;
pub mod page;
pub mod traits;

pub use error::{
    ConfigError, InstrumentationError, QuiverError, QuiverResult, TransportError, FAILED_TO_FETCH,
};
pub use identity::cache_id;
pub use operation::{GraphQlError, GraphQlRequest, GraphQlResponse, Operation, Outcome};
pub use page::{keys, page_id, parse_query, Location, MemoryPageStore, PageStore};
pub use traits::{Action, Analytics, Dispatch, TokenSource, Transport};
