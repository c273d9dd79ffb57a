//! Quiver Client
//!
//! The GraphQL client layer the app holds to talk to the run-tracking
//! backend. It wires together:
//! - endpoint resolution (named environment table + env-var override)
//! - an ordered link chain: auth header injection, trace header injection,
//!   performance timing, centralized error dispatch
//! - an HTTP transport over reqwest
//! - an entity cache whose identity function keeps concurrent partial
//!   fetches of the same run from overwriting each other
//!
//! Assemble one with [`QuiverClient::builder`]; the host app injects its
//! dispatch capability (notifications + navigation) at construction.

pub mod cache;
pub mod client;
pub mod endpoint;
pub mod links;
pub mod transport;

pub use cache::EntityCache;
pub use client::{QuiverClient, QuiverClientBuilder};
pub use endpoint::{resolve, resolve_with, Environment};
pub use transport::HttpTransport;

// Core types callers touch on every request.
pub use quiver_core::{
    Action, Analytics, Dispatch, GraphQlError, GraphQlResponse, Location, MemoryPageStore,
    Operation, Outcome, PageStore, QuiverError, QuiverResult, TokenSource, Transport,
    TransportError,
};
