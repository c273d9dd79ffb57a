//! Client facade
//!
//! [`QuiverClient`] is the object UI code holds to issue queries and
//! mutations. It assembles the link chain in its fixed order (auth, trace,
//! timing, error dispatch), owns the transport and the entity cache, and
//! takes the host's dispatch capability at construction.

use crate::cache::EntityCache;
use crate::endpoint;
use crate::links::{AuthLink, ErrorLink, Link, TimingLink, TraceLink};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use quiver_core::{
    Analytics, Dispatch, GraphQlResponse, Location, MemoryPageStore, Operation, Outcome,
    PageStore, QuiverResult, TokenSource, Transport,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Anonymous session: no ambient token.
struct NoSession;

#[async_trait]
impl TokenSource for NoSession {
    async fn token(&self) -> Option<String> {
        None
    }
}

pub struct QuiverClientBuilder {
    dispatch: Arc<dyn Dispatch>,
    environment: Option<String>,
    endpoint_url: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn PageStore>>,
    token_source: Option<Arc<dyn TokenSource>>,
    analytics: Option<Arc<dyn Analytics>>,
    location: Location,
    embedded: bool,
}

impl QuiverClientBuilder {
    /// The dispatch capability is the one thing every client needs: error
    /// notifications and the auth redirect flow both go through it.
    pub fn new(dispatch: Arc<dyn Dispatch>) -> Self {
        Self {
            dispatch,
            environment: None,
            endpoint_url: None,
            transport: None,
            store: None,
            token_source: None,
            analytics: None,
            location: Location::default(),
            embedded: false,
        }
    }

    /// Named deployment environment (see [`crate::endpoint`]).
    pub fn environment(mut self, name: impl Into<String>) -> Self {
        self.environment = Some(name.into());
        self
    }

    /// Explicit backend URL, bypassing the environment table.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Replace the HTTP transport (tests inject a mock here).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn page_store(mut self, store: Arc<dyn PageStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(source);
        self
    }

    pub fn analytics(mut self, analytics: Arc<dyn Analytics>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// The page location captured at construction; source of the `token`
    /// and `trace` query parameters and the auth-redirect bookkeeping.
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Host-controlled embedded mode: auth and timing stages pass through.
    pub fn embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn build(self) -> QuiverResult<QuiverClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let url = match self.endpoint_url {
                    Some(url) => url,
                    None => endpoint::resolve(self.environment.as_deref())?,
                };
                Arc::new(HttpTransport::new(url))
            }
        };

        let store: Arc<dyn PageStore> = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryPageStore::new()));
        let token_source: Arc<dyn TokenSource> =
            self.token_source.unwrap_or_else(|| Arc::new(NoSession));

        let links: Vec<Arc<dyn Link>> = vec![
            Arc::new(AuthLink::new(
                token_source,
                self.location.clone(),
                self.embedded,
            )),
            Arc::new(TraceLink::new(store.clone(), self.location.clone())),
            Arc::new(TimingLink::new(
                self.analytics,
                Instant::now(),
                self.embedded,
            )),
            Arc::new(ErrorLink::new(self.dispatch, store, self.location)),
        ];

        Ok(QuiverClient {
            links,
            transport,
            cache: EntityCache::new(),
        })
    }
}

pub struct QuiverClient {
    links: Vec<Arc<dyn Link>>,
    transport: Arc<dyn Transport>,
    cache: EntityCache,
}

impl std::fmt::Debug for QuiverClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuiverClient")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl QuiverClient {
    pub fn builder(dispatch: Arc<dyn Dispatch>) -> QuiverClientBuilder {
        QuiverClientBuilder::new(dispatch)
    }

    /// Issue a query. GraphQL errors come back on the response (the error
    /// link has already dispatched for them); transport failures surface as
    /// `Err` after dispatch.
    pub async fn query(
        &self,
        operation_name: &str,
        document: &str,
        variables: Value,
    ) -> QuiverResult<GraphQlResponse> {
        self.execute(Operation::new(operation_name, document, variables))
            .await
    }

    /// Issue a mutation. Same chain and semantics as [`Self::query`].
    pub async fn mutate(
        &self,
        operation_name: &str,
        document: &str,
        variables: Value,
    ) -> QuiverResult<GraphQlResponse> {
        self.execute(Operation::new(operation_name, document, variables))
            .await
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    async fn execute(&self, mut op: Operation) -> QuiverResult<GraphQlResponse> {
        // Request side, left to right. Auth may suspend here; dropping the
        // future before it resolves means the transport is never reached.
        for link in &self.links {
            link.before(&mut op).await?;
        }

        let result = self.transport.execute(&op).await;

        // Response side, right to left.
        let mut outcome = Outcome::from(result);
        for link in self.links.iter().rev() {
            link.after(&op, &mut outcome);
        }

        if let Some(error) = outcome.transport_error {
            return Err(error.into());
        }
        let response = outcome.response.unwrap_or_default();
        if let Some(data) = &response.data {
            self.cache.ingest(data);
        }
        Ok(response)
    }
}

// =============================================================================
// TESTS
// =============================================================================
