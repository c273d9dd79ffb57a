//! HTTP transport
//!
//! Terminal stage of the chain: posts the operation as a standard GraphQL
//! JSON body and maps failures into [`TransportError`]. Connect-class
//! failures surface with the browser-fetch style "Failed to fetch" message
//! the dispatcher keys on. Timeouts and retry are left to reqwest
//! configuration and the backend respectively.

use async_trait::async_trait;
use quiver_core::{
    GraphQlRequest, GraphQlResponse, Operation, Transport, TransportError, FAILED_TO_FETCH,
};
use reqwest::Client;

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Reuse an existing reqwest client (connection pool, TLS config).
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, op: &Operation) -> Result<GraphQlResponse, TransportError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest::from_operation(op));
        for (name, value) in op.headers() {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_request() {
                TransportError::connect(FAILED_TO_FETCH)
            } else {
                TransportError::connect(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            TransportError::status(status.as_u16(), None, format!("failed to read body: {e}"))
        })?;

        if !status.is_success() {
            // Keep whatever the server said, parsed when possible.
            let body = serde_json::from_str(&text).ok();
            return Err(TransportError::status(
                status.as_u16(),
                body,
                format!("server returned {status}"),
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            TransportError::status(
                status.as_u16(),
                None,
                format!("failed to parse response: {e}"),
            )
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
