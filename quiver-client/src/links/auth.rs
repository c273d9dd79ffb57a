//! Auth link
//!
//! Resolves a bearer token before the operation is forwarded. The signup
//! flow lands with a `token` query parameter, which takes priority over the
//! ambient session token. In embedded mode the host environment supplies its
//! own auth and this stage passes everything through untouched.

use crate::links::Link;
use async_trait::async_trait;
use quiver_core::{Location, Operation, QuiverResult, TokenSource};
use std::sync::Arc;

pub struct AuthLink {
    source: Arc<dyn TokenSource>,
    location: Location,
    embedded: bool,
}

impl AuthLink {
    pub fn new(source: Arc<dyn TokenSource>, location: Location, embedded: bool) -> Self {
        Self {
            source,
            location,
            embedded,
        }
    }

    /// URL token when present and non-empty, else the session token.
    async fn resolve_token(&self) -> Option<String> {
        let session = self.source.token().await;
        self.location
            .query_param("token")
            .filter(|t| !t.is_empty())
            .or(session)
    }
}

#[async_trait]
impl Link for AuthLink {
    async fn before(&self, op: &mut Operation) -> QuiverResult<()> {
        if self.embedded {
            return Ok(());
        }

        if let Some(token) = self.resolve_token().await {
            op.set_header("authorization", format!("Bearer {token}"));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    struct FixedToken(Option<&'static str>);

    #[async_trait]
    impl TokenSource for FixedToken {
        async fn token(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn op() -> Operation {
        Operation::new("Runs", "query Runs { runs { id } }", Value::Null)
    }

    #[tokio::test]
    async fn test_session_token_attached_as_bearer() {
        let link = AuthLink::new(Arc::new(FixedToken(Some("jwt"))), Location::default(), false);
        let mut op = op();
        link.before(&mut op).await.unwrap();
        assert_eq!(op.header("authorization"), Some("Bearer jwt"));
    }

    #[tokio::test]
    async fn test_query_param_token_wins_over_session() {
        let location = Location::new("/signup", "https://app/signup?token=urltok", "?token=urltok");
        let link = AuthLink::new(Arc::new(FixedToken(Some("jwt"))), location, false);
        let mut op = op();
        link.before(&mut op).await.unwrap();
        assert_eq!(op.header("authorization"), Some("Bearer urltok"));
    }

    #[tokio::test]
    async fn test_empty_query_param_falls_back_to_session() {
        let location = Location::new("/signup", "https://app/signup?token=", "?token=");
        let link = AuthLink::new(Arc::new(FixedToken(Some("jwt"))), location, false);
        let mut op = op();
        link.before(&mut op).await.unwrap();
        assert_eq!(op.header("authorization"), Some("Bearer jwt"));
    }

    #[tokio::test]
    async fn test_no_token_means_no_header() {
        let link = AuthLink::new(Arc::new(FixedToken(None)), Location::default(), false);
        let mut op = op();
        link.before(&mut op).await.unwrap();
        assert_eq!(op.header("authorization"), None);
    }

    #[tokio::test]
    async fn test_embedded_mode_passes_through() {
        let location = Location::new("/", "https://app/?token=urltok", "?token=urltok");
        let link = AuthLink::new(Arc::new(FixedToken(Some("jwt"))), location, true);
        let mut op = op();
        link.before(&mut op).await.unwrap();
        assert_eq!(op.header("authorization"), None);
    }
}
