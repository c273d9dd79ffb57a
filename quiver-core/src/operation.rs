//! Operation and response model
//!
//! One [`Operation`] is one request/response cycle: created by the client
//! facade, mutated in place by each link stage (headers accumulate), sent by
//! the transport, then discarded. The terminal result is an [`Outcome`],
//! which the error dispatcher inspects after the fact.

use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A request descriptor flowing through the link chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operation name as it appears in the GraphQL document.
    pub operation_name: String,
    /// The GraphQL document text.
    pub query: String,
    /// Variables object (JSON null when the operation takes none).
    pub variables: Value,
    headers: BTreeMap<String, String>,
}

impl Operation {
    pub fn new(operation_name: impl Into<String>, query: impl Into<String>, variables: Value) -> Self {
        Self {
            operation_name: operation_name.into(),
            query: query.into(),
            variables,
            headers: BTreeMap::new(),
        }
    }

    /// Set a header on the operation's context. Later stages and the
    /// transport see the accumulated map.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Wire form of a GraphQL request body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    #[serde(rename = "operationName")]
    pub operation_name: &'a str,
    pub query: &'a str,
    pub variables: &'a Value,
}

impl<'a> GraphQlRequest<'a> {
    pub fn from_operation(op: &'a Operation) -> Self {
        Self {
            operation_name: &op.operation_name,
            query: &op.query,
            variables: &op.variables,
        }
    }
}

/// Application-level error from a response's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>, code: impl Into<Option<u16>>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }

    /// Whether this error signals an expired or invalid session.
    pub fn is_auth_failure(&self) -> bool {
        self.code == Some(401)
    }
}

/// A parsed GraphQL response. May carry data, errors, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn errors(errors: Vec<GraphQlError>) -> Self {
        Self {
            data: None,
            errors,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Terminal result of an operation. A response and a transport failure are
/// independent axes: a failed fetch has no response, but a response whose
/// body carried errors is still a response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub response: Option<GraphQlResponse>,
    pub transport_error: Option<TransportError>,
}

impl Outcome {
    pub fn success(response: GraphQlResponse) -> Self {
        Self {
            response: Some(response),
            transport_error: None,
        }
    }

    pub fn failure(error: TransportError) -> Self {
        Self {
            response: None,
            transport_error: Some(error),
        }
    }

    pub fn graphql_errors(&self) -> &[GraphQlError] {
        self.response
            .as_ref()
            .map(|r| r.errors.as_slice())
            .unwrap_or(&[])
    }
}

impl From<Result<GraphQlResponse, TransportError>> for Outcome {
    fn from(result: Result<GraphQlResponse, TransportError>) -> Self {
        match result {
            Ok(response) => Self::success(response),
            Err(error) => Self::failure(error),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_headers_accumulate() {
        let mut op = Operation::new("Runs", "query Runs { runs { id } }", Value::Null);
        op.set_header("authorization", "Bearer abc");
        op.set_header("X-Cloud-Trace-Context", "p/0;o=1");

        assert_eq!(op.header("authorization"), Some("Bearer abc"));
        assert_eq!(op.headers().count(), 2);
    }

    #[test]
    fn test_graphql_request_wire_shape() {
        let op = Operation::new("Runs", "query Runs { runs { id } }", json!({"limit": 10}));
        let body = serde_json::to_value(GraphQlRequest::from_operation(&op)).unwrap();
        assert_eq!(body["operationName"], "Runs");
        assert_eq!(body["variables"]["limit"], 10);
    }

    #[test]
    fn test_graphql_response_parses_errors_array() {
        let raw = json!({
            "data": null,
            "errors": [
                {"message": "session expired", "code": 401},
                {"message": "boom"}
            ]
        });
        let resp: GraphQlResponse = serde_json::from_value(raw).unwrap();
        assert!(resp.has_errors());
        assert!(resp.errors[0].is_auth_failure());
        assert_eq!(resp.errors[1].code, None);
    }

    #[test]
    fn test_graphql_response_parses_missing_errors() {
        let raw = json!({"data": {"runs": []}});
        let resp: GraphQlResponse = serde_json::from_value(raw).unwrap();
        assert!(!resp.has_errors());
        assert!(resp.data.is_some());
    }

    #[test]
    fn test_outcome_axes() {
        let ok = Outcome::from(Ok(GraphQlResponse::data(json!({}))));
        assert!(ok.transport_error.is_none());
        assert!(ok.graphql_errors().is_empty());

        let err = Outcome::from(Err(crate::TransportError::connect("Failed to fetch")));
        assert!(err.response.is_none());
        assert!(err.transport_error.is_some());
    }
}
