//! Error link
//!
//! Centralized inspection of every terminal outcome. Responsibilities:
//! - auth expiry (code 401): clear the persisted session token, remember
//!   where the user was (unless already on /login), navigate to /login
//! - remaining application errors: coalesce into one combined notification
//!   per operation (messages concatenated, last code wins)
//! - transport failures: one fallback notification, only when no
//!   application-error notification already went out
//!
//! Application errors and transport failures are independent checks; an
//! auth redirect does not suppress the transport fallback. At most one
//! DisplayError is dispatched per failed operation. Nothing is retried
//! here.

use crate::links::Link;
use quiver_core::{keys, Action, Dispatch, Location, Operation, Outcome, PageStore};
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/login";

/// Fallback shown when an error carries no better message.
const APPLICATION_ERROR: &str = "Application Error";
/// Shown for generic connectivity loss.
const NETWORK_ERROR: &str = "Network Error";

pub struct ErrorLink {
    dispatch: Arc<dyn Dispatch>,
    store: Arc<dyn PageStore>,
    location: Location,
}

impl ErrorLink {
    pub fn new(dispatch: Arc<dyn Dispatch>, store: Arc<dyn PageStore>, location: Location) -> Self {
        Self {
            dispatch,
            store,
            location,
        }
    }

    /// Session cleanup + navigation for an expired session.
    fn redirect_to_login(&self) {
        self.store.remove(keys::ID_TOKEN);
        if self.location.pathname != LOGIN_PATH {
            self.store.set(keys::REDIRECT, &self.location.href);
        }
        self.dispatch.dispatch(Action::Push(LOGIN_PATH.to_string()));
    }
}

impl Link for ErrorLink {
    fn after(&self, op: &Operation, outcome: &mut Outcome) {
        let mut navigated = false;
        let mut accumulated = false;
        let mut message = String::new();
        let mut code = 500;

        for error in outcome.graphql_errors() {
            if error.is_auth_failure() {
                if !navigated {
                    navigated = true;
                    self.redirect_to_login();
                }
            } else {
                accumulated = true;
                message.push_str(&error.message);
                if let Some(c) = error.code {
                    code = c;
                }
            }
        }

        let mut displayed = false;
        if accumulated {
            displayed = true;
            self.dispatch.dispatch(Action::DisplayError { message, code });
        }

        if displayed {
            return;
        }
        let Some(failure) = &outcome.transport_error else {
            return;
        };

        let message = if let Some(body) = &failure.body {
            tracing::error!(
                operation = %op.operation_name,
                body = %body,
                "transport failure carried a response body"
            );
            APPLICATION_ERROR.to_string()
        } else if failure.is_connectivity_loss() {
            NETWORK_ERROR.to_string()
        } else {
            APPLICATION_ERROR.to_string()
        };

        self.dispatch.dispatch(Action::DisplayError {
            message,
            code: failure.status.unwrap_or(503),
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_core::{
        GraphQlError, GraphQlResponse, MemoryPageStore, TransportError, FAILED_TO_FETCH,
    };
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        actions: Mutex<Vec<Action>>,
    }

    impl Recorder {
        fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }

        fn displays(&self) -> Vec<(String, u16)> {
            self.actions()
                .into_iter()
                .filter_map(|a| match a {
                    Action::DisplayError { message, code } => Some((message, code)),
                    _ => None,
                })
                .collect()
        }

        fn pushes(&self) -> Vec<String> {
            self.actions()
                .into_iter()
                .filter_map(|a| match a {
                    Action::Push(path) => Some(path),
                    _ => None,
                })
                .collect()
        }
    }

    impl Dispatch for Recorder {
        fn dispatch(&self, action: Action) {
            self.actions.lock().unwrap().push(action);
        }
    }

    struct Fixture {
        link: ErrorLink,
        recorder: Arc<Recorder>,
        store: Arc<MemoryPageStore>,
    }

    fn fixture(location: Location) -> Fixture {
        let recorder = Arc::new(Recorder::default());
        let store = Arc::new(MemoryPageStore::new());
        store.set(keys::ID_TOKEN, "jwt");
        let link = ErrorLink::new(recorder.clone(), store.clone(), location);
        Fixture {
            link,
            recorder,
            store,
        }
    }

    fn app_location() -> Location {
        Location::new("/runs/7", "https://app.quiver.ai/runs/7", "")
    }

    fn op() -> Operation {
        Operation::new("Runs", "query Runs { runs { id } }", Value::Null)
    }

    fn errors_outcome(errors: Vec<GraphQlError>) -> Outcome {
        Outcome::success(GraphQlResponse::errors(errors))
    }

    #[test]
    fn test_success_dispatches_nothing() {
        let f = fixture(app_location());
        let mut outcome = Outcome::success(GraphQlResponse::data(json!({"runs": []})));
        f.link.after(&op(), &mut outcome);
        assert!(f.recorder.actions().is_empty());
    }

    #[test]
    fn test_auth_failure_clears_session_and_navigates() {
        let f = fixture(app_location());
        let mut outcome = errors_outcome(vec![GraphQlError::new("session expired", 401)]);
        f.link.after(&op(), &mut outcome);

        assert_eq!(f.recorder.pushes(), vec![LOGIN_PATH.to_string()]);
        assert!(f.recorder.displays().is_empty());
        assert_eq!(f.store.get(keys::ID_TOKEN), None);
        assert_eq!(
            f.store.get(keys::REDIRECT).as_deref(),
            Some("https://app.quiver.ai/runs/7")
        );
    }

    #[test]
    fn test_no_redirect_recorded_on_login_page() {
        let f = fixture(Location::new("/login", "https://app.quiver.ai/login", ""));
        let mut outcome = errors_outcome(vec![GraphQlError::new("session expired", 401)]);
        f.link.after(&op(), &mut outcome);

        assert_eq!(f.recorder.pushes(), vec![LOGIN_PATH.to_string()]);
        assert_eq!(f.store.get(keys::REDIRECT), None);
    }

    #[test]
    fn test_401_and_500_navigate_once_and_display_once() {
        let f = fixture(app_location());
        let mut outcome = errors_outcome(vec![
            GraphQlError::new("session expired", 401),
            GraphQlError::new("internal failure", 500),
        ]);
        f.link.after(&op(), &mut outcome);

        assert_eq!(f.recorder.pushes(), vec![LOGIN_PATH.to_string()]);
        assert_eq!(
            f.recorder.displays(),
            vec![("internal failure".to_string(), 500)]
        );
        assert_eq!(f.store.get(keys::ID_TOKEN), None);
    }

    #[test]
    fn test_generic_errors_coalesce_last_code_wins() {
        let f = fixture(app_location());
        let mut outcome = errors_outcome(vec![
            GraphQlError::new("first", 400),
            GraphQlError::new("second", 422),
        ]);
        f.link.after(&op(), &mut outcome);

        assert_eq!(f.recorder.displays(), vec![("firstsecond".to_string(), 422)]);
    }

    #[test]
    fn test_codeless_errors_default_to_500() {
        let f = fixture(app_location());
        let mut outcome = errors_outcome(vec![GraphQlError::new("boom", None)]);
        f.link.after(&op(), &mut outcome);

        assert_eq!(f.recorder.displays(), vec![("boom".to_string(), 500)]);
    }

    #[test]
    fn test_repeated_401_navigates_once() {
        let f = fixture(app_location());
        let mut outcome = errors_outcome(vec![
            GraphQlError::new("session expired", 401),
            GraphQlError::new("still expired", 401),
        ]);
        f.link.after(&op(), &mut outcome);

        assert_eq!(f.recorder.pushes().len(), 1);
        assert!(f.recorder.displays().is_empty());
    }

    #[test]
    fn test_connectivity_loss_becomes_network_error_503() {
        let f = fixture(app_location());
        let mut outcome = Outcome::failure(TransportError::connect(FAILED_TO_FETCH));
        f.link.after(&op(), &mut outcome);

        assert_eq!(
            f.recorder.displays(),
            vec![("Network Error".to_string(), 503)]
        );
        assert!(f.recorder.pushes().is_empty());
    }

    #[test]
    fn test_transport_failure_with_status_keeps_status() {
        let f = fixture(app_location());
        let mut outcome =
            Outcome::failure(TransportError::status(502, None, "server returned 502"));
        f.link.after(&op(), &mut outcome);

        assert_eq!(
            f.recorder.displays(),
            vec![("Application Error".to_string(), 502)]
        );
    }

    #[test]
    fn test_transport_failure_with_body_logs_and_notifies() {
        let f = fixture(app_location());
        let body = json!({"errors": [{"message": "bad gateway"}]});
        let mut outcome =
            Outcome::failure(TransportError::status(502, Some(body), "server returned 502"));
        f.link.after(&op(), &mut outcome);

        assert_eq!(
            f.recorder.displays(),
            vec![("Application Error".to_string(), 502)]
        );
    }

    #[test]
    fn test_application_errors_suppress_transport_fallback() {
        let f = fixture(app_location());
        let mut outcome = errors_outcome(vec![GraphQlError::new("boom", 500)]);
        outcome.transport_error = Some(TransportError::connect(FAILED_TO_FETCH));
        f.link.after(&op(), &mut outcome);

        // One DisplayError total: the application error wins.
        assert_eq!(f.recorder.displays(), vec![("boom".to_string(), 500)]);
    }

    #[test]
    fn test_auth_only_errors_do_not_suppress_transport_fallback() {
        let f = fixture(app_location());
        let mut outcome = errors_outcome(vec![GraphQlError::new("session expired", 401)]);
        outcome.transport_error = Some(TransportError::connect(FAILED_TO_FETCH));
        f.link.after(&op(), &mut outcome);

        assert_eq!(f.recorder.pushes(), vec![LOGIN_PATH.to_string()]);
        assert_eq!(
            f.recorder.displays(),
            vec![("Network Error".to_string(), 503)]
        );
    }
}
