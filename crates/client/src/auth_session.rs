//! Student session management with durable persistence.
//!
//! The session record (bearer token + identity claims) lives in a signal
//! provided at the app root and is mirrored to durable storage, which is the
//! only source of truth across reloads. There is no client-side token
//! validation; a revoked token only surfaces when an authenticated call
//! comes back with an authorization error.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use campusfeed_shared::SessionClaims;

use crate::api_client::ApiClient;
use crate::storage;

const SESSION_KEY: &str = "campusfeed_session";

/// Auth context provided to the app.
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub session: Signal<Option<StudentSession>>,
}

/// Stored session record, shaped exactly like what the login endpoint
/// returns.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StudentSession {
    pub token: String,
    pub payload: SessionClaims,
}

/// Provider component that sets up the auth context.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    // A missing or corrupt persisted record loads as "not signed in".
    let session = use_signal(|| storage::load::<StudentSession>(SESSION_KEY));

    // Mirror the in-memory session to durable storage.
    use_effect(move || match session.cloned() {
        Some(sess) => {
            if !storage::save(SESSION_KEY, &sess) {
                crate::log_warn!("failed to persist session");
            }
        }
        None => storage::remove(SESSION_KEY),
    });

    use_context_provider(|| AuthContext { session });

    children
}

impl AuthContext {
    /// Store a freshly issued token and its identity payload, replacing any
    /// prior session.
    pub fn login(&mut self, token: String, payload: SessionClaims) {
        self.session.set(Some(StudentSession { token, payload }));
    }

    /// Clear the session in memory and in durable storage.
    pub fn logout(&mut self) {
        storage::remove(SESSION_KEY);
        self.session.set(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Identity claims of the signed-in student.
    pub fn claims(&self) -> Option<SessionClaims> {
        self.session.read().as_ref().map(|s| s.payload.clone())
    }

    /// API client carrying the current bearer token, if any.
    pub fn client(&self) -> ApiClient {
        ApiClient::new().with_token(self.session.read().as_ref().map(|s| s.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_record_matches_login_wire_shape() {
        let stored: StudentSession = serde_json::from_str(
            r#"{"token":"tok1","payload":{"usuario":"ana.alumno","id_carrera":"car_ing_sis"}}"#,
        )
        .unwrap();
        assert_eq!(stored.token, "tok1");
        assert_eq!(stored.payload.usuario, "ana.alumno");

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["payload"]["id_carrera"], "car_ing_sis");
    }
}
