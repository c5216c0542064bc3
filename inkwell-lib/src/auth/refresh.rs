//! Access token refresh.

use serde_json::{Value, json};

use crate::api::endpoints;
use crate::api::{ApiRequest, Method, Transport};
use crate::session::{Session, parse_jwt};

/// Refresh the session's access token if it needs one.
///
/// Returns `false` without touching the network when the current token is
/// usable. Otherwise posts to the refresh endpoint with credentials and
/// returns `true` once a new token is stored. Every failure (non-2xx status,
/// a body without a string `accessToken`, a transport error) clears the
/// session and returns `false`; errors never escape.
pub async fn refresh_if_needed(transport: &dyn Transport, session: &Session) -> bool {
    if !session.needs_refresh() {
        return false;
    }

    let _gate = session.refresh_gate.lock().await;
    // Another caller may have refreshed while we waited
    if !session.needs_refresh() {
        return true;
    }

    let body = match session.refresh_token() {
        Some(token) => json!({ "refreshToken": token }),
        None => json!({}),
    };
    let request = ApiRequest::new(Method::Post, endpoints::auth::refresh())
        .body(body)
        .with_credentials();

    let failure = match transport.send(request).await {
        Ok(response) if response.is_success() => {
            let token = response
                .json::<Value>()
                .ok()
                .and_then(|body| body.get("accessToken").and_then(Value::as_str).map(str::to_string));
            match token {
                Some(token) => {
                    let exp = parse_jwt(&token).and_then(|payload| payload.exp);
                    match session.set_access_token(Some(token.as_str()), exp).await {
                        Ok(()) => {
                            log::debug!("[auth] access token refreshed");
                            return true;
                        }
                        Err(e) => format!("could not store refreshed token: {}", e),
                    }
                }
                None => "response carried no access token".to_string(),
            }
        }
        Ok(response) => format!("refresh rejected with status {}", response.status),
        Err(e) => e.to_string(),
    };

    log::warn!("[auth] token refresh failed: {}", failure);
    if let Err(e) = session.clear().await {
        log::error!("[auth] failed to clear session: {}", e);
    }
    false
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::{RawResponse, SimulatedBackend};
    use crate::storage::Storage;

    async fn session() -> Arc<Session> {
        Arc::new(Session::open(Storage::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn usable_token_skips_the_network() {
        let backend = SimulatedBackend::new();
        let session = session().await;
        session.set_access_token(Some("t"), None).await.unwrap();

        assert!(!refresh_if_needed(&backend, &session).await);
        assert!(backend.requests().is_empty());
        assert_eq!(session.access_token().as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn malformed_body_clears_the_session() {
        let backend = SimulatedBackend::new();
        backend.set_refresh_response(Some(RawResponse::new(200, r#"{"accessToken":42}"#)));
        let session = session().await;
        session.set_refresh_token(Some("r")).await.unwrap();

        assert!(!refresh_if_needed(&backend, &session).await);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(backend.requests(), vec!["POST /v1/auth/refresh"]);
    }

    #[tokio::test]
    async fn new_token_is_stored_with_its_expiry() {
        let backend = SimulatedBackend::new();
        backend.set_refresh_response(Some(RawResponse::new(
            200,
            // {"exp":4000000000}
            r#"{"accessToken":"e30.eyJleHAiOjQwMDAwMDAwMDB9.sig"}"#,
        )));
        let session = session().await;

        assert!(refresh_if_needed(&backend, &session).await);
        assert_eq!(session.token_exp(), Some(4_000_000_000));
    }
}
