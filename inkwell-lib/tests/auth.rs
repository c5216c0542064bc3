//! Login, refresh and API calls against the simulated backend.

use std::sync::Arc;

use inkwell_lib::api::{
    ApiClient, DEMO_EMAIL, DEMO_PASSWORD, RawResponse, SimulatedBackend, Transport, endpoints,
};
use inkwell_lib::auth::{AuthService, refresh_if_needed};
use inkwell_lib::error::{ApiError, AuthError};
use inkwell_lib::model::{LoginRequest, NewUser, User, UsersPage};
use inkwell_lib::session::Session;
use inkwell_lib::storage::Storage;

async fn setup_with(backend: SimulatedBackend, check_expiry: bool) -> (Arc<SimulatedBackend>, AuthService) {
    let backend = Arc::new(backend);
    let session = Session::open(Storage::in_memory())
        .await
        .unwrap()
        .with_expiry_check(check_expiry);
    let client = ApiClient::from_arc(backend.clone() as Arc<dyn Transport>, Arc::new(session));
    (backend, AuthService::new(client))
}

async fn setup() -> (Arc<SimulatedBackend>, AuthService) {
    setup_with(SimulatedBackend::new(), false).await
}

async fn login(auth: &AuthService) {
    let result = auth.login(&LoginRequest::new(DEMO_EMAIL, DEMO_PASSWORD)).await;
    assert!(result.is_success(), "{:?}", result);
}

// =============================================================================
// Login / logout
// =============================================================================

#[tokio::test]
async fn test_wrong_password_reports_failure_without_token() {
    let (_, auth) = setup().await;
    let result = auth
        .login(&LoginRequest::new(DEMO_EMAIL, "wrong-password"))
        .await;

    assert_eq!(result.error(), Some("Invalid email or password"));
    assert!(!auth.is_authenticated());
    assert_eq!(auth.client().session().access_token(), None);
}

#[tokio::test]
async fn test_missing_credentials_are_rejected() {
    let (_, auth) = setup().await;
    let result = auth.login(&LoginRequest::new("", "")).await;
    assert_eq!(result.error(), Some("Email and password are required"));
}

#[tokio::test]
async fn test_login_stores_tokens_and_me_succeeds() {
    let (_, auth) = setup().await;
    login(&auth).await;

    let session = auth.client().session();
    assert!(session.is_access_token_valid());
    assert!(session.refresh_token().is_some());
    assert!(session.token_exp().is_some());

    let me = auth.me().await.unwrap();
    assert_eq!(me.email, DEMO_EMAIL);
    assert_eq!(auth.current_user().await, Some(me));
}

#[tokio::test]
async fn test_offline_login_reports_failure() {
    let (backend, auth) = setup().await;
    backend.set_offline(true);
    let result = auth.login(&LoginRequest::new(DEMO_EMAIL, DEMO_PASSWORD)).await;
    assert!(!result.is_success());
    assert!(!result.error().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_offline() {
    let (backend, auth) = setup().await;
    login(&auth).await;
    backend.set_offline(true);

    auth.logout().await.unwrap();
    assert!(!auth.is_authenticated());
    assert_eq!(auth.client().session().refresh_token(), None);
    assert_eq!(auth.current_user().await, None);
}

#[tokio::test]
async fn test_me_without_session_is_not_authenticated() {
    let (_, auth) = setup().await;
    assert!(matches!(auth.me().await, Err(AuthError::NotAuthenticated)));
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_lost_access_token_is_refreshed_before_request() {
    let (backend, auth) = setup().await;
    login(&auth).await;
    let session = auth.client().session();
    session.set_access_token(None, None).await.unwrap();

    let me = auth.me().await.unwrap();
    assert_eq!(me.email, DEMO_EMAIL);
    assert!(session.is_access_token_valid());
    assert!(backend
        .requests()
        .contains(&"POST /v1/auth/refresh".to_string()));
}

#[tokio::test]
async fn test_rejected_refresh_clears_session() {
    let (backend, auth) = setup().await;
    backend.set_refresh_response(Some(RawResponse::new(401, r#"{"message":"expired"}"#)));
    let session = auth.client().session();
    session.set_refresh_token(Some("stale")).await.unwrap();

    assert!(!auth.refresh_if_needed().await);
    assert_eq!(session.refresh_token(), None);
    assert!(!session.is_access_token_valid());
}

#[tokio::test]
async fn test_offline_refresh_fails_closed() {
    let (backend, auth) = setup().await;
    login(&auth).await;
    let session = auth.client().session();
    session.set_access_token(None, None).await.unwrap();
    backend.set_offline(true);

    assert!(!refresh_if_needed(backend.as_ref(), session).await);
    assert_eq!(session.refresh_token(), None);
}

#[tokio::test]
async fn test_valid_token_is_not_refreshed() {
    let (backend, auth) = setup().await;
    login(&auth).await;
    let before = backend.requests().len();

    assert!(!auth.refresh_if_needed().await);
    assert_eq!(backend.requests().len(), before);
}

#[tokio::test]
async fn test_expired_token_only_refreshed_when_checking_expiry() {
    // Without expiry checks a present token is sent as is and rejected
    let (backend, auth) = setup().await;
    login(&auth).await;
    backend.expire_access_tokens();
    assert!(matches!(auth.me().await, Err(AuthError::NotAuthenticated)));

    let (backend, auth) = setup_with(SimulatedBackend::new(), true).await;
    login(&auth).await;
    backend.expire_access_tokens();
    let session = auth.client().session();
    let token = session.access_token().unwrap();
    session.set_access_token(Some(token.as_str()), Some(1)).await.unwrap();

    assert_eq!(auth.me().await.unwrap().email, DEMO_EMAIL);
    assert_ne!(session.access_token(), Some(token));
}

// =============================================================================
// API client
// =============================================================================

#[tokio::test]
async fn test_users_are_paged() {
    let (_, auth) = setup_with(SimulatedBackend::new().with_page_size(5), false).await;
    login(&auth).await;

    let page = auth
        .client()
        .get::<UsersPage>(&endpoints::users::list(3))
        .await
        .unwrap();
    assert!(page.ok);
    assert_eq!(page.data.total, 12);
    assert_eq!(page.data.data.len(), 2);
}

#[tokio::test]
async fn test_error_message_comes_from_body() {
    let (_, auth) = setup().await;
    login(&auth).await;

    let err = auth
        .client()
        .get::<User>(&endpoints::users::by_id("999"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, ref message } if message == "User not found"));
}

#[tokio::test]
async fn test_create_and_delete_user() {
    let (backend, auth) = setup().await;
    login(&auth).await;
    let client = auth.client();

    let invalid = NewUser {
        name: String::new(),
        email: "x@example.com".into(),
        role: None,
    };
    let err = client
        .post::<User, _>(endpoints::users::create(), &invalid)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(422));

    let new_user = NewUser {
        name: "Hannah Lee".into(),
        email: "hannah@example.com".into(),
        role: Some("Viewer".into()),
    };
    let created = client
        .post::<User, _>(endpoints::users::create(), &new_user)
        .await
        .unwrap()
        .data;
    assert_eq!(created.name, "Hannah Lee");
    assert_eq!(backend.user_count(), 13);

    client
        .delete::<serde_json::Value>(&endpoints::users::by_id(&created.id))
        .await
        .unwrap();
    assert_eq!(backend.user_count(), 12);
}
