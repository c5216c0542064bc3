//! Authentication: login, logout, the current user and token refresh.

mod refresh;

pub use refresh::refresh_if_needed;

use serde_json::{Value, json};

use crate::api::{ApiClient, endpoints};
use crate::error::AuthError;
use crate::model::{LoginRequest, LoginResponse, User};
use crate::session::parse_jwt;

/// Message shown when a failed login carries nothing better.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Outcome of [`AuthService::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    Success(LoginResponse),
    Failure { message: String },
}

impl LoginResult {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginResult::Success(_))
    }

    /// The failure message, if the login failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            LoginResult::Failure { message } => Some(message),
            LoginResult::Success(_) => None,
        }
    }
}

/// Login, logout and user lookup over an [`ApiClient`] and its session.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `true` while the session holds an access token.
    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_access_token_valid()
    }

    /// Post credentials and store the returned tokens.
    ///
    /// Failures are reported in the result rather than as errors, and store
    /// no tokens.
    pub async fn login(&self, credentials: &LoginRequest) -> LoginResult {
        let response = match self
            .client
            .post::<LoginResponse, _>(endpoints::auth::login(), credentials)
            .await
        {
            Ok(response) => response.data,
            Err(e) => {
                log::info!("[auth] login failed: {}", e);
                let message = e.user_message();
                let message = if message.is_empty() {
                    LOGIN_FAILED_MESSAGE.to_string()
                } else {
                    message
                };
                return LoginResult::Failure { message };
            }
        };

        let session = self.client.session();
        if let Some(token) = &response.access_token {
            let exp = response
                .expires_in
                .map(|secs| chrono::Utc::now().timestamp() + secs)
                .or_else(|| parse_jwt(token).and_then(|payload| payload.exp));
            if let Err(e) = session.set_access_token(Some(token.as_str()), exp).await {
                log::error!("[auth] failed to store access token: {}", e);
                return LoginResult::Failure {
                    message: LOGIN_FAILED_MESSAGE.to_string(),
                };
            }
        }
        if let Some(refresh) = &response.refresh_token {
            if let Err(e) = session.set_refresh_token(Some(refresh.as_str())).await {
                log::warn!("[auth] failed to store refresh token: {}", e);
            }
        }

        log::info!("[auth] logged in as {}", credentials.email);
        LoginResult::Success(response)
    }

    /// Tell the server to end the session, then forget the tokens.
    ///
    /// The tokens are cleared even when the request fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Err(e) = self
            .client
            .post::<Value, _>(endpoints::auth::logout(), &json!({}))
            .await
        {
            log::warn!("[auth] logout request failed: {}", e);
        }
        self.client.session().clear().await?;
        log::info!("[auth] logged out");
        Ok(())
    }

    /// Fetch the signed-in user.
    pub async fn me(&self) -> Result<User, AuthError> {
        match self.client.get::<User>(endpoints::me()).await {
            Ok(response) => Ok(response.data),
            Err(e) if e.is_unauthorized() => Err(AuthError::NotAuthenticated),
            Err(e) => Err(e.into()),
        }
    }

    /// The signed-in user, or `None` when there is no session or the lookup
    /// fails.
    pub async fn current_user(&self) -> Option<User> {
        if !self.is_authenticated() {
            return None;
        }
        match self.me().await {
            Ok(user) => Some(user),
            Err(e) => {
                log::debug!("[auth] no current user: {}", e);
                None
            }
        }
    }

    /// Refresh the access token if the session needs one.
    pub async fn refresh_if_needed(&self) -> bool {
        refresh_if_needed(self.client.transport().as_ref(), self.client.session()).await
    }
}
