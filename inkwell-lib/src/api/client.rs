//! ApiClient

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::{ApiRequest, Method, Transport};
use crate::auth::refresh_if_needed;
use crate::error::ApiError;
use crate::session::Session;

/// Message used when an error body carries nothing better.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: T,
}

/// JSON API client bound to a session.
///
/// Every request first gives the session a chance to refresh its access
/// token, then attaches it as a bearer token when one is present. Non-2xx
/// responses become [`ApiError::Http`].
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::new(ReqwestTransport::new("http://localhost:3000")?, session);
/// let page: ApiResponse<UsersPage> = client.get(&endpoints::users::list(1)).await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static, session: Arc<Session>) -> Self {
        Self::from_arc(Arc::new(transport), session)
    }

    /// Create a client over a shared transport.
    pub fn from_arc(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner { transport, session }),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::Post, path, Some(to_value(body)?)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::Put, path, Some(to_value(body)?)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::Patch, path, Some(to_value(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::Delete, path, None).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let session = &self.inner.session;
        refresh_if_needed(self.inner.transport.as_ref(), session).await;

        let mut request = ApiRequest::new(method, path).bearer(session.access_token());
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = self.inner.transport.send(request).await?;
        if !response.is_success() {
            let message = error_message(&response.body);
            log::debug!("[api] {} {} -> {}: {}", method.as_str(), path, response.status, message);
            return Err(ApiError::http(response.status, message));
        }

        Ok(ApiResponse {
            ok: true,
            data: response.json()?,
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::parse(e.to_string()))
}

/// Error message for a failed response body: the JSON `message` field, else
/// the whole JSON body, else [`DEFAULT_ERROR_MESSAGE`].
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => match json.get("message") {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            Some(message) if is_truthy(message) => message.to_string(),
            _ => json.to_string(),
        },
        Err(_) => DEFAULT_ERROR_MESSAGE.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
