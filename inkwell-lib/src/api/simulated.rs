//! In-process stand-in for the blog API.
//!
//! Answers the same endpoints a real server would, with an optional delay so
//! loading states can be seen, an offline switch, and a way to force the
//! refresh endpoint's answer. Tokens look like JWTs so the session can read
//! their expiry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

use super::endpoints;
use super::transport::{ApiRequest, Method, RawResponse, Transport};
use crate::error::ApiError;
use crate::model::{LoginRequest, LoginResponse, NewUser, User, UsersPage};

/// Email of the seeded demo account.
pub const DEMO_EMAIL: &str = "sarah@example.com";
/// Password of the seeded demo account.
pub const DEMO_PASSWORD: &str = "password123";

const DEFAULT_PAGE_SIZE: u32 = 10;
const ACCESS_TTL_SECS: i64 = 15 * 60;

const SEED_USERS: [(&str, &str, &str); 12] = [
    ("Sarah Johnson", "sarah@example.com", "Admin"),
    ("Mike Chen", "mike@example.com", "Editor"),
    ("Emily Davis", "emily@example.com", "Viewer"),
    ("John Smith", "john@example.com", "Editor"),
    ("Jane Doe", "jane@example.com", "Admin"),
    ("Bob Johnson", "bob@example.com", "Viewer"),
    ("Alice Brown", "alice@example.com", "Editor"),
    ("Charlie Wilson", "charlie@example.com", "Viewer"),
    ("Diana Prince", "diana@example.com", "Editor"),
    ("Ethan Hunt", "ethan@example.com", "Viewer"),
    ("Fiona Green", "fiona@example.com", "Admin"),
    ("George Miller", "george@example.com", "Viewer"),
];

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
    user_id: String,
}

#[derive(Debug, Clone)]
struct Grant {
    user_id: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
struct State {
    users: Vec<User>,
    accounts: Vec<Account>,
    access_tokens: HashMap<String, Grant>,
    refresh_tokens: HashMap<String, String>,
    /// Refresh cookie held on the client side.
    cookie: Option<String>,
    next_id: u32,
    refresh_override: Option<RawResponse>,
    requests: Vec<String>,
}

/// Simulated blog API.
///
/// Seeded with twelve users; the first, `sarah@example.com`, can log in with
/// [`DEMO_PASSWORD`].
#[derive(Debug)]
pub struct SimulatedBackend {
    state: Mutex<State>,
    offline: AtomicBool,
    delay: Duration,
    page_size: u32,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    pub fn new() -> Self {
        let users: Vec<User> = SEED_USERS
            .iter()
            .enumerate()
            .map(|(i, (name, email, role))| User {
                id: (i + 1).to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role: Some(role.to_string()),
            })
            .collect();
        let accounts = vec![Account {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            user_id: "1".to_string(),
        }];

        Self {
            state: Mutex::new(State {
                next_id: users.len() as u32 + 1,
                users,
                accounts,
                access_tokens: HashMap::new(),
                refresh_tokens: HashMap::new(),
                cookie: None,
                refresh_override: None,
                requests: Vec::new(),
            }),
            offline: AtomicBool::new(false),
            delay: Duration::ZERO,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Wait this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Users per page of `/v1/users`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every request fail as if the server were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Force the refresh endpoint's response; `None` restores normal behavior.
    pub fn set_refresh_response(&self, response: Option<RawResponse>) {
        if let Ok(mut state) = self.state.lock() {
            state.refresh_override = response;
        }
    }

    /// Expire every access token issued so far.
    pub fn expire_access_tokens(&self) {
        if let Ok(mut state) = self.state.lock() {
            let past = Utc::now() - chrono::Duration::seconds(1);
            for grant in state.access_tokens.values_mut() {
                grant.expires_at = past;
            }
        }
    }

    /// Requests received so far, as `"METHOD /path"`.
    pub fn requests(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    /// Number of users stored.
    pub fn user_count(&self) -> usize {
        self.state.lock().map(|state| state.users.len()).unwrap_or(0)
    }

    fn route(&self, state: &mut State, request: &ApiRequest) -> RawResponse {
        let route = request.route();
        match (request.method, route) {
            (Method::Post, r) if r == endpoints::auth::login() => self.login(state, request),
            (Method::Post, r) if r == endpoints::auth::refresh() => self.refresh(state, request),
            (Method::Post, r) if r == endpoints::auth::logout() => logout(state, request),
            (Method::Get, r) if r == endpoints::me() => match state.authorize(request) {
                Ok(user_id) => match state.user(&user_id) {
                    Some(user) => respond(200, user),
                    None => message(401, "Unauthorized"),
                },
                Err(response) => response,
            },
            (Method::Get, r) if r == endpoints::users::create() => {
                if let Err(response) = state.authorize(request) {
                    return response;
                }
                let page = request
                    .query_param("page")
                    .and_then(|p| p.parse::<u32>().ok())
                    .unwrap_or(1)
                    .max(1);
                let start = (page as usize - 1).saturating_mul(self.page_size as usize);
                let data: Vec<User> = state
                    .users
                    .iter()
                    .skip(start)
                    .take(self.page_size as usize)
                    .cloned()
                    .collect();
                respond(
                    200,
                    &UsersPage {
                        data,
                        page,
                        page_size: self.page_size,
                        total: state.users.len() as u32,
                    },
                )
            }
            (Method::Post, r) if r == endpoints::users::create() => {
                if let Err(response) = state.authorize(request) {
                    return response;
                }
                state.create_user(request.body.as_ref())
            }
            (method, r) if r.starts_with("/v1/users/") => {
                if let Err(response) = state.authorize(request) {
                    return response;
                }
                let id = urlencoding::decode(&r["/v1/users/".len()..])
                    .map(|id| id.into_owned())
                    .unwrap_or_default();
                state.user_by_id(method, &id, request.body.as_ref())
            }
            _ => message(404, "Not found"),
        }
    }

    fn login(&self, state: &mut State, request: &ApiRequest) -> RawResponse {
        let Some(credentials) = request
            .body
            .clone()
            .and_then(|body| serde_json::from_value::<LoginRequest>(body).ok())
            .filter(|c| !c.email.trim().is_empty() && !c.password.is_empty())
        else {
            return message(400, "Email and password are required");
        };

        let account = state
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(credentials.email.trim()) && a.password == credentials.password)
            .cloned();
        let Some(account) = account else {
            return message(401, "Invalid email or password");
        };

        let access_token = state.issue_access_token(&account.user_id, chrono::Duration::seconds(ACCESS_TTL_SECS));
        let refresh_token = uuid::Uuid::new_v4().to_string();
        state
            .refresh_tokens
            .insert(refresh_token.clone(), account.user_id.clone());
        state.cookie = Some(refresh_token.clone());

        respond(
            200,
            &LoginResponse {
                access_token: Some(access_token),
                refresh_token: Some(refresh_token),
                expires_in: Some(ACCESS_TTL_SECS),
                user: state.user(&account.user_id).cloned(),
            },
        )
    }

    fn refresh(&self, state: &mut State, request: &ApiRequest) -> RawResponse {
        if let Some(response) = &state.refresh_override {
            return response.clone();
        }

        let from_body = request
            .body
            .as_ref()
            .and_then(|body| body.get("refreshToken"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let from_cookie = request
            .with_credentials
            .then(|| state.cookie.clone())
            .flatten();

        let user_id = [from_cookie, from_body]
            .into_iter()
            .flatten()
            .find_map(|token| state.refresh_tokens.get(&token).cloned());
        match user_id {
            Some(user_id) => {
                let access_token = state.issue_access_token(&user_id, chrono::Duration::seconds(ACCESS_TTL_SECS));
                respond(200, &json!({ "accessToken": access_token }))
            }
            None => message(401, "Refresh token missing or invalid"),
        }
    }
}

impl State {
    fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn add_user(&mut self, name: &str, email: &str, role: Option<String>) -> User {
        let user = User {
            id: self.next_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        };
        self.next_id += 1;
        self.users.push(user.clone());
        user
    }

    fn authorize(&self, request: &ApiRequest) -> Result<String, RawResponse> {
        request
            .bearer
            .as_ref()
            .and_then(|token| self.access_tokens.get(token))
            .filter(|grant| grant.expires_at > Utc::now())
            .map(|grant| grant.user_id.clone())
            .ok_or_else(|| message(401, "Unauthorized"))
    }

    fn issue_access_token(&mut self, user_id: &str, ttl: chrono::Duration) -> String {
        let expires_at = Utc::now() + ttl;
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = json!({
            "sub": user_id,
            "exp": expires_at.timestamp(),
            "jti": uuid::Uuid::new_v4().to_string(),
        });
        let token = format!(
            "{}.{}.sim",
            header,
            URL_SAFE_NO_PAD.encode(payload.to_string())
        );
        self.access_tokens.insert(
            token.clone(),
            Grant {
                user_id: user_id.to_string(),
                expires_at,
            },
        );
        token
    }

    fn create_user(&mut self, body: Option<&Value>) -> RawResponse {
        let Some(new_user) = body
            .cloned()
            .and_then(|body| serde_json::from_value::<NewUser>(body).ok())
            .filter(|u| !u.name.trim().is_empty() && !u.email.trim().is_empty())
        else {
            return message(422, "Name and email are required");
        };
        if self
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return message(409, "Email already in use");
        }
        let user = self.add_user(&new_user.name, &new_user.email, new_user.role);
        respond(201, &user)
    }

    fn user_by_id(&mut self, method: Method, id: &str, body: Option<&Value>) -> RawResponse {
        let Some(index) = self.users.iter().position(|u| u.id == id) else {
            return message(404, "User not found");
        };
        match method {
            Method::Get => respond(200, &self.users[index]),
            Method::Delete => {
                self.users.remove(index);
                RawResponse::new(204, "")
            }
            Method::Put | Method::Patch => {
                let Some(fields) = body.and_then(Value::as_object) else {
                    return message(422, "Expected a JSON object");
                };
                let user = &mut self.users[index];
                if let Some(name) = fields.get("name").and_then(Value::as_str) {
                    user.name = name.to_string();
                }
                if let Some(email) = fields.get("email").and_then(Value::as_str) {
                    user.email = email.to_string();
                }
                if let Some(role) = fields.get("role") {
                    user.role = role.as_str().map(str::to_string);
                }
                respond(200, &*user)
            }
            Method::Post => message(405, "Method not allowed"),
        }
    }
}

fn logout(state: &mut State, request: &ApiRequest) -> RawResponse {
    if let Some(token) = &request.bearer {
        state.access_tokens.remove(token);
    }
    if let Some(cookie) = state.cookie.take() {
        state.refresh_tokens.remove(&cookie);
    }
    respond(200, &json!({ "ok": true }))
}

fn respond<T: Serialize + ?Sized>(status: u16, body: &T) -> RawResponse {
    RawResponse::new(status, serde_json::to_string(body).unwrap_or_default())
}

fn message(status: u16, text: &str) -> RawResponse {
    RawResponse::json_body(status, &json!({ "message": text }))
}

#[async_trait]
impl Transport for SimulatedBackend {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut state = self
            .state
            .lock()
            .map_err(|_| ApiError::Connection("simulated backend state poisoned".to_string()))?;
        state
            .requests
            .push(format!("{} {}", request.method.as_str(), request.path));

        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Connection("simulated backend is offline".to_string()));
        }

        let response = self.route(&mut state, &request);
        log::debug!(
            "[sim] {} {} -> {}",
            request.method.as_str(),
            request.path,
            response.status
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_then_me() {
        let backend = SimulatedBackend::new();
        let response = backend
            .send(
                ApiRequest::new(Method::Post, "/v1/auth/login")
                    .body(json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD })),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        let login: LoginResponse = response.json().unwrap();
        let token = login.access_token.unwrap();

        let me = backend
            .send(ApiRequest::new(Method::Get, "/v1/me").bearer(Some(token)))
            .await
            .unwrap();
        let user: User = me.json().unwrap();
        assert_eq!(user.email, DEMO_EMAIL);
    }

    #[test]
    fn users_are_paged() {
        let backend = SimulatedBackend::new().with_page_size(5);
        let mut state = backend.state.lock().unwrap();
        let token = state.issue_access_token("1", chrono::Duration::minutes(1));
        let response = backend.route(
            &mut state,
            &ApiRequest::new(Method::Get, "/v1/users?page=3").bearer(Some(token)),
        );
        let page: UsersPage = response.json().unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.total, 12);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id, "11");
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let backend = SimulatedBackend::new();
        let token = backend
            .state
            .lock()
            .unwrap()
            .issue_access_token("1", chrono::Duration::minutes(1));

        let response = backend
            .send(ApiRequest::new(Method::Get, "/v1/users?page=4294967295").bearer(Some(token.clone())))
            .await
            .unwrap();
        let page: UsersPage = response.json().unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 12);

        let me = backend
            .send(ApiRequest::new(Method::Get, "/v1/me").bearer(Some(token)))
            .await
            .unwrap();
        assert_eq!(me.status, 200);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let backend = SimulatedBackend::new();
        let response = backend
            .send(ApiRequest::new(Method::Get, "/v2/nothing"))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
    }
}
