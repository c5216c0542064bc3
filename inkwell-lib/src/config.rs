//! Runtime configuration read from the environment.

use std::time::Duration;

use url::Url;

use crate::error::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];
pub const DEFAULT_LOADING_ROWS: usize = 5;

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
    Test,
}

impl AppEnv {
    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
            AppEnv::Test => "test",
        }
    }
}

impl std::str::FromStr for AppEnv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            "test" => Ok(AppEnv::Test),
            other => Err(Error::Config(format!("unknown environment '{}'", other))),
        }
    }
}

/// Which transport answers API requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// The in-process simulated API.
    #[default]
    Simulated,
    /// A real server at `api_base_url`.
    Http,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub app_env: AppEnv,
    pub debug: bool,
    pub backend: Backend,
    pub page_size: usize,
    pub rows_per_page_options: Vec<usize>,
    pub loading_rows: usize,
    pub simulate_delay: Duration,
    /// Per-request timeout of the HTTP backend.
    pub request_timeout: Duration,
    /// Refresh access tokens past their stored expiry, not only missing ones.
    pub check_token_expiry: bool,
    /// Drop saved UI preferences at startup.
    pub reset_preferences: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            app_env: AppEnv::default(),
            debug: false,
            backend: Backend::default(),
            page_size: DEFAULT_PAGE_SIZE,
            rows_per_page_options: DEFAULT_ROWS_PER_PAGE_OPTIONS.to_vec(),
            loading_rows: DEFAULT_LOADING_ROWS,
            simulate_delay: Duration::from_millis(400),
            request_timeout: Duration::from_secs(10),
            check_token_expiry: false,
            reset_preferences: false,
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `INKWELL_API_URL` | `http://localhost:3000` |
    /// | `INKWELL_ENV` | `development` |
    /// | `INKWELL_DEBUG` | `false` (only `true` enables it) |
    /// | `INKWELL_BACKEND` | `simulated` (or `http`) |
    /// | `INKWELL_PAGE_SIZE` | `5` |
    /// | `INKWELL_ROWS_PER_PAGE_OPTIONS` | `5,10,25` |
    /// | `INKWELL_LOADING_ROWS` | `5` |
    /// | `INKWELL_SIMULATE_DELAY_MS` | `400` |
    /// | `INKWELL_REQUEST_TIMEOUT_MS` | `10000` |
    /// | `INKWELL_CHECK_TOKEN_EXPIRY` | `false` |
    /// | `INKWELL_RESET_PREFERENCES` | `false` |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = match get("INKWELL_API_URL") {
            Some(url) => {
                Url::parse(url.trim())
                    .map_err(|e| Error::Config(format!("INKWELL_API_URL '{}': {}", url, e)))?;
                url.trim().trim_end_matches('/').to_string()
            }
            None => defaults.api_base_url,
        };

        let app_env = match get("INKWELL_ENV") {
            Some(env) => env.parse()?,
            None => defaults.app_env,
        };

        let backend = match get("INKWELL_BACKEND").as_deref().map(str::trim) {
            None | Some("simulated") => Backend::Simulated,
            Some("http") => Backend::Http,
            Some(other) => {
                return Err(Error::Config(format!("unknown backend '{}'", other)));
            }
        };

        let rows_per_page_options = match get("INKWELL_ROWS_PER_PAGE_OPTIONS") {
            Some(list) => list
                .split(',')
                .map(|n| parse_count("INKWELL_ROWS_PER_PAGE_OPTIONS", n))
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.rows_per_page_options,
        };

        let page_size = match get("INKWELL_PAGE_SIZE") {
            Some(n) => parse_count("INKWELL_PAGE_SIZE", &n)?,
            None => defaults.page_size,
        };

        let loading_rows = match get("INKWELL_LOADING_ROWS") {
            Some(n) => parse_count("INKWELL_LOADING_ROWS", &n)?,
            None => defaults.loading_rows,
        };

        let simulate_delay = match get("INKWELL_SIMULATE_DELAY_MS") {
            Some(ms) => parse_millis("INKWELL_SIMULATE_DELAY_MS", &ms)?,
            None => defaults.simulate_delay,
        };

        let request_timeout = match get("INKWELL_REQUEST_TIMEOUT_MS") {
            Some(ms) => parse_millis("INKWELL_REQUEST_TIMEOUT_MS", &ms)?,
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_base_url,
            app_env,
            debug: get("INKWELL_DEBUG").as_deref() == Some("true"),
            backend,
            page_size,
            rows_per_page_options,
            loading_rows,
            simulate_delay,
            request_timeout,
            check_token_expiry: get("INKWELL_CHECK_TOKEN_EXPIRY").as_deref() == Some("true"),
            reset_preferences: get("INKWELL_RESET_PREFERENCES").as_deref() == Some("true"),
        })
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, Error> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config(format!("{} '{}' must be a positive number", key, value))),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration, Error> {
    value
        .trim()
        .parse()
        .map(Duration::from_millis)
        .map_err(|_| Error::Config(format!("{} '{}' is not a number", key, value)))
}
