//! AccessToken and JWT payload decoding

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

/// A bearer token with an optional expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a token from an expiry in seconds since the epoch.
    ///
    /// An out-of-range timestamp is treated as unknown.
    pub fn from_exp(access_token: impl Into<String>, exp: Option<i64>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single()),
        }
    }

    /// Expiry in seconds since the epoch.
    pub fn exp(&self) -> Option<i64> {
        self.expires_at.map(|at| at.timestamp())
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }
}

/// Claims decoded from the middle segment of a JWT.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JwtPayload {
    /// Expiry in seconds since the epoch.
    pub exp: Option<i64>,
    /// Every other claim.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// Decode the payload of a JWT without verifying it.
///
/// Returns `None` when the token has no second segment, the segment is not
/// base64url, or the decoded bytes are not a JSON object.
pub fn parse_jwt(token: &str) -> Option<JwtPayload> {
    let segment = token.split('.').nth(1)?;
    let segment = segment.trim_end_matches('=');
    if segment.is_empty() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}
