//! Session context: the current tokens, mirrored in memory and persisted.
//!
//! A [`Session`] is created explicitly with [`Session::open`], which loads any
//! persisted tokens, and is shared by reference (`Arc<Session>`) with the API
//! client and auth flows. Reads are synchronous against the in-memory mirror;
//! writes update the mirror first and then the store.

mod token;

pub use token::AccessToken;
pub use token::JwtPayload;
pub use token::parse_jwt;

use std::sync::RwLock;

use crate::error::StorageError;
use crate::storage::Storage;

/// Storage key of the access token.
pub const ACCESS_KEY: &str = "access_token";
/// Storage key of the refresh token.
pub const REFRESH_KEY: &str = "refresh_token";
/// Storage key of the access token expiry, in seconds since the epoch.
pub const EXP_KEY: &str = "token_exp";

#[derive(Debug, Default)]
struct Mirror {
    access: Option<AccessToken>,
    refresh: Option<String>,
}

/// The current user's tokens.
#[derive(Debug)]
pub struct Session {
    storage: Storage,
    mirror: RwLock<Mirror>,
    check_expiry: bool,
    /// Held while a refresh is in flight.
    pub(crate) refresh_gate: tokio::sync::Mutex<()>,
}

impl Session {
    /// Open a session over `storage`, loading persisted tokens.
    pub async fn open(storage: Storage) -> Result<Self, StorageError> {
        let session = Self {
            storage,
            mirror: RwLock::new(Mirror::default()),
            check_expiry: false,
            refresh_gate: tokio::sync::Mutex::new(()),
        };
        session.reload().await?;
        Ok(session)
    }

    /// Treat an access token past its stored expiry as needing a refresh.
    ///
    /// Off by default: a present token counts as usable whatever its expiry.
    pub fn with_expiry_check(mut self, check_expiry: bool) -> Self {
        self.check_expiry = check_expiry;
        self
    }

    /// Re-read the tokens from storage into the mirror.
    pub async fn reload(&self) -> Result<(), StorageError> {
        let access: Option<String> = self.storage.get(ACCESS_KEY).await?;
        let exp: Option<i64> = self.storage.get(EXP_KEY).await?;
        let refresh: Option<String> = self.storage.get(REFRESH_KEY).await?;

        log::debug!(
            "[session] loaded access={} refresh={} exp={:?}",
            access.is_some(),
            refresh.is_some(),
            exp
        );

        if let Ok(mut mirror) = self.mirror.write() {
            mirror.access = access.map(|token| AccessToken::from_exp(token, exp));
            mirror.refresh = refresh;
        }
        Ok(())
    }

    /// Drop the in-memory mirror. Persisted tokens are kept; a later
    /// [`reload`](Self::reload) brings them back.
    pub fn close(&self) {
        if let Ok(mut mirror) = self.mirror.write() {
            *mirror = Mirror::default();
        }
        log::debug!("[session] closed");
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.token().map(|token| token.access_token)
    }

    /// The current access token with its expiry.
    pub fn token(&self) -> Option<AccessToken> {
        self.mirror.read().ok().and_then(|m| m.access.clone())
    }

    /// Stored expiry of the access token, in seconds since the epoch.
    pub fn token_exp(&self) -> Option<i64> {
        self.token().and_then(|token| token.exp())
    }

    /// Set or clear the access token.
    ///
    /// Setting a token without `exp` removes any stored expiry, so a stale
    /// expiry never outlives the token it belonged to. Clearing the token
    /// clears the expiry too.
    pub async fn set_access_token(&self, token: Option<&str>, exp: Option<i64>) -> Result<(), StorageError> {
        if let Ok(mut mirror) = self.mirror.write() {
            mirror.access = token.map(|token| AccessToken::from_exp(token, exp));
        }

        match token {
            Some(token) => {
                self.storage.set(ACCESS_KEY, &token.to_string()).await?;
                match exp {
                    Some(exp) => self.storage.set(EXP_KEY, &exp).await?,
                    None => self.storage.delete(EXP_KEY).await?,
                }
            }
            None => {
                self.storage.delete(ACCESS_KEY).await?;
                self.storage.delete(EXP_KEY).await?;
            }
        }
        Ok(())
    }

    /// The current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.mirror.read().ok().and_then(|m| m.refresh.clone())
    }

    /// Set or clear the refresh token.
    pub async fn set_refresh_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        if let Ok(mut mirror) = self.mirror.write() {
            mirror.refresh = token.map(str::to_string);
        }

        match token {
            Some(token) => self.storage.set(REFRESH_KEY, &token.to_string()).await,
            None => self.storage.delete(REFRESH_KEY).await,
        }
    }

    /// Forget both tokens.
    pub async fn clear(&self) -> Result<(), StorageError> {
        log::debug!("[session] clearing tokens");
        self.set_access_token(None, None).await?;
        self.set_refresh_token(None).await
    }

    /// `true` when an access token is present. Expiry is not consulted.
    pub fn is_access_token_valid(&self) -> bool {
        self.access_token().is_some()
    }

    /// `true` when an access token is present and not past its stored
    /// expiry. A token without an expiry counts as fresh.
    pub fn is_access_token_fresh(&self) -> bool {
        self.token().is_some_and(|token| !token.is_expired())
    }

    /// Whether the next request should try a refresh first.
    pub fn needs_refresh(&self) -> bool {
        if self.check_expiry {
            !self.is_access_token_fresh()
        } else {
            !self.is_access_token_valid()
        }
    }
}
