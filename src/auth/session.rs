//! Session store - owns the token and the authenticated identity.
//!
//! Created once in `main` and handed to the network actor; views only ever
//! see cloned `Identity` snapshots in the render state. All mutation goes
//! through the operations here.
//!
//! Identity lifecycle: `unauthenticated -> (login|register ok) ->
//! authenticated -> (logout | profile refresh failure) -> unauthenticated`.
//! `bootstrap` can jump straight to a provisional `authenticated`.

use chrono::Utc;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::auth::claims::{self, Claims};
use crate::auth::store::TokenStore;
use crate::models::AuthResponse;

/// In-memory projection of the token claims, augmented by `/auth/profile`
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub user_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub channel_id: Option<String>,
    pub subscribed_channels: Vec<String>,
}

impl Identity {
    fn from_claims(claims: Claims) -> Self {
        Identity {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
            avatar: None,
            channel_id: claims.channel_id,
            subscribed_channels: Vec::new(),
        }
    }

    /// Does this user own a channel?
    pub fn owns_channel(&self) -> bool {
        self.channel_id.is_some()
    }

    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("signed in")
    }
}

/// Error from a login/register attempt
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("received a malformed session token")]
    BadToken,
}

impl SessionError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SessionError::Api(err) => err.user_message(fallback),
            SessionError::BadToken => fallback.to_string(),
        }
    }
}

/// Holds the current session. One per process.
pub struct SessionStore {
    tokens: TokenStore,
    token: Option<String>,
    identity: Option<Identity>,
}

impl SessionStore {
    pub fn new(tokens: TokenStore) -> Self {
        SessionStore {
            tokens,
            token: None,
            identity: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Restore a session from the persisted token. No network I/O: decodes
    /// the claims locally and purges the token if it is malformed or its
    /// expiry has passed. Returns the provisional identity, if any; the
    /// caller is expected to follow up with `refresh_profile`.
    pub fn bootstrap(&mut self) -> Option<&Identity> {
        let token = self.tokens.load()?;
        match claims::decode_unverified(&token) {
            Ok(claims) if !claims.is_expired(Utc::now()) => {
                self.identity = Some(Identity::from_claims(claims));
                self.token = Some(token);
            }
            Ok(_) => {
                tracing::info!("persisted token has expired, purging");
                self.tokens.clear();
            }
            Err(err) => {
                tracing::warn!(error = %err, "invalid persisted token, purging");
                self.tokens.clear();
            }
        }
        self.identity.as_ref()
    }

    pub async fn login(
        &mut self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let resp = api.login(email, password).await?;
        self.establish(api, resp).await
    }

    pub async fn register(
        &mut self,
        api: &ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let resp = api.signup(username, email, password).await?;
        self.establish(api, resp).await
    }

    /// Persist the returned token, project an identity from its claims plus
    /// the auth response extras, then pull the full profile.
    async fn establish(&mut self, api: &ApiClient, resp: AuthResponse) -> Result<(), SessionError> {
        let claims = claims::decode_unverified(&resp.token).map_err(|_| SessionError::BadToken)?;
        if let Err(err) = self.tokens.save(&resp.token) {
            tracing::warn!(error = %err, "could not persist session token");
        }
        let mut identity = Identity::from_claims(claims);
        if resp.channel_id.is_some() {
            identity.channel_id = resp.channel_id;
        }
        identity.subscribed_channels = resp.subscribed_channels.unwrap_or_default();
        self.token = Some(resp.token);
        self.identity = Some(identity);

        // Fail-closed refresh: if the profile fetch rejects the new token
        // this logs the session back out.
        self.refresh_profile(api).await;
        Ok(())
    }

    /// Replace the identity with the merged profile. Any failure is treated
    /// as an invalid session and logs out - a revoked token must not leave a
    /// stale authenticated UI behind.
    pub async fn refresh_profile(&mut self, api: &ApiClient) -> Option<&Identity> {
        let token = self.token.clone()?;
        match api.profile(&token).await {
            Ok(profile) => {
                let prev = self.identity.take();
                self.identity = Some(Identity {
                    user_id: profile.id,
                    username: profile
                        .username
                        .or_else(|| prev.as_ref().and_then(|p| p.username.clone())),
                    email: profile
                        .email
                        .or_else(|| prev.as_ref().and_then(|p| p.email.clone())),
                    avatar: profile.avatar,
                    channel_id: profile
                        .channel_id
                        .or_else(|| prev.as_ref().and_then(|p| p.channel_id.clone())),
                    subscribed_channels: profile.subscribed_channels.unwrap_or_default(),
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile refresh failed, ending session");
                self.logout();
            }
        }
        self.identity.as_ref()
    }

    /// Drop the session everywhere: disk, memory, and (via `token()`)
    /// outbound headers. Idempotent.
    pub fn logout(&mut self) {
        self.tokens.clear();
        self.token = None;
        self.identity = None;
    }
}
