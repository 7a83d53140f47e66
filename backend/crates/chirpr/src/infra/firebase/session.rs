//! Firebase Session
//!
//! Tokens of the signed-in user, shared by the identity and Firestore
//! adapters. The ID token lives for about an hour; it is exchanged for a
//! fresh one through the Secure Token API shortly before it expires. A
//! refresh token the service no longer accepts ends the session and is
//! published as "signed out".

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use platform::http::body_preview;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::{Mutex, watch};

use super::FirebaseConfig;
use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::service::{AuthState, AuthStateStream, StoreError};

/// Lifetime assumed when the service omits `expiresIn`
const DEFAULT_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the ID token runs out
const REFRESH_MARGIN_SECS: i64 = 300;

/// ID and refresh token of one sign-in
#[derive(Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionTokens {
    /// Tokens issued at `now`; `expires_in` is the service's seconds string
    pub fn issued(
        id_token: String,
        refresh_token: String,
        expires_in: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let lifetime = expires_in
            .and_then(|secs| secs.trim().parse::<i64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_LIFETIME_SECS);
        Self {
            id_token,
            refresh_token,
            expires_at: now + Duration::seconds(lifetime),
        }
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Secure Token API response (snake_case, unlike Identity Toolkit)
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Why a refresh did not produce tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// The refresh token was rejected; the session is over
    Revoked(String),
    /// The service could not be reached or answered unexpectedly
    Unavailable(String),
}

/// Interpret a Secure Token API answer
pub fn refresh_outcome(
    status: StatusCode,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<SessionTokens, RefreshFailure> {
    if status.is_success() {
        let response: RefreshResponse = serde_json::from_slice(body).map_err(|e| {
            RefreshFailure::Unavailable(format!("unexpected response: {e}: {}", body_preview(body)))
        })?;
        return Ok(SessionTokens::issued(
            response.id_token,
            response.refresh_token,
            response.expires_in.as_deref(),
            now,
        ));
    }

    match serde_json::from_slice::<ErrorEnvelope>(body) {
        // TOKEN_EXPIRED, USER_DISABLED, USER_NOT_FOUND, INVALID_REFRESH_TOKEN, ...
        Ok(envelope) if status.is_client_error() => Err(RefreshFailure::Revoked(envelope.error.message)),
        Ok(envelope) => Err(RefreshFailure::Unavailable(envelope.error.message)),
        Err(_) => Err(RefreshFailure::Unavailable(format!(
            "HTTP {status}: {}",
            body_preview(body)
        ))),
    }
}

#[derive(Debug)]
struct SessionInner {
    tokens: Mutex<Option<SessionTokens>>,
    auth: watch::Sender<AuthState>,
}

/// Session shared between the Firebase adapters
#[derive(Debug, Clone)]
pub struct FirebaseSession(Arc<SessionInner>);

impl Default for FirebaseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FirebaseSession {
    /// Signed out; a server process has no persisted session to restore
    pub fn new() -> Self {
        let (auth, _) = watch::channel(AuthState::SignedOut);
        Self(Arc::new(SessionInner {
            tokens: Mutex::new(None),
            auth,
        }))
    }

    pub fn subscribe(&self) -> AuthStateStream {
        self.0.auth.subscribe()
    }

    pub async fn signed_in(&self, identity: SessionIdentity, tokens: SessionTokens) {
        let mut current = self.0.tokens.lock().await;
        *current = Some(tokens);
        self.0.auth.send_replace(AuthState::SignedIn(identity));
    }

    pub async fn sign_out(&self) {
        let mut current = self.0.tokens.lock().await;
        *current = None;
        self.0.auth.send_replace(AuthState::SignedOut);
    }

    /// ID token to authorize a request with, refreshed when close to expiry.
    ///
    /// `Ok(None)` while signed out.
    pub async fn bearer(
        &self,
        client: &reqwest::Client,
        config: &FirebaseConfig,
    ) -> Result<Option<String>, StoreError> {
        let mut current = self.0.tokens.lock().await;
        let Some(tokens) = current.as_ref() else {
            return Ok(None);
        };
        if !tokens.needs_refresh(Utc::now()) {
            return Ok(Some(tokens.id_token.clone()));
        }

        let refreshed = refresh(client, config, &tokens.refresh_token).await;
        match refreshed {
            Ok(fresh) => {
                tracing::debug!(expires_at = %fresh.expires_at, "ID token refreshed");
                let id_token = fresh.id_token.clone();
                *current = Some(fresh);
                Ok(Some(id_token))
            }
            Err(RefreshFailure::Revoked(message)) => {
                tracing::warn!(reason = %message, "Session expired; signing out");
                *current = None;
                self.0.auth.send_replace(AuthState::SignedOut);
                Err(StoreError::PermissionDenied(format!("session expired: {message}")))
            }
            Err(RefreshFailure::Unavailable(message)) => {
                tracing::warn!(error = %message, "ID token refresh failed");
                Err(StoreError::Unavailable(message))
            }
        }
    }
}

async fn refresh(
    client: &reqwest::Client,
    config: &FirebaseConfig,
    refresh_token: &str,
) -> Result<SessionTokens, RefreshFailure> {
    let response = client
        .post(config.token_url())
        .query(&[("key", config.api_key.as_str())])
        .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
        .send()
        .await
        .map_err(|e| RefreshFailure::Unavailable(e.to_string()))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| RefreshFailure::Unavailable(e.to_string()))?;
    refresh_outcome(status, &body, Utc::now())
}
