//! Identity Toolkit REST adapter

use std::sync::Arc;

use chrono::Utc;
use platform::http::body_preview;
use platform::password::ClearTextPassword;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::FirebaseConfig;
use super::session::{FirebaseSession, SessionTokens};
use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::service::{AuthStateStream, IdentityService};
use crate::domain::value_object::{
    auth_failure::{AuthFailure, codes},
    email::Email,
    uid::Uid,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, alias = "photoUrl")]
    profile_picture: Option<String>,
}

impl AccountResponse {
    fn identity(&self) -> SessionIdentity {
        let mut identity = SessionIdentity::new(Uid::new(self.local_id.as_str()));
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            identity = identity.with_email(Email::from_trusted(email));
        }
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
            identity = identity.with_display_name(name);
        }
        if let Some(url) = self.profile_picture.as_deref().filter(|u| !u.is_empty()) {
            identity = identity.with_photo_url(url);
        }
        identity
    }

    fn tokens(self) -> SessionTokens {
        SessionTokens::issued(
            self.id_token,
            self.refresh_token,
            self.expires_in.as_deref(),
            Utc::now(),
        )
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map an Identity Toolkit error message to the SDK's `auth/...` code.
///
/// Messages may carry a suffix (`WEAK_PASSWORD : Password should be at least
/// 6 characters`); only the part before ` : ` is significant.
pub fn failure_from_message(message: &str) -> AuthFailure {
    let key = message.split(" : ").next().unwrap_or(message).trim();
    let code = match key {
        "EMAIL_EXISTS" => codes::EMAIL_ALREADY_IN_USE,
        "INVALID_PASSWORD" => codes::WRONG_PASSWORD,
        "EMAIL_NOT_FOUND" => codes::USER_NOT_FOUND,
        "USER_DISABLED" => codes::USER_DISABLED,
        "INVALID_EMAIL" => codes::INVALID_EMAIL,
        "WEAK_PASSWORD" => codes::WEAK_PASSWORD,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => codes::TOO_MANY_REQUESTS,
        "INVALID_LOGIN_CREDENTIALS" => codes::INVALID_CREDENTIAL,
        "MISSING_PASSWORD" => codes::MISSING_PASSWORD,
        "OPERATION_NOT_ALLOWED" => codes::OPERATION_NOT_ALLOWED,
        _ => codes::INTERNAL_ERROR,
    };
    AuthFailure::new(code).with_detail(message)
}

/// Interpret an `accounts:*` answer
fn account_outcome(status: StatusCode, body: &[u8]) -> Result<AccountResponse, AuthFailure> {
    if !status.is_success() {
        return Err(match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => failure_from_message(&envelope.error.message),
            Err(_) => AuthFailure::new(codes::INTERNAL_ERROR)
                .with_detail(format!("HTTP {status}: {}", body_preview(body))),
        });
    }

    serde_json::from_slice(body).map_err(|e| {
        AuthFailure::new(codes::INTERNAL_ERROR)
            .with_detail(format!("unexpected response: {e}: {}", body_preview(body)))
    })
}

/// Firebase Authentication over the Identity Toolkit REST API.
///
/// Sessions are process-local and kept in the shared [`FirebaseSession`];
/// signing out only forgets the tokens.
pub struct FirebaseIdentityService {
    client: reqwest::Client,
    config: Arc<FirebaseConfig>,
    session: FirebaseSession,
}

impl FirebaseIdentityService {
    pub fn new(
        client: reqwest::Client,
        config: Arc<FirebaseConfig>,
        session: FirebaseSession,
    ) -> Self {
        Self {
            client,
            config,
            session,
        }
    }

    async fn password_call(
        &self,
        method: &str,
        email: &Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure> {
        let request = PasswordRequest {
            email: email.as_str(),
            password: password.expose(),
            return_secure_token: true,
        };

        let response = self
            .client
            .post(self.config.accounts_url(method))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthFailure::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthFailure::network(e.to_string()))?;

        let account = account_outcome(status, &body).inspect_err(|failure| {
            tracing::debug!(method, status = status.as_u16(), code = failure.code(), "Identity Toolkit rejected request");
        })?;

        let identity = account.identity();
        self.session.signed_in(identity.clone(), account.tokens()).await;
        Ok(identity)
    }
}

impl IdentityService for FirebaseIdentityService {
    async fn create_account(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure> {
        self.password_call("signUp", email, password).await
    }

    async fn sign_in(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure> {
        self.password_call("signInWithPassword", email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.session.sign_out().await;
        Ok(())
    }

    fn subscribe(&self) -> AuthStateStream {
        self.session.subscribe()
    }
}
