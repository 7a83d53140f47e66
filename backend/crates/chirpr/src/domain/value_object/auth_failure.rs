//! AuthFailure Value Object
//!
//! Structured rejection from the identity service. The code follows the
//! `service/reason` convention of the managed identity SDK
//! (`auth/wrong-password`, `auth/email-already-in-use`, ...); callers mostly
//! care about the short reason token after the slash.

use kernel::error::kind::ErrorKind;
use thiserror::Error;

/// Identity service codes this crate produces or recognises
pub mod codes {
    pub const EMAIL_ALREADY_IN_USE: &str = "auth/email-already-in-use";
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    pub const MISSING_PASSWORD: &str = "auth/missing-password";
    pub const WEAK_PASSWORD: &str = "auth/weak-password";
    pub const WRONG_PASSWORD: &str = "auth/wrong-password";
    pub const USER_NOT_FOUND: &str = "auth/user-not-found";
    pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
    pub const USER_DISABLED: &str = "auth/user-disabled";
    pub const TOO_MANY_REQUESTS: &str = "auth/too-many-requests";
    pub const OPERATION_NOT_ALLOWED: &str = "auth/operation-not-allowed";
    pub const NETWORK_REQUEST_FAILED: &str = "auth/network-request-failed";
    pub const INTERNAL_ERROR: &str = "auth/internal-error";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}")]
pub struct AuthFailure {
    code: String,
    detail: Option<String>,
}

impl AuthFailure {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: None,
        }
    }

    /// Transport-level failure talking to the identity service
    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(codes::NETWORK_REQUEST_FAILED).with_detail(detail)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Full code, e.g. `auth/wrong-password`
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Short reason token: the second `/`-separated segment of the code.
    ///
    /// `auth/wrong-password` gives `wrong-password`. A code without a slash is
    /// returned whole.
    pub fn reason(&self) -> &str {
        self.code.split('/').nth(1).unwrap_or(&self.code)
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code.as_str() {
            codes::EMAIL_ALREADY_IN_USE => ErrorKind::Conflict,
            codes::WRONG_PASSWORD | codes::USER_NOT_FOUND | codes::INVALID_CREDENTIAL => {
                ErrorKind::Unauthorized
            }
            codes::USER_DISABLED | codes::OPERATION_NOT_ALLOWED => ErrorKind::Forbidden,
            codes::TOO_MANY_REQUESTS => ErrorKind::TooManyRequests,
            codes::NETWORK_REQUEST_FAILED => ErrorKind::ServiceUnavailable,
            codes::INTERNAL_ERROR => ErrorKind::BadGateway,
            _ => ErrorKind::BadRequest,
        }
    }
}
