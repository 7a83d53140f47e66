//! Email Value Object
//!
//! Sign-in identifier for the identity service. Only the shape is checked
//! here; the identity service is the authority on whether an address is
//! acceptable, and rejections surface as `auth/invalid-email` either way.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::auth_failure::{AuthFailure, codes};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Trim, lowercase and shape-check an address
    pub fn parse(email: &str) -> Result<Self, AuthFailure> {
        let email = email.trim().to_lowercase();

        if email.is_empty() || email.len() > EMAIL_MAX_LENGTH || !Self::is_valid_format(&email) {
            return Err(AuthFailure::new(codes::INVALID_EMAIL));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with('.')
            || domain.ends_with('.')
            || domain.starts_with('-')
            || domain.ends_with('-'))
    }

    /// Wrap an address reported by the identity service itself
    pub fn from_trusted(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the `@`
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }
}

impl FromStr for Email {
    type Err = AuthFailure;

    fn from_str(s: &str) -> Result<Self, AuthFailure> {
        Email::parse(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name@example.co.jp").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid_is_invalid_email_code() {
        for raw in ["", "userexample.com", "user@", "@example.com", "user@@example.com", "user@example"] {
            let err = Email::parse(raw).unwrap_err();
            assert_eq!(err.code(), codes::INVALID_EMAIL, "input {raw:?}");
        }
    }

    #[test]
    fn test_email_normalization() {
        let email = Email::parse("  Chirper@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "chirper@example.com");
        assert_eq!(email.local_part(), "chirper");
    }
}
