//! Clear-text password handling
//!
//! Passwords are never hashed or stored here: they are handed to the
//! external identity service, which owns the hashing policy. This module only
//! keeps the clear text out of logs and wipes it from memory on drop.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Password rejected before it reaches the identity service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    Missing,
}

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// The text is passed through untouched (no trimming, no normalization): the
/// identity service compares exactly what other clients of the same account
/// send.
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("hunter22".to_string()).unwrap();
/// assert_eq!(password.char_count(), 8);
/// assert!(!format!("{password:?}").contains("hunter22"));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap a password typed by the user
    ///
    /// ## Arguments
    /// * `raw` - Password exactly as entered
    ///
    /// ## Errors
    /// `PasswordPolicyError::Missing` when `raw` is empty
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Missing);
        }
        Ok(Self(raw))
    }

    /// Clear text, for the request body sent to the identity service
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in Unicode code points
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Compare with another password in constant time
    ///
    /// Used by in-process credential checks; the byte length is not hidden.
    ///
    /// ## Returns
    /// `true` when both passwords are byte-for-byte identical
    pub fn matches(&self, other: &ClearTextPassword) -> bool {
        let a = self.0.as_bytes();
        let b = other.0.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new(String::new());
        assert_eq!(result.err(), Some(PasswordPolicyError::Missing));
    }

    #[test]
    fn test_password_is_not_trimmed() {
        let password = ClearTextPassword::new("  spaced  ".to_string()).unwrap();
        assert_eq!(password.expose(), "  spaced  ");
    }

    #[test]
    fn test_unicode_char_count() {
        let password = ClearTextPassword::new("パスワード".to_string()).unwrap();
        assert_eq!(password.char_count(), 5);
    }

    #[test]
    fn test_matches() {
        let a = ClearTextPassword::new("correct horse".to_string()).unwrap();
        let b = ClearTextPassword::new("correct horse".to_string()).unwrap();
        let c = ClearTextPassword::new("correct horsf".to_string()).unwrap();
        let d = ClearTextPassword::new("short".to_string()).unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
        assert!(!a.matches(&d));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("secret".to_string()).unwrap();
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
