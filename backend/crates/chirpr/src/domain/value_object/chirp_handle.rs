//! ChirpHandle Value Object
//!
//! A user's public handle, kept percent-encoded exactly as it is stored in the
//! profile's `chirpHandle` field and as it appears in `/user/{handle}` paths.

use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::email::Email;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ChirpHandle(String);

impl ChirpHandle {
    /// Encode a raw handle; `None` when it is blank.
    pub fn encode(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(percent_encode(trimmed)))
    }

    /// Wrap an already encoded handle read from a profile record
    pub fn from_stored(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Handle suggested when the caller does not supply one: the email's local
    /// part, or a random serial when the account has no email.
    pub fn suggest(email: Option<&Email>) -> Self {
        let raw = email
            .map(|e| e.local_part().to_string())
            .filter(|local| !local.is_empty())
            .unwrap_or_else(generate_serial);
        Self(percent_encode(&raw))
    }

    /// Encoded form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form
    pub fn decoded(&self) -> String {
        // '+' '&' '=' are literal in percent-encoded text but special to the
        // form decoder
        let escaped = self
            .0
            .replace('+', "%2B")
            .replace('&', "%26")
            .replace('=', "%3D");
        form_urlencoded::parse(escaped.as_bytes())
            .next()
            .map(|(key, _)| key.into_owned())
            .unwrap_or_default()
    }
}

/// Percent-encode like `encodeURIComponent`: spaces become `%20` and
/// `! ' ( ) ~` stay literal, so handles match those written by web clients.
fn percent_encode(raw: &str) -> String {
    const LITERAL: [(&str, &str); 6] = [
        ("+", "%20"),
        ("%21", "!"),
        ("%27", "'"),
        ("%28", "("),
        ("%29", ")"),
        ("%7E", "~"),
    ];
    LITERAL.iter().fold(
        form_urlencoded::byte_serialize(raw.as_bytes()).collect::<String>(),
        |encoded, &(from, to)| encoded.replace(from, to),
    )
}

/// Random `xxxx-xxxx-xxx-xxxx` hex serial
pub fn generate_serial() -> String {
    let mut rng = rand::rng();
    "xxxx-xxxx-xxx-xxxx"
        .chars()
        .map(|c| match c {
            'x' => char::from_digit(rng.random_range(0..16), 16).unwrap_or('0'),
            other => other,
        })
        .collect()
}
