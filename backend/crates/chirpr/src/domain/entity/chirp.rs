//! Chirp Entity
//!
//! A short text post with optional image references, stored at
//! `chirps/{id}`. Immutable once written.

use chrono::{DateTime, Utc};

use crate::domain::document::{DocumentConverter, FieldReader, FieldValue, Fields};
use crate::domain::service::StoreError;
use crate::domain::value_object::{chirp_id::ChirpId, uid::Uid};

/// Stored field names
pub mod fields {
    pub const IMAGES: &str = "imgcontent";
    pub const TEXT: &str = "textcontent";
    pub const TIMESTAMP: &str = "timestamp";
    pub const USER: &str = "user";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chirp {
    pub id: ChirpId,
    pub author: Uid,
    pub text: String,
    pub images: Vec<String>,
    /// `None` until the store has assigned it
    pub timestamp: Option<DateTime<Utc>>,
}

impl Chirp {
    /// New chirp under a freshly generated id; the store assigns the timestamp
    pub fn compose(author: Uid, text: String, images: Vec<String>) -> Self {
        Self {
            id: ChirpId::generate(),
            author,
            text,
            images,
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChirpConverter;

impl DocumentConverter for ChirpConverter {
    type Model = Chirp;

    fn to_fields(&self, chirp: &Chirp) -> Fields {
        let timestamp = match chirp.timestamp {
            Some(at) => FieldValue::Timestamp(at),
            None => FieldValue::ServerTimestamp,
        };
        Fields::from([
            (fields::IMAGES.to_string(), chirp.images.clone().into()),
            (fields::TEXT.to_string(), chirp.text.as_str().into()),
            (fields::TIMESTAMP.to_string(), timestamp),
            (fields::USER.to_string(), chirp.author.as_str().into()),
        ])
    }

    fn from_fields(&self, id: &str, doc: &Fields) -> Result<Chirp, StoreError> {
        let reader = FieldReader::new(doc);
        Ok(Chirp {
            id: ChirpId::from_stored(id),
            author: Uid::new(reader.string(fields::USER)?),
            text: reader.optional_string(fields::TEXT)?.unwrap_or_default(),
            images: reader.string_array(fields::IMAGES)?,
            timestamp: reader.optional_timestamp(fields::TIMESTAMP)?,
        })
    }
}
