//! Profile Entity
//!
//! Per-user record stored at `users/{uid}`. Created once at registration and
//! afterwards changed one field at a time by its owner.

use chrono::{DateTime, Utc};

use crate::domain::document::{DocumentConverter, FieldReader, FieldValue, Fields};
use crate::domain::service::StoreError;
use crate::domain::value_object::{chirp_handle::ChirpHandle, uid::Uid};

/// Stored field names
pub mod fields {
    pub const AMOUNT_OF_CHIRPS: &str = "amountOfChirps";
    pub const CHIRP_HANDLE: &str = "chirpHandle";
    pub const CHIRPS: &str = "chirps";
    pub const PIC: &str = "pic";
    pub const USERNAME: &str = "username";
    pub const CREATED_AT: &str = "createdAt";
    pub const BLURB: &str = "blurb";
}

/// Profile entity
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Owner; also the document id
    pub uid: Uid,
    /// Percent-encoded handle (`chirpHandle`)
    pub handle: ChirpHandle,
    /// Display name
    pub username: String,
    /// Avatar URL
    pub pic: String,
    pub blurb: String,
    pub amount_of_chirps: i64,
    pub chirps: Vec<String>,
    /// Absent on records written by clients that never set it
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Fresh profile as written at registration
    pub fn registered(uid: Uid, handle: ChirpHandle, pic: String, now: DateTime<Utc>) -> Self {
        let username = handle.decoded();
        Self {
            uid,
            handle,
            username,
            pic,
            blurb: String::new(),
            amount_of_chirps: 0,
            chirps: Vec::new(),
            created_at: Some(now),
        }
    }
}

/// The three fields a user can edit after registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Blurb,
    Username,
    Picture,
}

impl ProfileField {
    /// Stored field name
    pub fn field_name(self) -> &'static str {
        match self {
            ProfileField::Blurb => fields::BLURB,
            ProfileField::Username => fields::USERNAME,
            ProfileField::Picture => fields::PIC,
        }
    }

    /// Single-field patch for the store
    pub fn patch(self, value: &str) -> Fields {
        Fields::from([(self.field_name().to_string(), FieldValue::from(value))])
    }

    /// Mirror a successful store update on a cached profile
    pub fn apply(self, profile: &mut Profile, value: &str) {
        let slot = match self {
            ProfileField::Blurb => &mut profile.blurb,
            ProfileField::Username => &mut profile.username,
            ProfileField::Picture => &mut profile.pic,
        };
        *slot = value.to_string();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileConverter;

impl DocumentConverter for ProfileConverter {
    type Model = Profile;

    fn to_fields(&self, profile: &Profile) -> Fields {
        let mut doc = Fields::new();
        doc.insert(fields::AMOUNT_OF_CHIRPS.into(), profile.amount_of_chirps.into());
        doc.insert(fields::CHIRP_HANDLE.into(), profile.handle.as_str().into());
        doc.insert(fields::CHIRPS.into(), profile.chirps.clone().into());
        doc.insert(fields::PIC.into(), profile.pic.as_str().into());
        doc.insert(fields::USERNAME.into(), profile.username.as_str().into());
        doc.insert(fields::BLURB.into(), profile.blurb.as_str().into());
        if let Some(created_at) = profile.created_at {
            doc.insert(fields::CREATED_AT.into(), created_at.into());
        }
        doc
    }

    fn from_fields(&self, id: &str, doc: &Fields) -> Result<Profile, StoreError> {
        let reader = FieldReader::new(doc);
        let handle = ChirpHandle::from_stored(reader.string(fields::CHIRP_HANDLE)?);
        let username = match reader.optional_string(fields::USERNAME)? {
            Some(username) => username,
            None => handle.decoded(),
        };

        Ok(Profile {
            uid: Uid::new(id),
            handle,
            username,
            pic: reader.optional_string(fields::PIC)?.unwrap_or_default(),
            blurb: reader.optional_string(fields::BLURB)?.unwrap_or_default(),
            amount_of_chirps: reader.integer_or(fields::AMOUNT_OF_CHIRPS, 0)?,
            chirps: reader.string_array(fields::CHIRPS)?,
            created_at: reader.optional_timestamp(fields::CREATED_AT)?,
        })
    }
}
