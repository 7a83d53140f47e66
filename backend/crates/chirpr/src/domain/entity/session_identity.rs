//! Session Identity Entity
//!
//! The identity service's record of the signed-in user. Read-only from this
//! crate's point of view: the service owns it, the provider caches it.

use crate::domain::value_object::{email::Email, uid::Uid};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub uid: Uid,
    pub email: Option<Email>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl SessionIdentity {
    pub fn new(uid: Uid) -> Self {
        Self {
            uid,
            email: None,
            display_name: None,
            photo_url: None,
        }
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}
