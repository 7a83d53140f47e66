//! Current User Entity
//!
//! What the provider knows about the signed-in user: the identity plus the
//! profile record fetched for it.

use crate::domain::entity::{profile::Profile, session_identity::SessionIdentity};
use crate::domain::value_object::uid::Uid;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrentUser {
    pub identity: Option<SessionIdentity>,
    pub profile: Option<Profile>,
}

impl CurrentUser {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn uid(&self) -> Option<&Uid> {
        self.identity.as_ref().map(|identity| &identity.uid)
    }

    /// Uid allowed to write, present only when both the identity and its
    /// profile are resolved
    pub fn writer(&self) -> Option<&Uid> {
        match (&self.identity, &self.profile) {
            (Some(identity), Some(_)) => Some(&identity.uid),
            _ => None,
        }
    }
}
