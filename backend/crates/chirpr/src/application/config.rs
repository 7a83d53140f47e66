//! Application Configuration
//!
//! Configuration for the Chirpr application layer.

use crate::domain::document::DocumentPath;
use crate::domain::value_object::{chirp_id::ChirpId, uid::Uid};

/// Placeholder avatar for accounts without a photo
pub const DEFAULT_AVATAR_URL: &str =
    "https://moonvillageassociation.org/wp-content/uploads/2018/06/default-profile-picture1.jpg";

/// Chirpr application configuration
#[derive(Debug, Clone)]
pub struct ChirprConfig {
    /// Avatar written at registration when the identity has no photo URL
    pub default_avatar_url: String,
    /// Collection holding profile records (`{users}/{uid}`)
    pub users_collection: String,
    /// Collection holding chirp records
    pub chirps_collection: String,
}

impl Default for ChirprConfig {
    fn default() -> Self {
        Self {
            default_avatar_url: DEFAULT_AVATAR_URL.to_string(),
            users_collection: "users".to_string(),
            chirps_collection: "chirps".to_string(),
        }
    }
}

impl ChirprConfig {
    pub fn with_default_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.default_avatar_url = url.into();
        self
    }

    pub fn profile_path(&self, uid: &Uid) -> DocumentPath {
        DocumentPath::new(&self.users_collection, uid.as_str())
    }

    pub fn chirp_path(&self, id: &ChirpId) -> DocumentPath {
        DocumentPath::new(&self.chirps_collection, id.as_str())
    }
}
