use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document id of a chirp record.
///
/// Ids minted here are 32 lowercase hex characters; ids read back from the
/// store may come from other clients and are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ChirpId(String);

impl ChirpId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn from_stored(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
