//! Firebase REST Adapters
//!
//! Identity Toolkit for accounts, Firestore for documents. Both share one
//! `reqwest::Client` and the [`FirebaseSession`] of the signed-in user.

pub mod firestore;
pub mod identity;
pub mod session;
pub mod value;

pub use firestore::FirestoreDocumentStore;
pub use identity::FirebaseIdentityService;
pub use session::FirebaseSession;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";
const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Firebase project settings
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Web API key of the project
    pub api_key: String,
    pub project_id: String,
    pub identity_base_url: String,
    pub secure_token_base_url: String,
    pub firestore_base_url: String,
}

impl FirebaseConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            identity_base_url: IDENTITY_TOOLKIT_URL.to_string(),
            secure_token_base_url: SECURE_TOKEN_URL.to_string(),
            firestore_base_url: FIRESTORE_URL.to_string(),
        }
    }

    /// `accounts:{method}` endpoint, e.g. `signUp`
    pub fn accounts_url(&self, method: &str) -> String {
        format!("{}/accounts:{method}", self.identity_base_url)
    }

    /// Refresh-token exchange endpoint
    pub fn token_url(&self) -> String {
        format!("{}/token", self.secure_token_base_url)
    }

    /// Resource name prefix of the default database's documents
    pub fn documents_name(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    pub fn documents_url(&self) -> String {
        format!("{}/{}", self.firestore_base_url, self.documents_name())
    }
}
