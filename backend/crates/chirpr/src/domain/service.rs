//! Service Traits
//!
//! Ports to the two external collaborators: the managed identity service and
//! the document store. Adapters live in the infrastructure layer.

use platform::password::ClearTextPassword;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::document::{DocumentConverter, DocumentPath, Fields};
use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::value_object::{auth_failure::AuthFailure, email::Email};

/// Authentication state as published by the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The service has not reported yet. Not an event.
    Resolving,
    SignedOut,
    SignedIn(SessionIdentity),
}

impl AuthState {
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            AuthState::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Auth-state stream; the current value is always readable
pub type AuthStateStream = watch::Receiver<AuthState>;

/// Document store rejection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Document store rejected the request ({status}): {message}")]
    Rejected { status: String, message: String },

    #[error("Malformed document: {0}")]
    Decode(String),
}

/// Identity service trait
#[trait_variant::make(IdentityService: Send)]
pub trait LocalIdentityService {
    /// Create an account and sign it in
    async fn create_account(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure>;

    /// Verify credentials and sign in
    async fn sign_in(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure>;

    async fn sign_out(&self) -> Result<(), AuthFailure>;

    /// Subscribe to auth-state changes
    fn subscribe(&self) -> AuthStateStream;
}

/// Document store trait
#[trait_variant::make(DocumentStore: Send)]
pub trait LocalDocumentStore {
    /// Read a document; `None` when it does not exist
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Fields>, StoreError>;

    /// Create or replace a document
    async fn set_document(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError>;

    /// Overwrite the given fields of an existing document
    async fn update_fields(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError>;
}

/// Typed read through a converter
pub async fn fetch_converted<S, C>(
    store: &S,
    path: &DocumentPath,
    converter: &C,
) -> Result<Option<C::Model>, StoreError>
where
    S: DocumentStore,
    C: DocumentConverter,
{
    match store.get_document(path).await? {
        Some(fields) => converter.from_fields(&path.id, &fields).map(Some),
        None => Ok(None),
    }
}
