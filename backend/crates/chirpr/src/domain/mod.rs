//! Domain Layer
//!
//! Entities, value objects, the document model and the two service ports.

pub mod document;
pub mod entity;
pub mod service;
pub mod value_object;

// Re-exports
pub use document::{DocumentConverter, DocumentPath, FieldValue, Fields};
pub use entity::{
    chirp::Chirp, current_user::CurrentUser, profile::Profile, session_identity::SessionIdentity,
};
pub use service::{AuthState, AuthStateStream, DocumentStore, IdentityService, StoreError};
