//! Infrastructure Layer
//!
//! Implementations of the identity service and document store traits.

pub mod firebase;
pub mod memory;

pub use firebase::{FirebaseConfig, FirebaseIdentityService, FirestoreDocumentStore, FirebaseSession};
pub use memory::{InMemoryDocumentStore, InMemoryIdentityService};
