//! Chirpr Session/Data Provider
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, document model, service traits
//! - `application/` - Use cases and the session provider
//! - `infra/` - In-memory and Firebase REST service implementations
//! - `presentation/` - Routing shell, HTTP handlers, DTOs, router
//!
//! ## Features
//! - Email + password registration and login through an external identity service
//! - Current-user tracking from the identity service's auth-state stream
//! - Chirp posting and single-field profile edits, gated on a resolved profile
//! - Path-to-page routing behind a loading gate

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::ChirprConfig;
pub use application::outcome::WriteOutcome;
pub use application::session_provider::{SessionProvider, SessionState};
pub use error::{ChirprError, ChirprResult};
pub use presentation::router::shell_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod services {
    pub use crate::domain::service::{
        AuthState, AuthStateStream, DocumentStore, IdentityService, StoreError,
    };
    pub use crate::infra::*;
}
