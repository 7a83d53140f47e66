//! Application Layer
//!
//! Use cases and the session provider that owns the current-user state.

pub mod config;
pub mod login;
pub mod logout;
pub mod outcome;
pub mod register;
pub mod send_chirp;
pub mod session_provider;
pub mod update_profile;

// Re-exports
pub use config::ChirprConfig;
pub use login::{LoginInput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use outcome::WriteOutcome;
pub use register::{RegisterInput, RegisterUseCase, Registration};
pub use send_chirp::{SendChirpInput, SendChirpUseCase};
pub use session_provider::{SessionProvider, SessionState};
pub use update_profile::UpdateProfileUseCase;
