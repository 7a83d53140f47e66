//! Shared Kernel - vocabulary shared by every Chirpr crate
//!
//! Only the pieces whose meaning is identical across crates live here:
//! - [`error::kind::ErrorKind`], the classification every layer maps into
//! - [`error::app_error::AppError`], the user-facing error value
//! - the RFC 7807 rendering of `AppError`

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
