//! Presentation Layer
//!
//! Routing shell, HTTP handlers, DTOs and the axum router.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod routing;

pub use router::shell_router;
pub use routing::{Route, View, render, resolve};
