//! Entity Module

pub mod chirp;
pub mod current_user;
pub mod profile;
pub mod session_identity;
