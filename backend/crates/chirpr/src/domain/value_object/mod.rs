//! Value Object Module

pub mod auth_failure;
pub mod chirp_handle;
pub mod chirp_id;
pub mod email;
pub mod uid;
