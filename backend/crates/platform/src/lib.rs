//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no Chirpr vocabulary in them:
//! - Typed configuration lookup (`config`)
//! - HTTP client construction and response previews (`http`)
//! - Clear-text password handling with zeroization (`password`)

pub mod config;
pub mod http;
pub mod password;
