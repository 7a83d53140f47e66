//! Chirpr Error Types
//!
//! Provider-level errors that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::service::StoreError;
use crate::domain::value_object::auth_failure::AuthFailure;

/// Chirpr result type alias
pub type ChirprResult<T> = Result<T, ChirprError>;

#[derive(Debug, Error)]
pub enum ChirprError {
    /// Rejected by the identity service
    #[error("Identity service rejected the request: {0}")]
    Identity(#[from] AuthFailure),

    /// Rejected by the document store
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChirprError {
    /// Cleaned identity reason token, e.g. `wrong-password`
    pub fn reason(&self) -> Option<&str> {
        match self {
            ChirprError::Identity(failure) => Some(failure.reason()),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChirprError::Identity(failure) => failure.kind(),
            ChirprError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            ChirprError::Store(StoreError::PermissionDenied(_)) => ErrorKind::Forbidden,
            ChirprError::Store(StoreError::Unavailable(_)) => ErrorKind::ServiceUnavailable,
            ChirprError::Store(StoreError::Rejected { .. }) => ErrorKind::BadGateway,
            ChirprError::Store(StoreError::Decode(_)) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError; store details stay in the source
    pub fn to_app_error(&self) -> AppError {
        let err = match self {
            ChirprError::Identity(failure) => AppError::new(self.kind(), failure.code().to_string()),
            ChirprError::Store(store) if self.kind().is_server_error() => {
                AppError::new(self.kind(), self.kind().as_str()).with_source(store.clone())
            }
            ChirprError::Store(store) => {
                AppError::new(self.kind(), self.to_string()).with_source(store.clone())
            }
        };
        match self.reason() {
            Some(reason) => err.with_reason(reason.to_string()),
            None => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ChirprError::Identity(failure) if failure.kind().is_server_error() => {
                tracing::warn!(code = failure.code(), detail = ?failure.detail(), "Identity service failure");
            }
            ChirprError::Identity(failure) => {
                tracing::debug!(code = failure.code(), "Identity request rejected");
            }
            ChirprError::Store(err) => {
                tracing::error!(error = %err, "Document store error");
            }
        }
    }
}

impl IntoResponse for ChirprError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
