//! Error rendering - RFC 7807 problem bodies for [`AppError`]

use super::app_error::AppError;

/// [`AppError`] を RFC 7807 形式の JSON に変換
///
/// `source` は含めません。`reason` が無い場合は `null` になります。
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, conversions::problem_body, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Conflict, "auth/email-already-in-use")
///     .with_reason("email-already-in-use");
/// let body = problem_body(&err);
/// assert_eq!(body["status"], 409);
/// assert_eq!(body["reason"], "email-already-in-use");
/// ```
pub fn problem_body(err: &AppError) -> serde_json::Value {
    serde_json::json!({
        "type": format!("https://httpstatuses.io/{}", err.status_code()),
        "title": err.kind().as_str(),
        "status": err.status_code(),
        "detail": err.message(),
        "reason": err.reason(),
    })
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(problem_body(&self))).into_response()
    }
}
