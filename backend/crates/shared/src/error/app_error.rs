//! Application Error - the user-facing error value
//!
//! [`AppError`] is what eventually reaches an HTTP client: a kind, a message,
//! an optional machine-readable reason token and an optional source error that
//! is kept for logs only.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// HTTP クライアントに返却されるエラーの標準形です。
/// ビルダーパターンで理由トークンや元エラーを付与できます。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `message` - ユーザー向けのエラーメッセージ
/// * `reason` - クライアントが分岐に使う短いトークン（オプション）
/// * `source` - 元のエラー（オプション、ログ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Unauthorized, "auth/wrong-password")
///     .with_reason("wrong-password");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.reason(), Some("wrong-password"));
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// 理由トークン（例: `email-already-in-use`）
    reason: Option<Cow<'static, str>>,
    /// 元のエラー（ログ用、レスポンスには含めない）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl AppError {
    /// 新しいエラーを作成
    ///
    /// ## Arguments
    /// * `kind` - エラー種別
    /// * `message` - ユーザー向けメッセージ
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            reason: None,
            source: None,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// 理由トークンを設定
    ///
    /// ## Arguments
    /// * `reason` - `auth/` などの接頭辞を除いた短いトークン
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Cow<'static, str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// 元のエラーを設定（ログ用）
    ///
    /// `Display` やレスポンス本文には現れず、`Error::source` からのみ参照できます。
    ///
    /// ## Arguments
    /// * `source` - 元のエラー
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP ステータスコード
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(reason) = &self.reason {
            builder.field("reason", reason);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
