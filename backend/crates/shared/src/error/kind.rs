//! Error Kind - Classification of errors
//!
//! Every failure surfaced to a caller is classified into an [`ErrorKind`],
//! which in turn fixes the HTTP status the shell answers with.

use serde::Serialize;

/// エラー種別の列挙体
///
/// 各層のエラーはこの分類にマッピングされ、HTTP ステータスコードが決まります。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Conflict;
/// assert_eq!(kind.status_code(), 409);
/// assert_eq!(kind.as_str(), "Conflict");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: 入力が不正
    BadRequest,
    /// 401 - Unauthorized: 認証情報が一致しない
    Unauthorized,
    /// 403 - Forbidden: アカウントまたはドキュメントへのアクセス権限なし
    Forbidden,
    /// 404 - Not Found: レコードが存在しない
    NotFound,
    /// 409 - Conflict: レコードが既に存在する
    Conflict,
    /// 429 - Too Many Requests: 外部サービスのレート制限
    TooManyRequests,
    /// 500 - Internal Server Error: 内部エラーまたは解読できないレコード
    InternalServerError,
    /// 502 - Bad Gateway: 外部サービスの想定外の応答
    BadGateway,
    /// 503 - Service Unavailable: 外部サービスに接続できない
    ServiceUnavailable,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    ///
    /// ## Returns
    /// RFC 9110 に準拠した HTTP ステータスコード
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
            ErrorKind::BadGateway => 502,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// ステータスコードの標準リーズンフレーズを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::BadGateway.as_str(), "Bad Gateway");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::BadGateway => "Bad Gateway",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// サーバーエラー（5xx）かどうか
    ///
    /// 5xx の場合は詳細をクライアントに返さず、ログにのみ残します。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
