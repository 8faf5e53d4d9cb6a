//! HTTP status classification for file-manager API responses.

/// Status classes the client distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusKind {
    /// 2xx
    Success,
    /// 400 - malformed request, e.g. missing destination
    BadRequest,
    /// 401 - credentials missing or rejected
    Unauthorized,
    /// 403 - path escapes the served root
    Forbidden,
    /// 404 - path does not exist
    NotFound,
    /// 5xx - server-side failure
    ServerError,
    /// Anything else
    Unknown,
}

impl From<u16> for HttpStatusKind {
    fn from(status: u16) -> Self {
        match status {
            200..=299 => HttpStatusKind::Success,
            400 => HttpStatusKind::BadRequest,
            401 => HttpStatusKind::Unauthorized,
            403 => HttpStatusKind::Forbidden,
            404 => HttpStatusKind::NotFound,
            500..=599 => HttpStatusKind::ServerError,
            _ => HttpStatusKind::Unknown,
        }
    }
}

impl HttpStatusKind {
    /// Get human-readable description of the status class.
    pub fn description(&self) -> &'static str {
        match self {
            HttpStatusKind::Success => "OK",
            HttpStatusKind::BadRequest => "Bad request",
            HttpStatusKind::Unauthorized => "Unauthorized",
            HttpStatusKind::Forbidden => "Access denied",
            HttpStatusKind::NotFound => "Not found",
            HttpStatusKind::ServerError => "Server error",
            HttpStatusKind::Unknown => "Unexpected response",
        }
    }

    /// Check if the status denotes success.
    pub fn is_success(&self) -> bool {
        *self == HttpStatusKind::Success
    }
}
