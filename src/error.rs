use thiserror::Error;

/// Errors produced by a [`crate::spotify::Catalog`] transport.
///
/// The HTTP status is classified as soon as a response arrives, so callers
/// never have to look at raw status codes.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("unauthorized (token expired or revoked)")]
    Unauthorized,

    #[error("forbidden (capability not granted to this token)")]
    Forbidden,

    #[error("rate limited (retry after {retry_after:?} seconds)")]
    RateLimited { retry_after: Option<u64> },

    #[error("not found")]
    NotFound,

    #[error("server error: HTTP {0}")]
    Server(u16),

    #[error("unexpected status: HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}

/// How the pipeline reacts to a failed catalog call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// 403. Sticky for the rest of the session, never retried.
    CapabilityDenied,
    /// 429 that was still failing after the retry budget.
    RateLimited,
    /// 401. Logged; the token has to be refreshed by the caller.
    Unauthorized,
    /// Network, timeout, 404, 5xx and malformed payloads.
    Transient,
}

impl CatalogError {
    pub fn failure(&self) -> Failure {
        match self {
            CatalogError::Forbidden => Failure::CapabilityDenied,
            CatalogError::RateLimited { .. } => Failure::RateLimited,
            CatalogError::Unauthorized => Failure::Unauthorized,
            _ => Failure::Transient,
        }
    }
}

/// Errors surfaced by the command-line shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Catalog(e.into())
    }
}
