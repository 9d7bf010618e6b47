// src/error.rs
//! Application error types with structured error handling.
//!
//! Every variant here is fatal for the download that raised it. Gaps that
//! the engine tolerates (deleted children, access-restricted blocks) never
//! surface as errors; they land in the skip set instead.

use crate::types::NotionId;
use std::fmt;
use thiserror::Error;

/// Error names reported in the body of a failed `api/v3` call.
///
/// The private API answers failures with `{"errorId": .., "name": .., "message": ..}`.
/// The `name` is mapped onto this vocabulary so callers can match on it
/// instead of comparing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// Too many requests, back off and retry
    RateLimited,
    /// The record does not exist or the session cannot see it
    ObjectNotFound,
    /// Missing or expired `token_v2`
    Unauthorized,
    /// The request body was rejected by the server's validator
    ValidationFailed,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error name this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse the `name` field of an error body.
    pub fn from_api_response(name: &str) -> Self {
        match name {
            "RateLimitedError" | "rate_limited" => Self::RateLimited,
            "NotFound" | "NotFoundError" | "object_not_found" => Self::ObjectNotFound,
            "UnauthorizedError" | "unauthorized" => Self::Unauthorized,
            "ValidationError" | "validation_error" => Self::ValidationFailed,
            "InternalServerError" | "internal_server_error" => Self::InternalError,
            "ServiceUnavailableError" | "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::ObjectNotFound,
            429 => Self::RateLimited,
            500 => Self::InternalError,
            503 => Self::ServiceUnavailable,
            other => Self::HttpStatus(other),
        }
    }

    /// Classifies a failed response, preferring the body over the status.
    ///
    /// Returns the code together with the server's message, or a preview of
    /// the raw body when it is not the usual error object.
    pub fn classify(status: u16, body: &str) -> (Self, String) {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            name: Option<String>,
            message: Option<String>,
        }

        if let Ok(ErrorBody {
            name: Some(name),
            message,
        }) = serde_json::from_str::<ErrorBody>(body)
        {
            return (
                Self::from_api_response(&name),
                message.unwrap_or_default(),
            );
        }

        let preview: String = body
            .chars()
            .take(crate::constants::ERROR_BODY_PREVIEW_LENGTH)
            .collect();
        (Self::from_http_status(status), preview)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Failed to decode {table} record '{id}': {reason}")]
    Decode {
        table: String,
        id: String,
        reason: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("POST {url} returned status {status} ({code}): {message}")]
    HttpStatus {
        url: String,
        status: u16,
        code: NotionErrorCode,
        message: String,
    },

    #[error("POST {url} still rate limited after {retries} retries")]
    RateLimitExhausted { url: String, retries: usize },

    #[error("Couldn't retrieve page '{0}'")]
    PageNotFound(NotionId),

    #[error("Could not find parent '{parent_id}' of block '{block_id}'")]
    MissingParent {
        block_id: NotionId,
        parent_id: String,
    },

    #[error("Didn't find collection '{collection_id}' for block '{block_id}'")]
    MissingCollection {
        block_id: NotionId,
        collection_id: String,
    },

    #[error("Didn't find collection_view '{view_id}' for block '{block_id}'")]
    MissingCollectionView { block_id: NotionId, view_id: NotionId },

    #[error("collection_view block '{0}' has no view ids")]
    CollectionViewWithoutViews(NotionId),

    #[error("Query of view '{view_id}' returned row '{row_id}' without a live block")]
    MissingRowBlock { view_id: NotionId, row_id: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Shorthand for a decode failure on a record of `table`.
    pub fn decode(table: impl fmt::Display, id: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Decode {
            table: table.to_string(),
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkFailure(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
