use axum::http::StatusCode;
use thiserror::Error;

use super::AppError;

/// Failures of document store and facade operations.
///
/// Remote failures are carried as reported by the store; nothing here is
/// retried or reinterpreted.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote store returned {status} {code}: {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Document '{path}' not found")]
    NotFound { path: String },

    #[error("Invalid document key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Malformed document '{path}': {details}")]
    Decode { path: String, details: String },

    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl AppError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Remote { status, .. } => match StatusCode::from_u16(*status) {
                Ok(code) if code.is_client_error() => code,
                _ => StatusCode::BAD_GATEWAY,
            },
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::InvalidKey { .. } => StatusCode::BAD_REQUEST,
            StoreError::Decode { .. } => StatusCode::BAD_GATEWAY,
            StoreError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            StoreError::Transport(_) => "Document store is unreachable".to_string(),
            StoreError::Remote { message, .. } => message.clone(),
            StoreError::NotFound { .. } => "Document not found".to_string(),
            StoreError::InvalidKey { reason, .. } => format!("Invalid document key: {}", reason),
            StoreError::Decode { .. } => "Stored document could not be read".to_string(),
            StoreError::Config(_) => "An internal error occurred".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "STORE_TRANSPORT",
            StoreError::Remote { .. } => "STORE_REMOTE",
            StoreError::NotFound { .. } => "STORE_NOT_FOUND",
            StoreError::InvalidKey { .. } => "STORE_INVALID_KEY",
            StoreError::Decode { .. } => "STORE_MALFORMED_DOCUMENT",
            StoreError::Config(_) => "STORE_CONFIG",
        }
    }

    fn suggested_action(&self) -> Option<String> {
        match self {
            StoreError::NotFound { .. } => Some("Save the user before updating stamps".to_string()),
            StoreError::Remote { status: 401 | 403, .. } => {
                Some("Check the Firebase API key and Firestore security rules".to_string())
            }
            _ => None,
        }
    }
}

impl_into_response!(StoreError);

impl StoreError {
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn invalid_key<K: Into<String>, R: Into<String>>(key: K, reason: R) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn decode<P: Into<String>, D: std::fmt::Display>(path: P, details: D) -> Self {
        Self::Decode {
            path: path.into(),
            details: details.to_string(),
        }
    }
}
