// ── Core error types ──
//
// User-facing errors from qrcafe-core. The `From<qrcafe_api::Error>` impl
// translates transport-layer failures into domain variants. `CoreError` is
// `Clone` because one coalesced fetch fans the same failure out to every
// waiting query.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Pre-flight ───────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Backend returned HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Cannot reach backend: {message}")]
    Network { message: String },

    // ── Listing cache ────────────────────────────────────────────────
    #[error("Listing cache error: {message}")]
    Cache { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    /// HTTP status when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<qrcafe_api::Error> for CoreError {
    fn from(err: qrcafe_api::Error) -> Self {
        match err {
            qrcafe_api::Error::Configuration { message } => CoreError::Configuration { message },
            qrcafe_api::Error::Validation { field, message } => {
                CoreError::Validation { field, message }
            }
            qrcafe_api::Error::Http {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                identifier: message,
            },
            qrcafe_api::Error::Http {
                status,
                message,
                details,
            } => CoreError::Http {
                status,
                message,
                details,
            },
            qrcafe_api::Error::Network(e) => {
                if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        identifier: e.url().map(|u| u.path().to_owned()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Network {
                        message: e.to_string(),
                    }
                }
            }
            qrcafe_api::Error::InvalidUrl(e) => CoreError::Configuration {
                message: format!("Invalid URL: {e}"),
            },
            qrcafe_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<redis::RedisError> for CoreError {
    fn from(err: redis::RedisError) -> Self {
        CoreError::Cache {
            message: err.to_string(),
        }
    }
}
