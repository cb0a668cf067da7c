use thiserror::Error;

/// Top-level error type for the `qrcafe-api` crate.
///
/// Configuration and validation failures are raised before any I/O.
/// `Http` and `Network` come from the backend round-trip and are handed to
/// the caller untouched -- this crate never retries.
#[derive(Debug, Error)]
pub enum Error {
    // ── Pre-flight ──────────────────────────────────────────────────
    /// Required configuration missing (e.g. a sort endpoint without `api_url`).
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Caller-supplied input rejected before reaching the network.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Non-success HTTP status, or a 2xx envelope with `success: false`.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The request never completed (connection refused, DNS, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never reached the server.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Returns `true` for failures detected before any network call.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Validation { .. } | Self::InvalidUrl(_)
        )
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}
