//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use qrcafe_config::ConfigError;
use qrcafe_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the backend")]
    #[diagnostic(
        code(qrcafe::connection_failed),
        help(
            "Check that the backend is running and the API URL is right.\n\
             Inspect the active profile with: qrcafe config show"
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(qrcafe::auth_failed),
        help(
            "Verify your API token.\n\
             Store a new one with: qrcafe config set-token"
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(qrcafe::not_found),
        help("Run: qrcafe {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend ──────────────────────────────────────────────────────

    #[error("Backend rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(qrcafe::api_error))]
    ApiError { status: u16, message: String },

    #[error("Listing cache error: {message}")]
    #[diagnostic(
        code(qrcafe::cache),
        help("Check the cache_url of the active profile, or unset it to run without the cache.")
    )]
    Cache { message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(code(qrcafe::internal))]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(qrcafe::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(qrcafe::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(qrcafe::no_config),
        help(
            "Pass --api-url (or set QRCAFE_API_URL), or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(qrcafe::configuration),
        help("Cafe commands need a user id: pass --user-id or set user_id in the profile.")
    )]
    Configuration { message: String },

    #[error(transparent)]
    #[diagnostic(code(qrcafe::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(qrcafe::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(qrcafe::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(qrcafe::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ApiError { status: 409, .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Configuration { .. }
            | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Turn a backend "not found" into a resource-specific error.
    pub fn scoped(err: CoreError, resource_type: &str, identifier: &str, list_command: &str) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: list_command.into(),
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration { message } => CliError::Configuration { message },

            CoreError::Validation { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::NotFound { identifier } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier,
                list_command: "--help".into(),
            },

            CoreError::Http {
                status: 401 | 403,
                message,
                ..
            } => CliError::AuthFailed { message },

            CoreError::Http {
                status, message, ..
            } => CliError::ApiError { status, message },

            CoreError::Network { message } => CliError::ConnectionFailed {
                source: message.into(),
            },

            CoreError::Cache { message } => CliError::Cache { message },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let not_found: CliError = CoreError::NotFound {
            identifier: "Cafe not found".into(),
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let offline: CliError = CoreError::Network {
            message: "connection refused".into(),
        }
        .into();
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let denied: CliError = CoreError::Http {
            status: 401,
            message: "Unauthorized".into(),
            details: None,
        }
        .into();
        assert_eq!(denied.exit_code(), exit_code::AUTH);

        let missing_user: CliError = CoreError::Configuration {
            message: "no user id configured".into(),
        }
        .into();
        assert_eq!(missing_user.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn scoped_names_the_resource() {
        let err = CliError::scoped(
            CoreError::NotFound {
                identifier: "Category not found".into(),
            },
            "category",
            "12",
            "categories list --cafe <ID>",
        );
        assert_eq!(err.to_string(), "category '12' not found");
    }

    #[test]
    fn scoped_passes_other_errors_through() {
        let err = CliError::scoped(
            CoreError::Http {
                status: 409,
                message: "slug taken".into(),
                details: None,
            },
            "cafe",
            "3",
            "cafes list",
        );
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
    }
}
