//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ipm_config::ConfigError;
use ipm_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PRECONDITION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Provider configuration is incomplete: {source}")]
    #[diagnostic(
        code(ipm::config),
        help(
            "Set host and username in {path} or via IPM_HOST / IPM_USERNAME.\n\
             The password comes from IPM_PASSWORD, the keyring (ipm config set-password)\n\
             or the password key in the file."
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed (HTTP {status}): {body}")]
    #[diagnostic(
        code(ipm::auth_failed),
        help("Verify the username and password for this server.")
    )]
    AuthFailed { status: u16, body: String },

    // ── Reconcile ────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(
        code(ipm::precondition),
        help(
            "A network connection needs a configured transport capacity between\n\
             its first two endpoints. Create it first and retry."
        )
    )]
    Precondition(CoreError),

    #[error("{0}")]
    #[diagnostic(code(ipm::not_found))]
    NotFound(CoreError),

    #[error("{0}")]
    #[diagnostic(
        code(ipm::connection_failed),
        help("Check that the server is reachable, or pass --insecure for a self-signed lab server.")
    )]
    Connection(CoreError),

    #[error("{0}")]
    #[diagnostic(code(ipm::provider))]
    Provider(CoreError),

    #[error("{count} validation error(s):\n{details}")]
    #[diagnostic(code(ipm::validation))]
    Invalid { count: usize, details: String },

    // ── Usage ────────────────────────────────────────────────────────
    #[error("`{operation}` needs {flag}")]
    #[diagnostic(code(ipm::usage))]
    MissingArgument {
        operation: &'static str,
        flag: &'static str,
    },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error("Failed to read {path}")]
    #[diagnostic(code(ipm::io))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(ipm::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound(_) => exit_code::NOT_FOUND,
            Self::Precondition(_) => exit_code::PRECONDITION,
            Self::Connection(_) => exit_code::CONNECTION,
            Self::Config { .. } | Self::Invalid { .. } | Self::MissingArgument { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth { status, body } => Self::AuthFailed { status, body },
            CoreError::Precondition { .. } => Self::Precondition(err),
            CoreError::Io { .. } => Self::Connection(err),
            e if e.is_not_found() => Self::NotFound(e),
            e => Self::Provider(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_get_distinct_exit_codes() {
        let auth = CliError::from(CoreError::Auth {
            status: 401,
            body: String::new(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let gone = CliError::from(CoreError::Http {
            status: 404,
            body: String::new(),
        });
        assert_eq!(gone.exit_code(), exit_code::NOT_FOUND);

        let pre = CliError::from(CoreError::Precondition {
            message: "no capacity".into(),
        });
        assert_eq!(pre.exit_code(), exit_code::PRECONDITION);

        let other = CliError::from(CoreError::protocol("bad body"));
        assert_eq!(other.exit_code(), exit_code::GENERAL);
    }
}
