// ── Core error types ──
//
// Errors surfaced to the host runtime. Transport-level failures from
// ipm-api are folded into the provider's error kinds by the
// `From<ipm_api::Error>` impl; the host only ever sees a `Diagnostic`.

use serde::Serialize;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Missing or malformed required input (credentials, ids, selectors).
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A server-side precondition did not hold after retries.
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    // ── Server errors ────────────────────────────────────────────────
    /// The server answered with a status other than 200/202.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The token endpoint refused the credentials.
    #[error("Authentication failed (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    /// Transport-layer failure (connect, TLS handshake, timeout).
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The body could not be parsed or lacks required fields.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    // ── Reconcile errors ─────────────────────────────────────────────
    /// The server has not converged yet (partial object, pending state).
    #[error("Not converged: {message}")]
    Pending { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The object was created but reading it back failed. The id is
    /// reported so it can be imported.
    #[error("{entity} {id} was created but could not be read back: {source}")]
    ReadBack {
        entity: &'static str,
        id: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },
}

impl CoreError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::Pending {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Transient HTTP statuses, I/O failures and non-converged reads
    /// retry; configuration, authentication and protocol errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => {
                matches!(status, 404 | 408 | 409 | 425 | 429) || (500..600).contains(status)
            }
            Self::Io { .. } | Self::Pending { .. } => true,
            _ => false,
        }
    }

    /// Whether the addressed object does not exist on the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Http { status: 404, .. })
    }

    /// The error kind as shown in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ConfigError",
            Self::Precondition { .. } => "PreconditionError",
            Self::Http { .. } | Self::NotFound { .. } => "HttpError",
            Self::Auth { .. } => "AuthError",
            Self::Io { .. } => "IoError",
            Self::Protocol { .. } => "ProtocolError",
            Self::Pending { .. } => "PendingError",
            Self::ReadBack { source, .. } => source.kind(),
            Self::Unsupported { .. } => "UnsupportedError",
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ipm_api::Error> for CoreError {
    fn from(err: ipm_api::Error) -> Self {
        match err {
            ipm_api::Error::MissingCredentials(field) => CoreError::Config {
                message: format!("missing provider setting: {field}"),
            },
            ipm_api::Error::Authentication { status, body } => CoreError::Auth { status, body },
            ipm_api::Error::Transport(e) => CoreError::Io {
                message: e.to_string(),
            },
            ipm_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            ipm_api::Error::InvalidId(id) => CoreError::Config {
                message: format!("invalid id: {id:?}"),
            },
            ipm_api::Error::Tls(message) => CoreError::Config { message },
            ipm_api::Error::Http { status, body } => CoreError::Http { status, body },
            ipm_api::Error::Deserialization { message, body: _ } => CoreError::Protocol { message },
            ipm_api::Error::Protocol(message) => CoreError::Protocol { message },
        }
    }
}

// ── Diagnostics ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What the host runtime displays for a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl From<&CoreError> for Diagnostic {
    fn from(err: &CoreError) -> Self {
        let detail = match err {
            CoreError::Http { status, body } | CoreError::Auth { status, body } => {
                format!("status {status}: {body}")
            }
            other => other.to_string(),
        };
        Diagnostic::error(err.kind(), detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_predicate() {
        for status in [404, 408, 409, 425, 429, 500, 502, 503] {
            let err = CoreError::Http {
                status,
                body: String::new(),
            };
            assert!(err.is_retryable(), "{status} should retry");
        }
        for status in [400, 401, 403, 422] {
            let err = CoreError::Http {
                status,
                body: String::new(),
            };
            assert!(!err.is_retryable(), "{status} should not retry");
        }
        assert!(CoreError::pending("partial").is_retryable());
        assert!(!CoreError::config("missing id").is_retryable());
        assert!(
            !CoreError::Auth {
                status: 401,
                body: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn api_errors_map_to_provider_kinds() {
        let err: CoreError = ipm_api::Error::Authentication {
            status: 401,
            body: "bad".into(),
        }
        .into();
        assert_eq!(err.kind(), "AuthError");

        let err: CoreError = ipm_api::Error::MissingCredentials("password").into();
        assert_eq!(err.kind(), "ConfigError");

        let err: CoreError = ipm_api::Error::Protocol("no href".into()).into();
        assert_eq!(err.kind(), "ProtocolError");
    }

    #[test]
    fn http_diagnostic_carries_status_and_body() {
        let err = CoreError::Http {
            status: 409,
            body: "{\"reason\":\"busy\"}".into(),
        };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.summary, "HttpError");
        assert_eq!(diag.detail, "status 409: {\"reason\":\"busy\"}");
    }

    #[test]
    fn read_back_keeps_the_inner_kind() {
        let err = CoreError::ReadBack {
            entity: "network connection",
            id: "nc-42".into(),
            source: Box::new(CoreError::pending("1 of 2 endpoints")),
        };
        assert_eq!(err.kind(), "PendingError");
        assert!(err.to_string().contains("nc-42"));
        assert!(!err.is_retryable());
    }
}
