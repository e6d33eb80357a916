use thiserror::Error;

/// Top-level error type for the `ipm-api` crate.
///
/// Covers every failure mode of talking to the IPM server: sign-in,
/// transport, non-success statuses and undecodable bodies.
/// `ipm-core` folds these into the provider's diagnostic kinds.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Host, username or password missing before sign-in was attempted.
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    /// The token endpoint refused the credentials.
    #[error("authentication failed (HTTP {status}): {body}")]
    Authentication { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An id that cannot stand as a single URL path segment.
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    /// TLS setup error (unreadable or invalid CA bundle).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server responses ────────────────────────────────────────────
    /// The server answered with a status other than 200/202.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The body parsed but lacks something the client relies on
    /// (e.g. an `href` in a create response).
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the bearer token was rejected mid-session.
    ///
    /// Terminal for the current apply: there is no re-sign-in loop.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authentication { .. })
            || matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Http { status, .. } => {
                matches!(status, 404 | 408 | 409 | 425 | 429) || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_not_transient() {
        let err = Error::Http {
            status: 401,
            body: "expired".into(),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_transient());
    }

    #[test]
    fn not_found_and_server_errors_are_transient() {
        for status in [404, 409, 429, 500, 503] {
            let err = Error::Http {
                status,
                body: String::new(),
            };
            assert!(err.is_transient(), "status {status} should be transient");
        }
        let err = Error::Http {
            status: 400,
            body: String::new(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn protocol_errors_are_terminal() {
        assert!(!Error::Protocol("no href".into()).is_transient());
        assert_eq!(Error::Protocol("x".into()).status(), None);
    }
}
