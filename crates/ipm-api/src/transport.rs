// Shared transport configuration for building reqwest::Client instances.
//
// The token client and the resource client share TLS settings through
// this module. Timeouts are not baked into the client: each request picks
// its own deadline from `Timeouts` by HTTP method, so concurrent requests
// never contend on shared client state.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::error::Error;

const USER_AGENT: &str = concat!("ipm-provider/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed lab servers).
    DangerAcceptInvalid,
}

/// Per-verb request deadlines.
///
/// `None` means unbounded. Defaults: GET unbounded, POST/PUT/PATCH 4s,
/// DELETE 5s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub get: Option<Duration>,
    pub update: Option<Duration>,
    pub delete: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            get: None,
            update: Some(Duration::from_secs(4)),
            delete: Some(Duration::from_secs(5)),
        }
    }
}

impl Timeouts {
    /// Build from whole seconds, where `0` means unbounded.
    pub fn from_secs(get: u64, update: u64, delete: u64) -> Self {
        let bounded = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));
        Self {
            get: bounded(get),
            update: bounded(update),
            delete: bounded(delete),
        }
    }

    /// The deadline that applies to a request with the given method.
    pub fn for_method(&self, method: &Method) -> Option<Duration> {
        match *method {
            Method::GET | Method::HEAD => self.get,
            Method::DELETE => self.delete,
            _ => self.update,
        }
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeouts: Timeouts,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// The client carries no global timeout; callers apply
    /// [`Timeouts::for_method`] per request.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.builder()?
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by the resource client to inject `Authorization` and
    /// `Content-Type` on every request.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        self.builder()?
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    fn builder(&self) -> Result<reqwest::ClientBuilder, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts_match_server_expectations() {
        let t = Timeouts::default();
        assert_eq!(t.for_method(&Method::GET), None);
        assert_eq!(t.for_method(&Method::POST), Some(Duration::from_secs(4)));
        assert_eq!(t.for_method(&Method::PUT), Some(Duration::from_secs(4)));
        assert_eq!(t.for_method(&Method::PATCH), Some(Duration::from_secs(4)));
        assert_eq!(t.for_method(&Method::DELETE), Some(Duration::from_secs(5)));
    }

    #[test]
    fn zero_seconds_means_unbounded() {
        let t = Timeouts::from_secs(0, 10, 0);
        assert_eq!(t.get, None);
        assert_eq!(t.update, Some(Duration::from_secs(10)));
        assert_eq!(t.delete, None);
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            timeouts: Timeouts::default(),
        };
        assert!(matches!(cfg.build_client(), Err(Error::Tls(_))));
    }
}
