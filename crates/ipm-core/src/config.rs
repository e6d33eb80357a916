// ── Provider configuration ──
//
// What the provider block resolves to once credentials and timeouts are
// known. Core never touches disk or the environment: `ipm-config` (or a
// test) builds a `ProviderConfig` and hands it to `Provider::configure`.

use std::path::PathBuf;

use ipm_api::{Credentials, Timeouts, TlsMode, TransportConfig};
use secrecy::SecretString;

use crate::settings::ReconcileSettings;

/// TLS verification strategy for the management server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (PEM).
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab servers).
    DangerAcceptInvalid,
}

/// Resolved provider block.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bare host (`cm.example.net`) or a base URL with scheme.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub timeouts: Timeouts,
    pub settings: ReconcileSettings,
}

impl ProviderConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            tls: TlsVerification::default(),
            timeouts: Timeouts::default(),
            settings: ReconcileSettings::default(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeouts: self.timeouts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_is_on_by_default() {
        let cfg = ProviderConfig::new("h", "u", "p".to_owned());
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert!(matches!(cfg.transport().tls, TlsMode::System));
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = ProviderConfig::new("h", "u", "hunter2".to_owned());
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
