//! Provider block loading for the IPM provider.
//!
//! Layers code defaults, a TOML file and `IPM_*` environment variables
//! with figment, resolves the password (env, keyring, plaintext) and
//! translates the result into `ipm_core::ProviderConfig`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use ipm_api::Timeouts;
use ipm_core::{ProviderConfig, TlsVerification};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const KEYRING_SERVICE: &str = "ipm";
const PASSWORD_ENV: &str = "IPM_PASSWORD";
const CONFIG_ENV: &str = "IPM_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for {username}@{host}")]
    NoCredentials { host: String, username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Provider block ──────────────────────────────────────────────────

/// The provider block as read from file and environment.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Server host, bare (`cm.example.net`) or with a scheme.
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub username: String,

    /// Plaintext password (prefer `IPM_PASSWORD` or the keyring).
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Accept any server certificate.
    #[serde(default)]
    pub insecure: bool,

    /// PEM file with an additional trusted CA.
    pub ca_cert: Option<PathBuf>,

    /// Request deadlines in seconds; 0 means unbounded.
    #[serde(default)]
    pub get_timeout: u64,
    #[serde(default = "default_update_timeout")]
    pub update_timeout: u64,
    #[serde(default = "default_delete_timeout")]
    pub delete_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: None,
            insecure: false,
            ca_cert: None,
            get_timeout: 0,
            update_timeout: default_update_timeout(),
            delete_timeout: default_delete_timeout(),
        }
    }
}

fn default_update_timeout() -> u64 {
    4
}
fn default_delete_timeout() -> u64 {
    5
}

// ── Config file path ────────────────────────────────────────────────

/// `IPM_CONFIG` if set, else `config.toml` in the platform config dir.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("net", "ipm", "ipm").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("ipm");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// The layered sources for a given file: defaults, the file, then
/// `IPM_*` variables and the raw timeout variables.
///
/// The password is not taken from the environment here; see
/// [`resolve_password`].
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IPM_").ignore(&["config", "password"]))
        .merge(Env::raw().only(&["get_timeout", "update_timeout", "delete_timeout"]))
}

/// Load the provider block from the canonical path and environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment(path).extract()?)
}

impl Config {
    /// The effective block as TOML, without the password.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "host".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "username".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.insecure && self.ca_cert.is_some() {
            return Err(ConfigError::Validation {
                field: "ca_cert".into(),
                reason: "cannot be combined with insecure = true".into(),
            });
        }
        Ok(())
    }

    fn tls(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }

    fn timeouts(&self) -> Timeouts {
        Timeouts::from_secs(self.get_timeout, self.update_timeout, self.delete_timeout)
    }
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_password(host: &str, username: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/{username}"))
        .ok()
        .and_then(|entry| entry.get_password().ok())
}

/// First non-empty of: environment, keyring, plaintext.
fn pick_password(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    env.filter(|pw| !pw.is_empty())
        .or_else(|| keyring().filter(|pw| !pw.is_empty()))
        .or_else(|| plaintext.filter(|pw| !pw.is_empty()).map(str::to_owned))
        .map(SecretString::from)
}

/// Resolve the password: `IPM_PASSWORD`, then the system keyring
/// (service `ipm`, entry `{host}/{username}`), then the config value.
pub fn resolve_password(config: &Config) -> Result<SecretString, ConfigError> {
    pick_password(
        std::env::var(PASSWORD_ENV).ok(),
        || keyring_password(&config.host, &config.username),
        config.password.as_deref(),
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        host: config.host.clone(),
        username: config.username.clone(),
    })
}

/// Store a password in the system keyring under `{host}/{username}`.
pub fn store_password(host: &str, username: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/{username}"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the core provider configuration with an already resolved
/// password.
pub fn to_provider_config_with(
    config: &Config,
    password: SecretString,
) -> Result<ProviderConfig, ConfigError> {
    config.validate()?;
    let mut provider = ProviderConfig::new(config.host.trim(), config.username.trim(), password);
    provider.tls = config.tls();
    provider.timeouts = config.timeouts();
    Ok(provider)
}

/// Build the core provider configuration, resolving the password.
pub fn to_provider_config(config: &Config) -> Result<ProviderConfig, ConfigError> {
    config.validate()?;
    let password = resolve_password(config)?;
    to_provider_config_with(config, password)
}
