// OpenID-Connect sign-in
//
// Resource-owner password grant against the server's `xr-cm` realm.
// The token is acquired once per provider configuration; it is not
// refreshed, and a later 401 is terminal for the current apply.

use std::fmt;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

const TOKEN_PATH: &str = "realms/xr-cm/protocol/openid-connect/token";
const CLIENT_ID: &str = "xr-web-client";
const CLIENT_SECRET: &str = "xr-web-client";

/// Username and password for the password grant.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A bearer token ready for the `Authorization` header (`"Bearer …"`).
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(access_token: &str) -> Self {
        Self(SecretString::from(format!("Bearer {access_token}")))
    }

    /// The header value, marked sensitive so it never shows up in logs.
    pub fn header_value(&self) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(self.0.expose_secret())
            .map_err(|e| Error::Protocol(format!("access token is not a valid header: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Normalize a provider `host` into the server root URL.
///
/// A bare host (`cm.example.net`) gets `https://`; anything with a scheme
/// is taken as-is. The returned URL always ends with `/`.
pub fn server_root(host: &str) -> Result<Url, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::MissingCredentials("host"));
    }
    let raw = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    let mut url = Url::parse(&raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// The token endpoint for a server root.
pub fn token_url(root: &Url) -> Result<Url, Error> {
    Ok(root.join(TOKEN_PATH)?)
}

/// Sign in with the password grant and return the bearer token.
pub async fn sign_in(
    http: &reqwest::Client,
    root: &Url,
    credentials: &Credentials,
) -> Result<BearerToken, Error> {
    if credentials.username.is_empty() {
        return Err(Error::MissingCredentials("username"));
    }
    if credentials.password.expose_secret().is_empty() {
        return Err(Error::MissingCredentials("password"));
    }

    let url = token_url(root)?;
    debug!(user = %credentials.username, "signing in at {url}");

    let form = [
        ("username", credentials.username.as_str()),
        ("password", credentials.password.expose_secret()),
        ("grant_type", "password"),
        ("client_secret", CLIENT_SECRET),
        ("client_id", CLIENT_ID),
    ];

    let resp = http
        .post(url)
        .header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        )
        .form(&form)
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if status != reqwest::StatusCode::OK {
        return Err(Error::Authentication {
            status: status.as_u16(),
            body,
        });
    }

    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("token response: {e}"),
            body: String::new(),
        })?;

    debug!("sign-in successful");
    Ok(BearerToken::new(&token.access_token))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        let root = server_root("cm.example.net").unwrap();
        assert_eq!(root.as_str(), "https://cm.example.net/");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let root = server_root("http://127.0.0.1:8080").unwrap();
        assert_eq!(root.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn empty_host_is_missing_credentials() {
        assert!(matches!(
            server_root("  "),
            Err(Error::MissingCredentials("host"))
        ));
    }

    #[test]
    fn token_url_targets_xr_cm_realm() {
        let root = server_root("cm.example.net").unwrap();
        assert_eq!(
            token_url(&root).unwrap().as_str(),
            "https://cm.example.net/realms/xr-cm/protocol/openid-connect/token"
        );
    }

    #[test]
    fn bearer_token_is_prefixed_and_redacted() {
        let token = BearerToken::new("abc");
        assert_eq!(token.expose(), "Bearer abc");
        assert_eq!(format!("{token:?}"), "BearerToken([REDACTED])");
        assert!(token.header_value().unwrap().is_sensitive());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2".to_owned());
        let shown = format!("{creds:?}");
        assert!(!shown.contains("hunter2"));
    }
}
