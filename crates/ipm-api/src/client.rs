// IPM REST client
//
// Wraps `reqwest::Client` with bearer-token injection, per-verb request
// deadlines and the server's success convention (200 and 202 only).
// Resource endpoints are implemented as inherent methods in separate
// files (networks, connections, circuits, capacities) to keep this module
// focused on transport mechanics.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{self, BearerToken, Credentials};
use crate::error::Error;
use crate::transport::{Timeouts, TransportConfig};
use crate::types::{Created, id_from_href};

const API_PREFIX: &str = "api/v1/";
const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Query parameter asking list and item endpoints to inline children.
pub const EXPANDED: (&str, &str) = ("content", "expanded");

/// Authenticated client for the IPM REST API rooted at `https://{host}/api/v1`.
///
/// Immutable after construction and cheap to share behind an `Arc`; every
/// request computes its own deadline, so concurrent reconciles never
/// interfere with each other.
#[derive(Debug, Clone)]
pub struct IpmClient {
    http: reqwest::Client,
    base_url: Url,
    timeouts: Timeouts,
}

impl IpmClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Sign in against `host` and build a client carrying the token.
    pub async fn connect(
        host: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let root = auth::server_root(host)?;
        let plain = transport.build_client()?;
        let token = auth::sign_in(&plain, &root, credentials).await?;
        Self::with_token(&root, &token, transport)
    }

    /// Build from a server root and an already acquired token.
    pub fn with_token(
        root: &Url,
        token: &BearerToken,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token.header_value()?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));

        let http = transport.build_client_with_headers(headers)?;
        let base_url = root.join(API_PREFIX)?;

        Ok(Self {
            http,
            base_url,
            timeouts: transport.timeouts,
        })
    }

    /// The API base URL (ends with `/api/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments (e.g. `["network-connections", "nc-1"]`) to
    /// the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside an id
    /// stays part of that id. Empty, `.` and `..` segments are refused.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(Error::InvalidId((*bad).to_owned()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Core request ─────────────────────────────────────────────────

    /// Send one request and return the raw body on 200/202.
    ///
    /// Any other status becomes [`Error::Http`] with the body verbatim.
    pub async fn execute<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("{method} {url} params={query:?}");

        let mut req = self.http.request(method.clone(), url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(timeout) = self.timeouts.for_method(&method) {
            req = req.timeout(timeout);
        }
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(|e| Error::Deserialization {
                message: format!("request body: {e}"),
                body: String::new(),
            })?;
            req = req.body(payload);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status == StatusCode::OK || status == StatusCode::ACCEPTED {
            Ok(text)
        } else {
            debug!(status = status.as_u16(), "request failed");
            Err(Error::Http {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let body = self
            .execute::<()>(Method::GET, path, query, None)
            .await?;
        decode(&body)
    }

    /// POST a single-element array (the server's batch create convention)
    /// and return the id of the created object.
    pub(crate) async fn post_one<B: Serialize + Sync>(
        &self,
        path: &[&str],
        item: &B,
    ) -> Result<String, Error> {
        let body = self
            .execute(Method::POST, path, &[], Some(&[item]))
            .await?;
        let created: Vec<Created> = decode(&body)?;
        created_id(created.first())
    }

    pub(crate) async fn put<B: Serialize + Sync>(&self, path: &[&str], body: &B) -> Result<(), Error> {
        self.execute(Method::PUT, path, &[], Some(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &[&str]) -> Result<(), Error> {
        self.execute::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

// ── Response handling ────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

fn created_id(created: Option<&Created>) -> Result<String, Error> {
    let created = created.ok_or_else(|| Error::Protocol("create response is empty".into()))?;
    if let Some(href) = created.href.as_deref() {
        if let Some(id) = id_from_href(href) {
            return Ok(id.to_owned());
        }
    }
    created
        .id
        .clone()
        .ok_or_else(|| Error::Protocol("create response has no href".into()))
}
