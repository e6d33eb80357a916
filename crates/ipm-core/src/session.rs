// ── Session ──
//
// An authenticated client plus reconcile timing. Every reconciler and
// data source receives the session by reference; nothing else is shared
// between concurrent operations.

use std::sync::Arc;

use ipm_api::IpmClient;
use tracing::info;

use crate::config::ProviderConfig;
use crate::error::CoreError;
use crate::settings::ReconcileSettings;

/// Cheaply cloneable via `Arc<SessionInner>`.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    client: IpmClient,
    settings: ReconcileSettings,
}

impl Session {
    pub fn new(client: IpmClient, settings: ReconcileSettings) -> Self {
        Self {
            inner: Arc::new(SessionInner { client, settings }),
        }
    }

    /// Sign in and build a session. A refused sign-in is an `Auth` error.
    pub async fn connect(config: &ProviderConfig) -> Result<Self, CoreError> {
        let client =
            IpmClient::connect(&config.host, &config.credentials(), &config.transport()).await?;
        info!(host = %config.host, user = %config.username, "signed in");
        Ok(Self::new(client, config.settings))
    }

    pub fn client(&self) -> &IpmClient {
        &self.inner.client
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.inner.settings
    }
}
