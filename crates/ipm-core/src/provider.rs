// ── Provider facade ──
//
// The host-facing entry point: configure once (sign in), then dispatch
// resource and data-source operations by type name. Values cross this
// boundary as JSON documents in the schema shape.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::data::DataHandler;
use crate::error::{CoreError, Diagnostic};
use crate::reconcile::ResourceHandler;
use crate::registry::{ProviderSchema, Registry};
use crate::session::Session;

/// Cheaply cloneable; concurrent operations share only the session.
#[derive(Clone)]
pub struct Provider {
    session: Session,
    registry: Arc<Registry>,
}

impl Provider {
    /// Sign in with the provider block. Fails with an `Auth` error when
    /// the server refuses the credentials.
    pub async fn configure(config: &ProviderConfig) -> Result<Self, CoreError> {
        let session = Session::connect(config).await?;
        Ok(Self::with_session(session))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            registry: Arc::new(Registry::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn schema(&self) -> ProviderSchema {
        self.registry.schema()
    }

    fn resource(&self, type_name: &str) -> Result<&dyn ResourceHandler, CoreError> {
        self.registry
            .resource(type_name)
            .ok_or_else(|| CoreError::Unsupported {
                operation: format!("unknown resource type `{type_name}`"),
            })
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataHandler, CoreError> {
        self.registry
            .data_source(type_name)
            .ok_or_else(|| CoreError::Unsupported {
                operation: format!("unknown data source `{type_name}`"),
            })
    }

    // ── Resource operations ──────────────────────────────────────────

    pub fn validate(&self, type_name: &str, config: &Value) -> Vec<Diagnostic> {
        self.registry.validate(type_name, config)
    }

    pub async fn create(&self, type_name: &str, plan: Value) -> Result<Value, CoreError> {
        info!(type_name, "create");
        self.resource(type_name)?.create(&self.session, plan).await
    }

    /// `Ok(None)` when the object is gone and should leave state.
    pub async fn read(&self, type_name: &str, prior: Value) -> Result<Option<Value>, CoreError> {
        debug!(type_name, "read");
        self.resource(type_name)?.read(&self.session, prior).await
    }

    pub async fn update(
        &self,
        type_name: &str,
        plan: Value,
        prior: Value,
    ) -> Result<Value, CoreError> {
        info!(type_name, "update");
        self.resource(type_name)?
            .update(&self.session, plan, prior)
            .await
    }

    pub async fn delete(&self, type_name: &str, prior: Value) -> Result<(), CoreError> {
        info!(type_name, "delete");
        self.resource(type_name)?.delete(&self.session, prior).await
    }

    pub async fn import(&self, type_name: &str, id: &str) -> Result<Value, CoreError> {
        info!(type_name, id, "import");
        self.resource(type_name)?.import(&self.session, id).await
    }

    // ── Data sources ─────────────────────────────────────────────────

    pub async fn read_data(&self, type_name: &str, query: Value) -> Result<Value, CoreError> {
        debug!(type_name, "data source read");
        self.data_source(type_name)?.read(&self.session, query).await
    }
}
