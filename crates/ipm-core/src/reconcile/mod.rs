// ── Reconcilers ──
//
// Every resource type implements the same contract against the host:
// create, read, update, delete and import. `Reconciler` is the typed
// form working on schema models; `ResourceHandler` is the JSON form the
// registry dispatches to. `Resource<R>` adapts one to the other and owns
// the seam rules: plans are parsed leniently into models, a read that
// finds nothing reports "gone" instead of an error.

mod capacity;
mod circuit;
mod connection;
mod endpoint;
mod module;
mod network;

pub use capacity::CapacityReconciler;
pub use circuit::{AcReconciler, LcReconciler};
pub use connection::{ConnectionReconciler, MembershipDiff, membership_diff};
pub use endpoint::EndpointReconciler;
pub use module::{HubModuleReconciler, LeafModuleReconciler, ReachableModuleReconciler};
pub use network::NetworkReconciler;

use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::attr::Attr;
use crate::error::{CoreError, Diagnostic};
use crate::schema::{Schema, SchemaType};
use crate::session::Session;

// ── Typed contract ──────────────────────────────────────────────────

#[async_trait]
pub trait Reconciler: Send + Sync {
    type Model: SchemaType + Serialize + DeserializeOwned + Send + Sync;

    /// Plan checks that need no server round-trip.
    fn validate(&self, _plan: &Self::Model) -> Result<(), CoreError> {
        Ok(())
    }

    async fn create(&self, session: &Session, plan: &Self::Model)
    -> Result<Self::Model, CoreError>;

    /// Refresh `prior` from the server. A missing object is an error for
    /// which `CoreError::is_not_found` holds.
    async fn read(&self, session: &Session, prior: &Self::Model)
    -> Result<Self::Model, CoreError>;

    async fn update(
        &self,
        session: &Session,
        plan: &Self::Model,
        prior: &Self::Model,
    ) -> Result<Self::Model, CoreError>;

    async fn delete(&self, session: &Session, prior: &Self::Model) -> Result<(), CoreError>;

    /// The read template for an import id: addressing attributes known,
    /// everything else unknown so the server fills it in.
    fn importing(&self, id: &str) -> Result<Self::Model, CoreError>;
}

// ── JSON contract ───────────────────────────────────────────────────

#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn schema(&self) -> Schema;

    fn validate(&self, config: &Value) -> Vec<Diagnostic>;

    async fn create(&self, session: &Session, plan: Value) -> Result<Value, CoreError>;

    /// `Ok(None)` when the object no longer exists.
    async fn read(&self, session: &Session, prior: Value) -> Result<Option<Value>, CoreError>;

    async fn update(&self, session: &Session, plan: Value, prior: Value)
    -> Result<Value, CoreError>;

    async fn delete(&self, session: &Session, prior: Value) -> Result<(), CoreError>;

    async fn import(&self, session: &Session, id: &str) -> Result<Value, CoreError>;
}

/// JSON adapter over a typed reconciler.
pub struct Resource<R>(pub R);

pub(crate) fn parse<T: DeserializeOwned>(what: &str, value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::config(format!("invalid {what}: {e}")))
}

pub(crate) fn render<T: Serialize>(model: &T) -> Result<Value, CoreError> {
    serde_json::to_value(model).map_err(|e| CoreError::protocol(format!("state: {e}")))
}

#[async_trait]
impl<R: Reconciler> ResourceHandler for Resource<R> {
    fn schema(&self) -> Schema {
        Schema::of::<R::Model>()
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let result = parse::<R::Model>("configuration", config.clone())
            .and_then(|plan| self.0.validate(&plan));
        match result {
            Ok(()) => Vec::new(),
            Err(e) => vec![Diagnostic::from(&e)],
        }
    }

    async fn create(&self, session: &Session, plan: Value) -> Result<Value, CoreError> {
        let plan: R::Model = parse("plan", plan)?;
        self.0.validate(&plan)?;
        render(&self.0.create(session, &plan).await?)
    }

    async fn read(&self, session: &Session, prior: Value) -> Result<Option<Value>, CoreError> {
        let prior: R::Model = parse("prior state", prior)?;
        match self.0.read(session, &prior).await {
            Ok(state) => render(&state).map(Some),
            Err(e) if e.is_not_found() => {
                debug!(error = %e, "object is gone");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        session: &Session,
        plan: Value,
        prior: Value,
    ) -> Result<Value, CoreError> {
        let plan: R::Model = parse("plan", plan)?;
        let prior: R::Model = parse("prior state", prior)?;
        self.0.validate(&plan)?;
        render(&self.0.update(session, &plan, &prior).await?)
    }

    async fn delete(&self, session: &Session, prior: Value) -> Result<(), CoreError> {
        let prior: R::Model = parse("prior state", prior)?;
        self.0.delete(session, &prior).await
    }

    async fn import(&self, session: &Session, id: &str) -> Result<Value, CoreError> {
        let template = self.0.importing(id)?;
        render(&self.0.read(session, &template).await?)
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

/// The known value of an addressing attribute.
pub(crate) fn required<'a>(attr: &'a Attr<String>, what: &str) -> Result<&'a str, CoreError> {
    attr.as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::config(format!("{what} is required")))
}

/// Split a `{parent}/{id}` import id.
pub(crate) fn split_import<'a>(id: &'a str, shape: &str) -> Result<(&'a str, &'a str), CoreError> {
    match id.split_once('/') {
        Some((parent, child)) if !parent.is_empty() && !child.is_empty() && !child.contains('/') => {
            Ok((parent, child))
        }
        _ => Err(CoreError::config(format!(
            "import id `{id}` must have the form {shape}"
        ))),
    }
}

/// Run a post-create read-back; a failure names the created object.
pub(crate) async fn read_back<T>(
    entity: &'static str,
    id: &str,
    fut: impl Future<Output = Result<T, CoreError>>,
) -> Result<T, CoreError> {
    fut.await.map_err(|source| CoreError::ReadBack {
        entity,
        id: id.to_owned(),
        source: Box::new(source),
    })
}

/// A DELETE of an object that is already gone succeeds.
pub(crate) fn deleted(result: Result<(), ipm_api::Error>, entity: &str, id: &str) -> Result<(), CoreError> {
    match result.map_err(CoreError::from) {
        Err(e) if e.is_not_found() => {
            debug!(entity, id, "already deleted");
            Ok(())
        }
        other => other,
    }
}
