// ── Transport capacity ──
//
// The precondition of every network connection. Endpoints are fixed at
// creation; only the config block can be updated.

use async_trait::async_trait;
use tracing::info;

use super::{Reconciler, deleted, read_back, required};
use crate::convert::{capacity_create, project_capacity};
use crate::error::CoreError;
use crate::model::TransportCapacity;
use crate::session::Session;

const ENTITY: &str = "transport capacity";

pub struct CapacityReconciler;

impl CapacityReconciler {
    async fn fetch(
        session: &Session,
        plan: &TransportCapacity,
        id: &str,
        attempts: u32,
    ) -> Result<TransportCapacity, CoreError> {
        let client = session.client();
        let server = session
            .settings()
            .connection_retry(attempts)
            .run("transport capacity read", |_| async move {
                client.get_capacity(id).await.map_err(CoreError::from)
            })
            .await?;
        Ok(project_capacity(plan, &server))
    }
}

#[async_trait]
impl Reconciler for CapacityReconciler {
    type Model = TransportCapacity;

    fn validate(&self, plan: &TransportCapacity) -> Result<(), CoreError> {
        plan.endpoints
            .iter()
            .enumerate()
            .try_for_each(|(i, ep)| {
                ep.selector
                    .validate()
                    .map_err(|e| CoreError::config(format!("endpoints[{i}]: {e}")))
            })
    }

    async fn create(
        &self,
        session: &Session,
        plan: &TransportCapacity,
    ) -> Result<TransportCapacity, CoreError> {
        let body = capacity_create(plan)?;
        let id = session.client().create_capacity(&body).await?;
        info!(id = %id, "transport capacity created");
        let attempts = session.settings().create_read_attempts;
        read_back(ENTITY, &id, Self::fetch(session, plan, &id, attempts)).await
    }

    async fn read(
        &self,
        session: &Session,
        prior: &TransportCapacity,
    ) -> Result<TransportCapacity, CoreError> {
        let id = required(&prior.id, "transport capacity id")?;
        Self::fetch(session, prior, id, session.settings().read_attempts).await
    }

    async fn update(
        &self,
        session: &Session,
        plan: &TransportCapacity,
        prior: &TransportCapacity,
    ) -> Result<TransportCapacity, CoreError> {
        let id = required(&prior.id, "transport capacity id")?;
        let moved = plan.endpoints.len() != prior.endpoints.len()
            || plan
                .endpoints
                .iter()
                .zip(&prior.endpoints)
                .any(|(p, o)| p.selector != o.selector);
        if moved {
            return Err(CoreError::Unsupported {
                operation: "changing the endpoints of a transport capacity".into(),
            });
        }
        let config = plan.config.changes(&prior.config);
        if !config.is_empty() {
            session.client().update_capacity(id, &config).await?;
            info!(id, "transport capacity updated");
        }
        Self::fetch(session, plan, id, session.settings().update_read_attempts).await
    }

    async fn delete(&self, session: &Session, prior: &TransportCapacity) -> Result<(), CoreError> {
        let id = required(&prior.id, "transport capacity id")?;
        deleted(session.client().delete_capacity(id).await, ENTITY, id)?;
        info!(id, "transport capacity deleted");
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<TransportCapacity, CoreError> {
        Ok(TransportCapacity::importing(id))
    }
}
