// ── Standalone connection endpoint ──

use async_trait::async_trait;
use ipm_api::types::EndpointUpdate;
use tracing::info;

use super::{Reconciler, deleted, read_back, required, split_import};
use crate::convert::{endpoint_create, project_nc_endpoint};
use crate::error::CoreError;
use crate::model::NcEndpoint;
use crate::session::Session;

const ENTITY: &str = "connection endpoint";

pub struct EndpointReconciler;

impl EndpointReconciler {
    async fn fetch(
        session: &Session,
        plan: &NcEndpoint,
        connection_id: &str,
        id: &str,
        attempts: u32,
    ) -> Result<NcEndpoint, CoreError> {
        let client = session.client();
        let server = session
            .settings()
            .connection_retry(attempts)
            .run("endpoint read", |_| async move {
                client
                    .get_endpoint(connection_id, id)
                    .await
                    .map_err(CoreError::from)
            })
            .await?;
        Ok(project_nc_endpoint(plan, &server))
    }
}

#[async_trait]
impl Reconciler for EndpointReconciler {
    type Model = NcEndpoint;

    fn validate(&self, plan: &NcEndpoint) -> Result<(), CoreError> {
        plan.selector.validate()
    }

    async fn create(&self, session: &Session, plan: &NcEndpoint) -> Result<NcEndpoint, CoreError> {
        let connection_id = required(&plan.nc_id, "nc_id")?;
        let body = endpoint_create(&plan.selector, &plan.capacity)?;
        let id = session.client().create_endpoint(connection_id, &body).await?;
        info!(connection_id, id = %id, "endpoint created");
        let attempts = session.settings().create_read_attempts;
        read_back(
            ENTITY,
            &id,
            Self::fetch(session, plan, connection_id, &id, attempts),
        )
        .await
    }

    async fn read(&self, session: &Session, prior: &NcEndpoint) -> Result<NcEndpoint, CoreError> {
        let connection_id = required(&prior.nc_id, "nc_id")?;
        let id = required(&prior.id, "endpoint id")?;
        let attempts = session.settings().read_attempts;
        Self::fetch(session, prior, connection_id, id, attempts).await
    }

    /// Only the capacity of an endpoint can change in place.
    async fn update(
        &self,
        session: &Session,
        plan: &NcEndpoint,
        prior: &NcEndpoint,
    ) -> Result<NcEndpoint, CoreError> {
        let connection_id = required(&prior.nc_id, "nc_id")?;
        let id = required(&prior.id, "endpoint id")?;
        if !plan.selector.is_empty() && plan.selector != prior.selector {
            return Err(CoreError::config(
                "the selector of an existing endpoint cannot change; replace the endpoint",
            ));
        }
        if let Some(&capacity) = plan.capacity.changed_from(&prior.capacity) {
            session
                .client()
                .update_endpoint(connection_id, id, &EndpointUpdate { capacity })
                .await?;
            info!(connection_id, id, capacity, "endpoint updated");
        }
        let attempts = session.settings().update_read_attempts;
        Self::fetch(session, plan, connection_id, id, attempts).await
    }

    async fn delete(&self, session: &Session, prior: &NcEndpoint) -> Result<(), CoreError> {
        let connection_id = required(&prior.nc_id, "nc_id")?;
        let id = required(&prior.id, "endpoint id")?;
        let result = session.client().delete_endpoint(connection_id, id).await;
        deleted(result, ENTITY, id)?;
        info!(connection_id, id, "endpoint deleted");
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<NcEndpoint, CoreError> {
        let (connection_id, id) = split_import(id, "{nc_id}/{id}")?;
        Ok(NcEndpoint::importing(connection_id, id))
    }
}
