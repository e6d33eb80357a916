// ── Constellation network ──
//
// A network is created together with its hub module in a single POST.
// Update touches the network config and the hub module separately;
// both PUTs carry changed fields only.

use async_trait::async_trait;
use tracing::info;

use super::{Reconciler, deleted, read_back, required};
use crate::convert::{network_create, project_network};
use crate::error::CoreError;
use crate::model::Network;
use crate::session::Session;

const ENTITY: &str = "constellation network";

pub struct NetworkReconciler;

impl NetworkReconciler {
    async fn fetch(
        session: &Session,
        plan: &Network,
        id: &str,
        attempts: u32,
    ) -> Result<Network, CoreError> {
        let client = session.client();
        let server = session
            .settings()
            .network_retry(attempts)
            .run("network read", |_| async move {
                client.get_network(id).await.map_err(CoreError::from)
            })
            .await?;
        Ok(project_network(plan, &server))
    }
}

#[async_trait]
impl Reconciler for NetworkReconciler {
    type Model = Network;

    fn validate(&self, plan: &Network) -> Result<(), CoreError> {
        plan.hub_module.selector.validate()
    }

    async fn create(&self, session: &Session, plan: &Network) -> Result<Network, CoreError> {
        let body = network_create(plan)?;
        let id = session.client().create_network(&body).await?;
        info!(id = %id, "network created");
        let attempts = session.settings().create_read_attempts;
        read_back(ENTITY, &id, Self::fetch(session, plan, &id, attempts)).await
    }

    async fn read(&self, session: &Session, prior: &Network) -> Result<Network, CoreError> {
        let id = required(&prior.id, "network id")?;
        Self::fetch(session, prior, id, session.settings().read_attempts).await
    }

    async fn update(
        &self,
        session: &Session,
        plan: &Network,
        prior: &Network,
    ) -> Result<Network, CoreError> {
        let id = required(&prior.id, "network id")?;
        let client = session.client();

        let config = plan.config.changes(&prior.config);
        if !config.is_empty() {
            client.update_network(id, &config).await?;
        }
        let hub = plan.hub_module.changes(&prior.hub_module)?;
        if !hub.is_empty() {
            client.update_hub_module(id, &hub).await?;
        }
        info!(id, "network updated");

        Self::fetch(session, plan, id, session.settings().update_read_attempts).await
    }

    async fn delete(&self, session: &Session, prior: &Network) -> Result<(), CoreError> {
        let id = required(&prior.id, "network id")?;
        deleted(session.client().delete_network(id).await, ENTITY, id)?;
        info!(id, "network deleted");
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<Network, CoreError> {
        Ok(Network::importing(id))
    }
}
