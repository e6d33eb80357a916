// ── Modules ──
//
// Hub, leaf and reachable modules all live under a network. The hub is
// created with its network and can only be reconfigured; leaf modules
// have their own collection; reachable modules are discovered by the
// server and only ever read.

use async_trait::async_trait;
use tracing::info;

use super::{Reconciler, deleted, read_back, required, split_import};
use crate::convert::{project_module, project_reachable};
use crate::error::CoreError;
use crate::model::{Module, ReachableModule};
use crate::session::Session;

// ── Hub module ──────────────────────────────────────────────────────

pub struct HubModuleReconciler;

impl HubModuleReconciler {
    async fn fetch(session: &Session, plan: &Module, attempts: u32) -> Result<Module, CoreError> {
        let network_id = required(&plan.network_id, "network_id")?;
        let client = session.client();
        let server = session
            .settings()
            .network_retry(attempts)
            .run("hub module read", |_| async move {
                client.get_hub_module(network_id).await.map_err(CoreError::from)
            })
            .await?;
        Ok(project_module(plan, &server))
    }
}

#[async_trait]
impl Reconciler for HubModuleReconciler {
    type Model = Module;

    fn validate(&self, plan: &Module) -> Result<(), CoreError> {
        plan.config.selector.validate()
    }

    /// The hub exists once its network does; "create" applies the
    /// declared settings to it.
    async fn create(&self, session: &Session, plan: &Module) -> Result<Module, CoreError> {
        let network_id = required(&plan.network_id, "network_id")?;
        let body = plan.config.declared_update()?;
        session.client().update_hub_module(network_id, &body).await?;
        info!(network_id, "hub module configured");
        let attempts = session.settings().create_read_attempts;
        Self::fetch(session, plan, attempts).await
    }

    async fn read(&self, session: &Session, prior: &Module) -> Result<Module, CoreError> {
        Self::fetch(session, prior, session.settings().read_attempts).await
    }

    async fn update(
        &self,
        session: &Session,
        plan: &Module,
        prior: &Module,
    ) -> Result<Module, CoreError> {
        let network_id = required(&prior.network_id, "network_id")?;
        let body = plan.config.changes(&prior.config)?;
        if !body.is_empty() {
            session.client().update_hub_module(network_id, &body).await?;
            info!(network_id, "hub module updated");
        }
        Self::fetch(session, plan, session.settings().update_read_attempts).await
    }

    async fn delete(&self, _session: &Session, _prior: &Module) -> Result<(), CoreError> {
        Err(CoreError::config(
            "a hub module cannot be deleted on its own; it is removed together with its \
             ipm_constellation_network",
        ))
    }

    fn importing(&self, id: &str) -> Result<Module, CoreError> {
        Ok(Module::importing(id, None))
    }
}

// ── Leaf module ─────────────────────────────────────────────────────

const LEAF: &str = "leaf module";

pub struct LeafModuleReconciler;

impl LeafModuleReconciler {
    async fn fetch(
        session: &Session,
        plan: &Module,
        network_id: &str,
        id: &str,
        attempts: u32,
    ) -> Result<Module, CoreError> {
        let client = session.client();
        let server = session
            .settings()
            .network_retry(attempts)
            .run("leaf module read", |_| async move {
                client
                    .get_leaf_module(network_id, id)
                    .await
                    .map_err(CoreError::from)
            })
            .await?;
        Ok(project_module(plan, &server))
    }
}

#[async_trait]
impl Reconciler for LeafModuleReconciler {
    type Model = Module;

    fn validate(&self, plan: &Module) -> Result<(), CoreError> {
        plan.config.selector.validate()
    }

    async fn create(&self, session: &Session, plan: &Module) -> Result<Module, CoreError> {
        let network_id = required(&plan.network_id, "network_id")?;
        let body = plan.config.to_create()?;
        let id = session.client().create_leaf_module(network_id, &body).await?;
        info!(network_id, id = %id, "leaf module created");
        let attempts = session.settings().create_read_attempts;
        read_back(
            LEAF,
            &id,
            Self::fetch(session, plan, network_id, &id, attempts),
        )
        .await
    }

    async fn read(&self, session: &Session, prior: &Module) -> Result<Module, CoreError> {
        let network_id = required(&prior.network_id, "network_id")?;
        let id = required(&prior.id, "leaf module id")?;
        let attempts = session.settings().read_attempts;
        Self::fetch(session, prior, network_id, id, attempts).await
    }

    async fn update(
        &self,
        session: &Session,
        plan: &Module,
        prior: &Module,
    ) -> Result<Module, CoreError> {
        let network_id = required(&prior.network_id, "network_id")?;
        let id = required(&prior.id, "leaf module id")?;
        let body = plan.config.changes(&prior.config)?;
        if !body.is_empty() {
            session
                .client()
                .update_leaf_module(network_id, id, &body)
                .await?;
            info!(network_id, id, "leaf module updated");
        }
        let attempts = session.settings().update_read_attempts;
        Self::fetch(session, plan, network_id, id, attempts).await
    }

    async fn delete(&self, session: &Session, prior: &Module) -> Result<(), CoreError> {
        let network_id = required(&prior.network_id, "network_id")?;
        let id = required(&prior.id, "leaf module id")?;
        let result = session.client().delete_leaf_module(network_id, id).await;
        deleted(result, LEAF, id)?;
        info!(network_id, id, "leaf module deleted");
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<Module, CoreError> {
        let (network_id, id) = split_import(id, "{network_id}/{id}")?;
        Ok(Module::importing(network_id, Some(id)))
    }
}

// ── Reachable module ────────────────────────────────────────────────

/// Read-only: create and update only read, delete forgets.
pub struct ReachableModuleReconciler;

impl ReachableModuleReconciler {
    async fn fetch(
        session: &Session,
        plan: &ReachableModule,
    ) -> Result<ReachableModule, CoreError> {
        let network_id = required(&plan.network_id, "network_id")?;
        let id = required(&plan.id, "reachable module id")?;
        let client = session.client();
        let server = session
            .settings()
            .network_retry(session.settings().read_attempts)
            .run("reachable module read", |_| async move {
                client
                    .get_reachable_module(network_id, id)
                    .await
                    .map_err(CoreError::from)
            })
            .await?;
        Ok(project_reachable(plan, &server))
    }
}

#[async_trait]
impl Reconciler for ReachableModuleReconciler {
    type Model = ReachableModule;

    async fn create(
        &self,
        session: &Session,
        plan: &ReachableModule,
    ) -> Result<ReachableModule, CoreError> {
        Self::fetch(session, plan).await
    }

    async fn read(
        &self,
        session: &Session,
        prior: &ReachableModule,
    ) -> Result<ReachableModule, CoreError> {
        Self::fetch(session, prior).await
    }

    async fn update(
        &self,
        session: &Session,
        plan: &ReachableModule,
        _prior: &ReachableModule,
    ) -> Result<ReachableModule, CoreError> {
        Self::fetch(session, plan).await
    }

    async fn delete(&self, _session: &Session, _prior: &ReachableModule) -> Result<(), CoreError> {
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<ReachableModule, CoreError> {
        let (network_id, id) = split_import(id, "{network_id}/{id}")?;
        Ok(ReachableModule::importing(network_id, id))
    }
}
