// Constellation network endpoints
//
// `/xr-networks` plus the hub, leaf and reachable module collections
// nested under each network.

use crate::client::{EXPANDED, IpmClient};
use crate::error::Error;
use crate::types::{
    Module, ModuleCreate, ModuleUpdate, Network, NetworkConfig, NetworkCreate, ReachableModule,
};

impl IpmClient {
    // ── Networks ─────────────────────────────────────────────────────

    pub async fn create_network(&self, body: &NetworkCreate) -> Result<String, Error> {
        self.post_one(&["xr-networks"], body).await
    }

    pub async fn get_network(&self, id: &str) -> Result<Network, Error> {
        self.get(&["xr-networks", id], &[EXPANDED]).await
    }

    /// List networks, optionally narrowed by a server-side filter expression.
    pub async fn list_networks(&self, filter: Option<&str>) -> Result<Vec<Network>, Error> {
        match filter {
            Some(q) => self.get(&["xr-networks"], &[EXPANDED, ("q", q)]).await,
            None => self.get(&["xr-networks"], &[EXPANDED]).await,
        }
    }

    pub async fn update_network(&self, id: &str, body: &NetworkConfig) -> Result<(), Error> {
        self.put(&["xr-networks", id], body).await
    }

    pub async fn delete_network(&self, id: &str) -> Result<(), Error> {
        self.delete(&["xr-networks", id]).await
    }

    // ── Hub module ───────────────────────────────────────────────────

    pub async fn get_hub_module(&self, network_id: &str) -> Result<Module, Error> {
        self.get(&["xr-networks", network_id, "hubModule"], &[])
            .await
    }

    pub async fn update_hub_module(
        &self,
        network_id: &str,
        body: &ModuleUpdate,
    ) -> Result<(), Error> {
        self.put(&["xr-networks", network_id, "hubModule"], body)
            .await
    }

    // ── Leaf modules ─────────────────────────────────────────────────

    pub async fn create_leaf_module(
        &self,
        network_id: &str,
        body: &ModuleCreate,
    ) -> Result<String, Error> {
        self.post_one(&["xr-networks", network_id, "leafModules"], body)
            .await
    }

    pub async fn get_leaf_module(&self, network_id: &str, id: &str) -> Result<Module, Error> {
        self.get(&["xr-networks", network_id, "leafModules", id], &[])
            .await
    }

    pub async fn list_leaf_modules(&self, network_id: &str) -> Result<Vec<Module>, Error> {
        self.get(&["xr-networks", network_id, "leafModules"], &[])
            .await
    }

    pub async fn update_leaf_module(
        &self,
        network_id: &str,
        id: &str,
        body: &ModuleUpdate,
    ) -> Result<(), Error> {
        self.put(&["xr-networks", network_id, "leafModules", id], body)
            .await
    }

    pub async fn delete_leaf_module(&self, network_id: &str, id: &str) -> Result<(), Error> {
        self.delete(&["xr-networks", network_id, "leafModules", id])
            .await
    }

    // ── Reachable modules ────────────────────────────────────────────

    pub async fn get_reachable_module(
        &self,
        network_id: &str,
        id: &str,
    ) -> Result<ReachableModule, Error> {
        self.get(
            &["xr-networks", network_id, "reachableModules", id],
            &[],
        )
        .await
    }

    pub async fn list_reachable_modules(
        &self,
        network_id: &str,
    ) -> Result<Vec<ReachableModule>, Error> {
        self.get(&["xr-networks", network_id, "reachableModules"], &[])
            .await
    }
}
