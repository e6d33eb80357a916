// Network connection endpoints
//
// `/network-connections` and the endpoint collection under each
// connection. Creates take the server's array body; callers pass one item.

use crate::client::{EXPANDED, IpmClient};
use crate::error::Error;
use crate::types::{
    ConnectionConfig, ConnectionCreate, Endpoint, EndpointCreate, EndpointUpdate,
    NetworkConnection,
};

impl IpmClient {
    // ── Connections ──────────────────────────────────────────────────

    pub async fn create_connection(&self, body: &ConnectionCreate) -> Result<String, Error> {
        self.post_one(&["network-connections"], body).await
    }

    pub async fn get_connection(&self, id: &str) -> Result<NetworkConnection, Error> {
        self.get(&["network-connections", id], &[EXPANDED])
            .await
    }

    /// List connections, optionally narrowed by a server-side filter expression.
    pub async fn list_connections(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<NetworkConnection>, Error> {
        match filter {
            Some(q) => {
                self.get(&["network-connections"], &[EXPANDED, ("q", q)])
                    .await
            }
            None => self.get(&["network-connections"], &[EXPANDED]).await,
        }
    }

    pub async fn update_connection(&self, id: &str, body: &ConnectionConfig) -> Result<(), Error> {
        self.put(&["network-connections", id], body).await
    }

    pub async fn delete_connection(&self, id: &str) -> Result<(), Error> {
        self.delete(&["network-connections", id]).await
    }

    // ── Endpoints ────────────────────────────────────────────────────

    pub async fn create_endpoint(
        &self,
        connection_id: &str,
        body: &EndpointCreate,
    ) -> Result<String, Error> {
        self.post_one(
            &["network-connections", connection_id, "endpoints"],
            body,
        )
        .await
    }

    pub async fn get_endpoint(&self, connection_id: &str, id: &str) -> Result<Endpoint, Error> {
        self.get(
            &["network-connections", connection_id, "endpoints", id],
            &[EXPANDED],
        )
        .await
    }

    pub async fn list_endpoints(&self, connection_id: &str) -> Result<Vec<Endpoint>, Error> {
        self.get(
            &["network-connections", connection_id, "endpoints"],
            &[EXPANDED],
        )
        .await
    }

    pub async fn update_endpoint(
        &self,
        connection_id: &str,
        id: &str,
        body: &EndpointUpdate,
    ) -> Result<(), Error> {
        self.put(
            &["network-connections", connection_id, "endpoints", id],
            body,
        )
        .await
    }

    pub async fn delete_endpoint(&self, connection_id: &str, id: &str) -> Result<(), Error> {
        self.delete(&["network-connections", connection_id, "endpoints", id])
        .await
    }
}
