// Transport capacity endpoints.

use crate::client::{EXPANDED, IpmClient};
use crate::error::Error;
use crate::types::{CapacityConfig, CapacityCreate, TransportCapacity};

impl IpmClient {
    pub async fn create_capacity(&self, body: &CapacityCreate) -> Result<String, Error> {
        self.post_one(&["transport-capacities"], body).await
    }

    pub async fn get_capacity(&self, id: &str) -> Result<TransportCapacity, Error> {
        self.get(&["transport-capacities", id], &[EXPANDED])
            .await
    }

    /// List transport capacities, optionally narrowed by a filter expression.
    pub async fn list_capacities(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<TransportCapacity>, Error> {
        match filter {
            Some(q) => {
                self.get(&["transport-capacities"], &[EXPANDED, ("q", q)])
                    .await
            }
            None => self.get(&["transport-capacities"], &[EXPANDED]).await,
        }
    }

    pub async fn update_capacity(&self, id: &str, body: &CapacityConfig) -> Result<(), Error> {
        self.put(&["transport-capacities", id], body).await
    }

    pub async fn delete_capacity(&self, id: &str) -> Result<(), Error> {
        self.delete(&["transport-capacities", id]).await
    }
}
