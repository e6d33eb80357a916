// ── Data sources ──
//
// Read-only lookups. A data source takes its input attributes, queries
// the server and returns the same document with the result attributes
// filled in. `DataSource` is the typed form; `DataHandler` the JSON form
// the registry dispatches to.

mod capacities;
mod circuits;
mod connections;
mod modules;
mod networks;

pub use capacities::{CapacitiesData, TransportCapacities};
pub use circuits::{Acs, AcsData, Lcs, LcsData};
pub use connections::{
    EndpointQuery, FoundConnections, FoundConnectionsData, NcEndpoints, NcEndpointsData,
    NetworkConnections, NetworkConnectionsData,
};
pub use modules::{
    HubModuleData, HubModuleLookup, LeafModules, LeafModulesData, ReachableModules,
    ReachableModulesData,
};
pub use networks::{FoundNetworks, FoundNetworksData, Networks, NetworksData};

use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;
use crate::reconcile::{parse, render};
use crate::schema::{Schema, SchemaType};
use crate::session::Session;

#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: SchemaType + Serialize + DeserializeOwned + Send + Sync;

    async fn read(&self, session: &Session, query: Self::Model) -> Result<Self::Model, CoreError>;
}

#[async_trait]
pub trait DataHandler: Send + Sync {
    fn schema(&self) -> Schema;

    async fn read(&self, session: &Session, query: Value) -> Result<Value, CoreError>;
}

/// JSON adapter over a typed data source.
pub struct Data<D>(pub D);

#[async_trait]
impl<D: DataSource> DataHandler for Data<D> {
    fn schema(&self) -> Schema {
        Schema::of::<D::Model>()
    }

    async fn read(&self, session: &Session, query: Value) -> Result<Value, CoreError> {
        let query: D::Model = parse("query", query)?;
        render(&self.0.read(session, query).await?)
    }
}

/// Read once with the session's plain read policy.
pub(crate) async fn fetch<T, Fut>(
    session: &Session,
    label: &str,
    mut op: impl FnMut(u32) -> Fut,
) -> Result<T, CoreError>
where
    Fut: Future<Output = Result<T, ipm_api::Error>>,
{
    session
        .settings()
        .network_retry(session.settings().read_attempts)
        .run(label, |attempt| {
            let fut = op(attempt);
            async move { fut.await.map_err(CoreError::from) }
        })
        .await
}
