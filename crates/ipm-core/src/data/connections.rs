use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, fetch};
use crate::attr::Attr;
use crate::convert::{project_connection, project_nc_endpoint};
use crate::error::CoreError;
use crate::filter::connection_filter;
use crate::model::{IfSelectorBlock, NcEndpoint, NetworkConnection};
use crate::reconcile::required;
use crate::schema::{AttrType, Attribute, SchemaType};
use crate::session::Session;

// ── ipm_network_connections ─────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConnectionsData {
    pub id: Attr<String>,
    pub connections: Vec<NetworkConnection>,
}

impl SchemaType for NetworkConnectionsData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("id", AttrType::String),
            Attribute::computed("connections", AttrType::list_of::<NetworkConnection>()),
        ]
    }
}

pub struct NetworkConnections;

#[async_trait]
impl DataSource for NetworkConnections {
    type Model = NetworkConnectionsData;

    async fn read(
        &self,
        session: &Session,
        query: NetworkConnectionsData,
    ) -> Result<NetworkConnectionsData, CoreError> {
        let client = session.client();
        let found = match query.id.as_deref() {
            Some(id) => vec![
                fetch(session, "connection lookup", |_| client.get_connection(id)).await?,
            ],
            None => fetch(session, "connection list", |_| client.list_connections(None)).await?,
        };
        let template = NetworkConnection::importing("");
        Ok(NetworkConnectionsData {
            connections: found.iter().map(|c| project_connection(&template, c)).collect(),
            ..query
        })
    }
}

// ── ipm_found_network_connections ───────────────────────────────────

/// One endpoint criterion of a connection search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointQuery {
    pub selector: IfSelectorBlock,
    pub capacity: Attr<i64>,
}

impl SchemaType for EndpointQuery {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("selector", AttrType::object::<IfSelectorBlock>()),
            Attribute::optional("capacity", AttrType::Int64),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundConnectionsData {
    pub service_mode: Attr<String>,
    pub endpoints: Vec<EndpointQuery>,
    pub connections: Vec<NetworkConnection>,
}

impl SchemaType for FoundConnectionsData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("service_mode", AttrType::String),
            Attribute::optional("endpoints", AttrType::list_of::<EndpointQuery>()),
            Attribute::computed("connections", AttrType::list_of::<NetworkConnection>()),
        ]
    }
}

/// Connections matching a service mode and endpoint selectors, through
/// the same filter builder the connection reconciler uses.
pub struct FoundConnections;

#[async_trait]
impl DataSource for FoundConnections {
    type Model = FoundConnectionsData;

    async fn read(
        &self,
        session: &Session,
        query: FoundConnectionsData,
    ) -> Result<FoundConnectionsData, CoreError> {
        let selectors = query
            .endpoints
            .iter()
            .enumerate()
            .map(|(i, ep)| {
                ep.selector
                    .require()
                    .map_err(|e| CoreError::config(format!("endpoints[{i}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let criteria: Vec<_> = selectors
            .iter()
            .zip(&query.endpoints)
            .map(|(sel, ep)| (sel, ep.capacity.known().copied()))
            .collect();
        let filter = connection_filter(query.service_mode.as_deref(), &criteria)?;

        let client = session.client();
        let found = fetch(session, "connection search", |_| {
            client.list_connections(Some(&filter))
        })
        .await?;

        let template = NetworkConnection::importing("");
        let connections = found.iter().map(|c| project_connection(&template, c)).collect();
        Ok(FoundConnectionsData {
            connections,
            ..query
        })
    }
}

// ── ipm_nc_endpoints ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NcEndpointsData {
    pub nc_id: Attr<String>,
    pub id: Attr<String>,
    pub endpoints: Vec<NcEndpoint>,
}

impl SchemaType for NcEndpointsData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("nc_id", AttrType::String),
            Attribute::optional("id", AttrType::String),
            Attribute::computed("endpoints", AttrType::list_of::<NcEndpoint>()),
        ]
    }
}

pub struct NcEndpoints;

#[async_trait]
impl DataSource for NcEndpoints {
    type Model = NcEndpointsData;

    async fn read(
        &self,
        session: &Session,
        query: NcEndpointsData,
    ) -> Result<NcEndpointsData, CoreError> {
        let nc_id = required(&query.nc_id, "nc_id")?;
        let client = session.client();
        let found = match query.id.as_deref() {
            Some(id) => vec![
                fetch(session, "endpoint lookup", |_| client.get_endpoint(nc_id, id)).await?,
            ],
            None => fetch(session, "endpoint list", |_| client.list_endpoints(nc_id)).await?,
        };
        let template = NcEndpoint::importing(nc_id, "");
        let endpoints = found
            .iter()
            .map(|ep| project_nc_endpoint(&template, ep))
            .collect();
        Ok(NcEndpointsData { endpoints, ..query })
    }
}
