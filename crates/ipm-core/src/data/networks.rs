use async_trait::async_trait;
use ipm_api::types as wire;
use serde::{Deserialize, Serialize};

use super::{DataSource, fetch};
use crate::attr::Attr;
use crate::convert::project_network;
use crate::error::CoreError;
use crate::filter::names_filter;
use crate::model::Network;
use crate::schema::{AttrType, Attribute, SchemaType};
use crate::session::Session;

fn observed(server: &wire::Network) -> Network {
    project_network(&Network::importing(""), server)
}

// ── ipm_networks ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworksData {
    pub id: Attr<String>,
    pub networks: Vec<Network>,
}

impl SchemaType for NetworksData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("id", AttrType::String),
            Attribute::computed("networks", AttrType::list_of::<Network>()),
        ]
    }
}

/// All networks, or the one named by `id`.
pub struct Networks;

#[async_trait]
impl DataSource for Networks {
    type Model = NetworksData;

    async fn read(&self, session: &Session, query: NetworksData) -> Result<NetworksData, CoreError> {
        let client = session.client();
        let networks = match query.id.as_deref() {
            Some(id) => vec![fetch(session, "network lookup", |_| client.get_network(id)).await?],
            None => fetch(session, "network list", |_| client.list_networks(None)).await?,
        };
        Ok(NetworksData {
            networks: networks.iter().map(observed).collect(),
            ..query
        })
    }
}

// ── ipm_found_networks ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundNetworksData {
    pub names: Vec<String>,
    pub networks: Vec<Network>,
}

impl SchemaType for FoundNetworksData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("names", AttrType::list(AttrType::String)),
            Attribute::computed("networks", AttrType::list_of::<Network>()),
        ]
    }
}

/// Networks whose configured name is one of `names`.
pub struct FoundNetworks;

#[async_trait]
impl DataSource for FoundNetworks {
    type Model = FoundNetworksData;

    async fn read(
        &self,
        session: &Session,
        query: FoundNetworksData,
    ) -> Result<FoundNetworksData, CoreError> {
        if query.names.is_empty() {
            return Err(CoreError::config("names must list at least one network name"));
        }
        let filter = names_filter(&query.names);
        let client = session.client();
        let networks = fetch(session, "network search", |_| {
            client.list_networks(Some(&filter))
        })
        .await?;
        Ok(FoundNetworksData {
            networks: networks.iter().map(observed).collect(),
            ..query
        })
    }
}
