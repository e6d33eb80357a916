use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, fetch};
use crate::attr::Attr;
use crate::convert::project_capacity;
use crate::error::CoreError;
use crate::model::TransportCapacity;
use crate::schema::{AttrType, Attribute, SchemaType};
use crate::session::Session;

// ── ipm_transport_capacities ────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitiesData {
    pub id: Attr<String>,
    pub capacities: Vec<TransportCapacity>,
}

impl SchemaType for CapacitiesData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("id", AttrType::String),
            Attribute::computed("capacities", AttrType::list_of::<TransportCapacity>()),
        ]
    }
}

pub struct TransportCapacities;

#[async_trait]
impl DataSource for TransportCapacities {
    type Model = CapacitiesData;

    async fn read(
        &self,
        session: &Session,
        query: CapacitiesData,
    ) -> Result<CapacitiesData, CoreError> {
        let client = session.client();
        let found = match query.id.as_deref() {
            Some(id) => vec![
                fetch(session, "transport capacity lookup", |_| client.get_capacity(id)).await?,
            ],
            None => {
                fetch(session, "transport capacity list", |_| {
                    client.list_capacities(None)
                })
                .await?
            }
        };
        let template = TransportCapacity::importing("");
        let capacities = found
            .iter()
            .map(|tc| project_capacity(&template, tc))
            .collect();
        Ok(CapacitiesData {
            capacities,
            ..query
        })
    }
}
