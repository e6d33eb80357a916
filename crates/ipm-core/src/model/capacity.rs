// ── Transport capacities ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::LifecycleCause;
use super::endpoint::EndpointState;
use super::selector::IfSelectorBlock;
use crate::attr::Attr;
use crate::schema::{AttrType, Attribute, SchemaType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub name: Attr<String>,
    pub capacity_mode: Attr<String>,
    pub labels: Attr<BTreeMap<String, String>>,
}

impl CapacityConfig {
    pub fn importing() -> Self {
        Self {
            name: Attr::Unknown,
            capacity_mode: Attr::Unknown,
            labels: Attr::Unknown,
        }
    }
}

impl SchemaType for CapacityConfig {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("name", AttrType::String),
            Attribute::optional("capacity_mode", AttrType::String),
            Attribute::optional("labels", AttrType::string_map()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityEndpoint {
    pub selector: IfSelectorBlock,
    pub capacity: Attr<i64>,
    pub state: Attr<EndpointState>,
}

impl SchemaType for CapacityEndpoint {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("selector", AttrType::object::<IfSelectorBlock>()),
            Attribute::optional_computed("capacity", AttrType::Int64),
            Attribute::computed("state", AttrType::object::<EndpointState>()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityState {
    pub name: Option<String>,
    pub capacity_mode: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub lifecycle_state: Option<String>,
    pub lifecycle_state_cause: Option<LifecycleCause>,
}

impl SchemaType for CapacityState {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("name", AttrType::String),
            Attribute::computed("capacity_mode", AttrType::String),
            Attribute::computed("labels", AttrType::string_map()),
            Attribute::computed("lifecycle_state", AttrType::String),
            Attribute::computed("lifecycle_state_cause", AttrType::object::<LifecycleCause>()),
        ]
    }
}

/// `ipm_transport_capacity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportCapacity {
    pub id: Attr<String>,
    pub href: Attr<String>,
    pub config: CapacityConfig,
    pub endpoints: Vec<CapacityEndpoint>,
    pub state: Attr<CapacityState>,
}

impl TransportCapacity {
    pub fn importing(id: &str) -> Self {
        Self {
            id: Attr::Known(id.to_owned()),
            href: Attr::Unknown,
            config: CapacityConfig::importing(),
            endpoints: Vec::new(),
            state: Attr::Unknown,
        }
    }
}

impl SchemaType for TransportCapacity {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::required("config", AttrType::object::<CapacityConfig>()),
            Attribute::required("endpoints", AttrType::list_of::<CapacityEndpoint>()),
            Attribute::computed("state", AttrType::object::<CapacityState>()),
        ]
    }
}
