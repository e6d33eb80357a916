// ── Constellation networks ──

use serde::{Deserialize, Serialize};

use super::common::LifecycleCause;
use super::module::ModuleConfig;
use crate::attr::Attr;
use crate::schema::{AttrType, Attribute, SchemaType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: Attr<String>,
    /// Hz.
    pub constellation_frequency: Attr<i64>,
    pub modulation: Attr<String>,
    pub tc_mode: Attr<bool>,
    pub topology: Attr<String>,
    pub managed_by: Attr<String>,
}

impl NetworkConfig {
    pub fn importing() -> Self {
        Self {
            name: Attr::Unknown,
            constellation_frequency: Attr::Unknown,
            modulation: Attr::Unknown,
            tc_mode: Attr::Unknown,
            topology: Attr::Unknown,
            managed_by: Attr::Unknown,
        }
    }
}

impl SchemaType for NetworkConfig {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("name", AttrType::String),
            Attribute::required("constellation_frequency", AttrType::Int64),
            Attribute::optional("modulation", AttrType::String),
            Attribute::optional("tc_mode", AttrType::Bool),
            Attribute::optional("topology", AttrType::String),
            Attribute::optional("managed_by", AttrType::String),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLink {
    pub source_module_id: Option<String>,
    pub destination_module_id: Option<String>,
    pub con_state: Option<String>,
    pub last_con_state_change: Option<String>,
}

impl SchemaType for ControlLink {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("source_module_id", AttrType::String),
            Attribute::computed("destination_module_id", AttrType::String),
            Attribute::computed("con_state", AttrType::String),
            Attribute::computed("last_con_state_change", AttrType::String),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailableService {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub maximum: Option<i64>,
    pub available: Option<i64>,
    pub used: Option<i64>,
}

impl SchemaType for AvailableService {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("type", AttrType::String),
            Attribute::computed("maximum", AttrType::Int64),
            Attribute::computed("available", AttrType::Int64),
            Attribute::computed("used", AttrType::Int64),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkState {
    pub name: Option<String>,
    pub constellation_frequency: Option<i64>,
    pub operating_frequency: Option<i64>,
    pub modulation: Option<String>,
    pub tc_mode: Option<bool>,
    pub topology: Option<String>,
    pub managed_by: Option<String>,
    pub lifecycle_state: Option<String>,
    pub lifecycle_state_cause: Option<LifecycleCause>,
    pub control_links: Vec<ControlLink>,
    pub available_services: Vec<AvailableService>,
}

impl SchemaType for NetworkState {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("name", AttrType::String),
            Attribute::computed("constellation_frequency", AttrType::Int64),
            Attribute::computed("operating_frequency", AttrType::Int64),
            Attribute::computed("modulation", AttrType::String),
            Attribute::computed("tc_mode", AttrType::Bool),
            Attribute::computed("topology", AttrType::String),
            Attribute::computed("managed_by", AttrType::String),
            Attribute::computed("lifecycle_state", AttrType::String),
            Attribute::computed("lifecycle_state_cause", AttrType::object::<LifecycleCause>()),
            Attribute::computed("control_links", AttrType::list_of::<ControlLink>()),
            Attribute::computed("available_services", AttrType::list_of::<AvailableService>()),
        ]
    }
}

/// `ipm_constellation_network`: the network and its hub module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub id: Attr<String>,
    pub href: Attr<String>,
    pub config: NetworkConfig,
    pub hub_module: ModuleConfig,
    pub hub_module_id: Attr<String>,
    pub state: Attr<NetworkState>,
}

impl Network {
    pub fn importing(id: &str) -> Self {
        Self {
            id: Attr::Known(id.to_owned()),
            href: Attr::Unknown,
            config: NetworkConfig::importing(),
            hub_module: ModuleConfig::importing(),
            hub_module_id: Attr::Unknown,
            state: Attr::Unknown,
        }
    }
}

impl SchemaType for Network {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::required("config", AttrType::object::<NetworkConfig>()),
            Attribute::required("hub_module", AttrType::object::<ModuleConfig>()),
            Attribute::computed("hub_module_id", AttrType::String),
            Attribute::computed("state", AttrType::object::<NetworkState>()),
        ]
    }
}
