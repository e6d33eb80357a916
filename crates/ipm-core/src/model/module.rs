// ── Hub and leaf modules ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::HostPort;
use super::selector::ModuleSelectorBlock;
use crate::attr::Attr;
use crate::schema::{AttrType, Attribute, SchemaType};

/// Declared transceiver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
    pub planned_capacity: Attr<String>,
    pub traffic_mode: Attr<String>,
    pub fiber_connection_mode: Attr<String>,
    pub fec_iterations: Attr<String>,
    pub requested_nominal_psd_offset: Attr<String>,
    pub tx_clp_target: Attr<i64>,
    pub max_dscs: Attr<i64>,
    pub max_tx_dscs: Attr<i64>,
}

impl ModuleSettings {
    pub fn importing() -> Self {
        Self {
            planned_capacity: Attr::Unknown,
            traffic_mode: Attr::Unknown,
            fiber_connection_mode: Attr::Unknown,
            fec_iterations: Attr::Unknown,
            requested_nominal_psd_offset: Attr::Unknown,
            tx_clp_target: Attr::Unknown,
            max_dscs: Attr::Unknown,
            max_tx_dscs: Attr::Unknown,
        }
    }
}

impl SchemaType for ModuleSettings {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("planned_capacity", AttrType::String),
            Attribute::optional("traffic_mode", AttrType::String),
            Attribute::optional("fiber_connection_mode", AttrType::String),
            Attribute::optional("fec_iterations", AttrType::String),
            Attribute::optional("requested_nominal_psd_offset", AttrType::String),
            Attribute::optional("tx_clp_target", AttrType::Int64),
            Attribute::optional("max_dscs", AttrType::Int64),
            Attribute::optional("max_tx_dscs", AttrType::Int64),
        ]
    }
}

/// Declared module configuration: which module, and how to set it up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    pub selector: ModuleSelectorBlock,
    pub module: ModuleSettings,
    pub managed_by: Attr<String>,
}

impl ModuleConfig {
    pub fn importing() -> Self {
        Self {
            selector: ModuleSelectorBlock::default(),
            module: ModuleSettings::importing(),
            managed_by: Attr::Unknown,
        }
    }
}

impl SchemaType for ModuleConfig {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("selector", AttrType::object::<ModuleSelectorBlock>()),
            Attribute::optional("module", AttrType::object::<ModuleSettings>()),
            Attribute::optional("managed_by", AttrType::String),
        ]
    }
}

/// Operational view of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleState {
    pub module_id: Option<String>,
    pub module_name: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub current_role: Option<String>,
    pub configured_role: Option<String>,
    pub role_status: Option<String>,
    pub traffic_mode: Option<String>,
    pub fiber_connection_mode: Option<String>,
    pub fec_iterations: Option<String>,
    pub planned_capacity: Option<String>,
    pub requested_nominal_psd_offset: Option<String>,
    pub actual_constellation_frequency: Option<i64>,
    pub operating_modulation: Option<String>,
    pub baud_rate: Option<i64>,
    pub tx_clp_target: Option<i64>,
    pub max_dscs: Option<i64>,
    pub max_tx_dscs: Option<i64>,
    pub capabilities: Option<BTreeMap<String, String>>,
    pub host_port: Option<HostPort>,
    pub lifecycle_state: Option<String>,
    pub managed_by: Option<String>,
}

impl SchemaType for ModuleState {
    fn attributes() -> Vec<Attribute> {
        let text = |name| Attribute::computed(name, AttrType::String);
        let int = |name| Attribute::computed(name, AttrType::Int64);
        vec![
            text("module_id"),
            text("module_name"),
            text("mac_address"),
            text("serial_number"),
            text("current_role"),
            text("configured_role"),
            text("role_status"),
            text("traffic_mode"),
            text("fiber_connection_mode"),
            text("fec_iterations"),
            text("planned_capacity"),
            text("requested_nominal_psd_offset"),
            int("actual_constellation_frequency"),
            text("operating_modulation"),
            int("baud_rate"),
            int("tx_clp_target"),
            int("max_dscs"),
            int("max_tx_dscs"),
            Attribute::computed("capabilities", AttrType::string_map()),
            Attribute::computed("host_port", AttrType::object::<HostPort>()),
            text("lifecycle_state"),
            text("managed_by"),
        ]
    }
}

/// `ipm_hub_module` and `ipm_leaf_module`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Module {
    pub network_id: Attr<String>,
    pub id: Attr<String>,
    pub href: Attr<String>,
    pub config: ModuleConfig,
    pub state: Attr<ModuleState>,
}

impl Module {
    pub fn importing(network_id: &str, id: Option<&str>) -> Self {
        Self {
            network_id: Attr::Known(network_id.to_owned()),
            id: id.map_or(Attr::Unknown, |id| Attr::Known(id.to_owned())),
            href: Attr::Unknown,
            config: ModuleConfig::importing(),
            state: Attr::Unknown,
        }
    }
}

impl SchemaType for Module {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("network_id", AttrType::String),
            Attribute::computed("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::required("config", AttrType::object::<ModuleConfig>()),
            Attribute::computed("state", AttrType::object::<ModuleState>()),
        ]
    }
}
