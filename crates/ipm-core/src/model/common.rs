// ── Shared computed blocks ──

use serde::{Deserialize, Serialize};

use crate::schema::{AttrType, Attribute, SchemaType};

/// LLDP view of the host port a module is plugged into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostPort {
    pub chassis_id_subtype: Option<String>,
    pub chassis_id: Option<String>,
    pub port_id_subtype: Option<String>,
    pub port_id: Option<String>,
    pub sys_name: Option<String>,
    pub port_descr: Option<String>,
    pub port_source_mac: Option<String>,
}

impl SchemaType for HostPort {
    fn attributes() -> Vec<Attribute> {
        [
            "chassis_id_subtype",
            "chassis_id",
            "port_id_subtype",
            "port_id",
            "sys_name",
            "port_descr",
            "port_source_mac",
        ]
        .into_iter()
        .map(|name| Attribute::computed(name, AttrType::String))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CauseError {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl SchemaType for CauseError {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("code", AttrType::String),
            Attribute::computed("message", AttrType::String),
        ]
    }
}

/// Why an object is in its current lifecycle state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleCause {
    pub action: Option<String>,
    pub timestamp: Option<String>,
    pub trace_id: Option<String>,
    pub errors: Vec<CauseError>,
}

impl SchemaType for LifecycleCause {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("action", AttrType::String),
            Attribute::computed("timestamp", AttrType::String),
            Attribute::computed("trace_id", AttrType::String),
            Attribute::computed("errors", AttrType::list_of::<CauseError>()),
        ]
    }
}
