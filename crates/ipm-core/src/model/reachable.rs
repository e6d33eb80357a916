// ── Reachable modules ──
//
// Discovered on the constellation medium; there is nothing to configure.

use serde::{Deserialize, Serialize};

use super::common::HostPort;
use super::module::ModuleState;
use crate::attr::Attr;
use crate::schema::{AttrType, Attribute, SchemaType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachableState {
    pub discovered_time: Option<String>,
    pub module: Option<ModuleState>,
    pub endpoints: Vec<HostPort>,
}

impl SchemaType for ReachableState {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("discovered_time", AttrType::String),
            Attribute::computed("module", AttrType::object::<ModuleState>()),
            Attribute::computed("endpoints", AttrType::list_of::<HostPort>()),
        ]
    }
}

/// `ipm_reachable_module`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachableModule {
    pub network_id: Attr<String>,
    pub id: Attr<String>,
    pub href: Attr<String>,
    pub state: Attr<ReachableState>,
}

impl ReachableModule {
    pub fn importing(network_id: &str, id: &str) -> Self {
        Self {
            network_id: Attr::Known(network_id.to_owned()),
            id: Attr::Known(id.to_owned()),
            href: Attr::Unknown,
            state: Attr::Unknown,
        }
    }
}

impl SchemaType for ReachableModule {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("network_id", AttrType::String),
            Attribute::required("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::computed("state", AttrType::object::<ReachableState>()),
        ]
    }
}
