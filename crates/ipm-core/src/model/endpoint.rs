// ── Endpoints ──
//
// An endpoint names one client interface through an interface selector.
// Connection endpoints appear both nested in `ipm_network_connection`
// and as the standalone `ipm_nc_endpoint` resource.

use serde::{Deserialize, Serialize};

use super::circuit::Ac;
use super::common::HostPort;
use super::selector::IfSelectorBlock;
use crate::attr::Attr;
use crate::schema::{AttrType, Attribute, SchemaType};

/// The module interface an endpoint resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleIf {
    pub module_id: Option<String>,
    pub module_name: Option<String>,
    pub module_mac: Option<String>,
    pub module_serial_number: Option<String>,
    pub client_if_aid: Option<String>,
    pub client_if_col_id: Option<i64>,
    pub client_if_port_speed: Option<i64>,
    pub current_role: Option<String>,
}

impl SchemaType for ModuleIf {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("module_id", AttrType::String),
            Attribute::computed("module_name", AttrType::String),
            Attribute::computed("module_mac", AttrType::String),
            Attribute::computed("module_serial_number", AttrType::String),
            Attribute::computed("client_if_aid", AttrType::String),
            Attribute::computed("client_if_col_id", AttrType::Int64),
            Attribute::computed("client_if_port_speed", AttrType::Int64),
            Attribute::computed("current_role", AttrType::String),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointState {
    pub host_port: Option<HostPort>,
    pub module_if: Option<ModuleIf>,
    pub capacity: Option<i64>,
    pub lifecycle_state: Option<String>,
}

impl SchemaType for EndpointState {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("host_port", AttrType::object::<HostPort>()),
            Attribute::computed("module_if", AttrType::object::<ModuleIf>()),
            Attribute::computed("capacity", AttrType::Int64),
            Attribute::computed("lifecycle_state", AttrType::String),
        ]
    }
}

/// One element of `ipm_network_connection.endpoints`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionEndpoint {
    pub id: Attr<String>,
    pub href: Attr<String>,
    pub selector: IfSelectorBlock,
    /// Gb/s.
    pub capacity: Attr<i64>,
    pub state: Attr<EndpointState>,
    pub acs: Vec<Ac>,
}

impl SchemaType for ConnectionEndpoint {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::required("selector", AttrType::object::<IfSelectorBlock>()),
            Attribute::optional_computed("capacity", AttrType::Int64),
            Attribute::computed("state", AttrType::object::<EndpointState>()),
            Attribute::computed("acs", AttrType::list_of::<Ac>()),
        ]
    }
}

/// `ipm_nc_endpoint`: an endpoint managed on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NcEndpoint {
    pub nc_id: Attr<String>,
    pub id: Attr<String>,
    pub href: Attr<String>,
    pub selector: IfSelectorBlock,
    pub capacity: Attr<i64>,
    pub state: Attr<EndpointState>,
    pub acs: Vec<Ac>,
}

impl NcEndpoint {
    pub fn importing(nc_id: &str, id: &str) -> Self {
        Self {
            nc_id: Attr::Known(nc_id.to_owned()),
            id: Attr::Known(id.to_owned()),
            href: Attr::Unknown,
            selector: IfSelectorBlock::default(),
            capacity: Attr::Unknown,
            state: Attr::Unknown,
            acs: Vec::new(),
        }
    }
}

impl SchemaType for NcEndpoint {
    fn attributes() -> Vec<Attribute> {
        let mut attrs = vec![Attribute::required("nc_id", AttrType::String)];
        attrs.extend(ConnectionEndpoint::attributes());
        attrs
    }
}
