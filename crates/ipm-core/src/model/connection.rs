// ── Network connections ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::circuit::Lc;
use super::common::LifecycleCause;
use super::endpoint::ConnectionEndpoint;
use crate::attr::Attr;
use crate::schema::{AttrType, Attribute, SchemaType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub name: Attr<String>,
    /// `XR-L1`, `XR-VTI-P2P` or `none`.
    pub service_mode: Attr<String>,
    pub mc: Attr<String>,
    /// VLAN range expression.
    pub outer_vid: Attr<String>,
    pub implicit_transport_capacity: Attr<String>,
    pub labels: Attr<BTreeMap<String, String>>,
}

impl ConnectionConfig {
    pub fn importing() -> Self {
        Self {
            name: Attr::Unknown,
            service_mode: Attr::Unknown,
            mc: Attr::Unknown,
            outer_vid: Attr::Unknown,
            implicit_transport_capacity: Attr::Unknown,
            labels: Attr::Unknown,
        }
    }
}

impl SchemaType for ConnectionConfig {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("name", AttrType::String),
            Attribute::required("service_mode", AttrType::String),
            Attribute::optional("mc", AttrType::String),
            Attribute::optional("outer_vid", AttrType::String),
            Attribute::optional("implicit_transport_capacity", AttrType::String),
            Attribute::optional("labels", AttrType::string_map()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionState {
    pub name: Option<String>,
    pub service_mode: Option<String>,
    pub mc: Option<String>,
    pub outer_vid: Option<String>,
    pub implicit_transport_capacity: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub lifecycle_state: Option<String>,
    pub operational_status: Option<String>,
    pub managed_by: Option<String>,
    pub lifecycle_state_cause: Option<LifecycleCause>,
}

impl SchemaType for ConnectionState {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("name", AttrType::String),
            Attribute::computed("service_mode", AttrType::String),
            Attribute::computed("mc", AttrType::String),
            Attribute::computed("outer_vid", AttrType::String),
            Attribute::computed("implicit_transport_capacity", AttrType::String),
            Attribute::computed("labels", AttrType::string_map()),
            Attribute::computed("lifecycle_state", AttrType::String),
            Attribute::computed("operational_status", AttrType::String),
            Attribute::computed("managed_by", AttrType::String),
            Attribute::computed("lifecycle_state_cause", AttrType::object::<LifecycleCause>()),
        ]
    }
}

/// `ipm_network_connection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConnection {
    pub id: Attr<String>,
    pub href: Attr<String>,
    pub config: ConnectionConfig,
    pub endpoints: Vec<ConnectionEndpoint>,
    pub state: Attr<ConnectionState>,
    pub lcs: Vec<Lc>,
}

impl NetworkConnection {
    pub fn importing(id: &str) -> Self {
        Self {
            id: Attr::Known(id.to_owned()),
            href: Attr::Unknown,
            config: ConnectionConfig::importing(),
            endpoints: Vec::new(),
            state: Attr::Unknown,
            lcs: Vec::new(),
        }
    }
}

impl SchemaType for NetworkConnection {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::required("config", AttrType::object::<ConnectionConfig>()),
            Attribute::required("endpoints", AttrType::list_of::<ConnectionEndpoint>()),
            Attribute::computed("state", AttrType::object::<ConnectionState>()),
            Attribute::computed("lcs", AttrType::list_of::<Lc>()),
        ]
    }
}
