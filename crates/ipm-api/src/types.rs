// ── Wire types for the IPM REST API ──
//
// Response shapes follow the server's `{id, href, parentId, config, state}`
// envelope. Every field is optional and defaulted: the server creates child
// objects asynchronously and an early GET may return a partial document.
// Field names are renamed per attribute; acronyms keep their upper case on
// the wire (`moduleMAC`, `maxDSCs`, `txCLPtarget`, `outerVID`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{lenient, opt_int64, opt_text};
use crate::selector::{InterfaceSelector, ModuleSelector};

// ── Common ──────────────────────────────────────────────────────────

/// One element of a create response: the new object's `href`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Created {
    pub id: Option<String>,
    pub href: Option<String>,
}

/// Server-assigned id: the last non-empty path segment of an `href`.
pub fn id_from_href(href: &str) -> Option<&str> {
    href.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifecycleStateCause {
    pub action: Option<String>,
    pub timestamp: Option<String>,
    pub trace_id: Option<String>,
    pub errors: Vec<CauseError>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CauseError {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostPort {
    pub chassis_id_subtype: Option<String>,
    pub chassis_id: Option<String>,
    pub port_id_subtype: Option<String>,
    pub port_id: Option<String>,
    pub sys_name: Option<String>,
    pub port_descr: Option<String>,
    #[serde(rename = "portSourceMAC")]
    pub port_source_mac: Option<String>,
}

// ── Networks ────────────────────────────────────────────────────────

/// Declared network settings. Doubles as the partial PUT body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_int64"
    )]
    pub constellation_frequency: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modulation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tc_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

impl NetworkConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkState {
    pub name: Option<String>,
    #[serde(deserialize_with = "opt_int64")]
    pub constellation_frequency: Option<i64>,
    #[serde(deserialize_with = "opt_int64")]
    pub operating_frequency: Option<i64>,
    pub modulation: Option<String>,
    pub tc_mode: Option<bool>,
    pub topology: Option<String>,
    pub managed_by: Option<String>,
    pub lifecycle_state: Option<String>,
    pub lifecycle_state_cause: Option<LifecycleStateCause>,
    pub control_links: Vec<ControlLink>,
    pub available_services: Vec<AvailableService>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlLink {
    pub source_module_id: Option<String>,
    pub destination_module_id: Option<String>,
    pub con_state: Option<String>,
    pub last_con_state_change: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvailableService {
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    #[serde(deserialize_with = "opt_int64")]
    pub maximum: Option<i64>,
    #[serde(deserialize_with = "opt_int64")]
    pub available: Option<i64>,
    #[serde(deserialize_with = "opt_int64")]
    pub used: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Network {
    pub id: Option<String>,
    pub href: Option<String>,
    pub config: Option<NetworkConfig>,
    pub state: Option<NetworkState>,
    pub hub_module: Option<Module>,
    pub leaf_modules: Vec<Module>,
    pub reachable_modules: Vec<ReachableModule>,
}

/// POST `/xr-networks` element: network settings plus its hub module.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkCreate {
    #[serde(flatten)]
    pub config: NetworkConfig,
    pub hub_module: ModuleCreate,
}

// ── Modules ─────────────────────────────────────────────────────────

/// Declared module settings. Doubles as the partial PUT body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_connection_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_iterations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_nominal_psd_offset: Option<String>,
    #[serde(
        rename = "txCLPtarget",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_int64"
    )]
    pub tx_clp_target: Option<i64>,
    #[serde(
        rename = "maxDSCs",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_int64"
    )]
    pub max_dscs: Option<i64>,
    #[serde(
        rename = "maxTxDSCs",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_int64"
    )]
    pub max_tx_dscs: Option<i64>,
}

impl ModuleSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleConfig {
    #[serde(deserialize_with = "lenient")]
    pub selector: Option<ModuleSelector>,
    pub module: Option<ModuleSettings>,
    pub managed_by: Option<String>,
}

/// Operational view of a module as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleStatus {
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
    #[serde(deserialize_with = "opt_int64")]
    pub actual_constellation_frequency: Option<i64>,
    pub operating_modulation: Option<String>,
    #[serde(deserialize_with = "opt_int64")]
    pub baud_rate: Option<i64>,
    #[serde(rename = "txCLPtarget", deserialize_with = "opt_int64")]
    pub tx_clp_target: Option<i64>,
    #[serde(rename = "maxDSCs", deserialize_with = "opt_int64")]
    pub max_dscs: Option<i64>,
    #[serde(rename = "maxTxDSCs", deserialize_with = "opt_int64")]
    pub max_tx_dscs: Option<i64>,
    pub capabilities: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleState {
    pub module: Option<ModuleStatus>,
    pub host_port: Option<HostPort>,
    pub lifecycle_state: Option<String>,
    pub managed_by: Option<String>,
}

/// A hub or leaf module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Module {
    pub id: Option<String>,
    pub href: Option<String>,
    pub parent_id: Option<String>,
    pub config: Option<ModuleConfig>,
    pub state: Option<ModuleState>,
}

/// POST body element for a module (hub inside a network create, or leaf).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCreate {
    pub selector: ModuleSelector,
    #[serde(skip_serializing_if = "ModuleSettings::is_empty")]
    pub module: ModuleSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

/// Partial PUT body for a module.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<ModuleSelector>,
    #[serde(skip_serializing_if = "ModuleSettings::is_empty")]
    pub module: ModuleSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

impl ModuleUpdate {
    pub fn is_empty(&self) -> bool {
        self.selector.is_none() && self.module.is_empty() && self.managed_by.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReachableEndpoint {
    pub host_port: Option<HostPort>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReachableState {
    pub discovered_time: Option<String>,
    pub module: Option<ModuleStatus>,
    pub endpoints: Vec<ReachableEndpoint>,
}

/// A module seen on the constellation medium but not enrolled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReachableModule {
    pub id: Option<String>,
    pub href: Option<String>,
    pub parent_id: Option<String>,
    pub state: Option<ReachableState>,
}

// ── Network connections ─────────────────────────────────────────────

/// Declared connection settings. Doubles as the partial PUT body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc: Option<String>,
    #[serde(rename = "outerVID", skip_serializing_if = "Option::is_none")]
    pub outer_vid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_transport_capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

impl ConnectionConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionState {
    pub name: Option<String>,
    pub service_mode: Option<String>,
    pub mc: Option<String>,
    #[serde(rename = "outerVID")]
    pub outer_vid: Option<String>,
    pub implicit_transport_capacity: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub lifecycle_state: Option<String>,
    pub operational_status: Option<String>,
    pub managed_by: Option<String>,
    pub lifecycle_state_cause: Option<LifecycleStateCause>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConnection {
    pub id: Option<String>,
    pub href: Option<String>,
    pub config: Option<ConnectionConfig>,
    pub state: Option<ConnectionState>,
    pub endpoints: Vec<Endpoint>,
    pub lcs: Vec<Lc>,
}

/// POST `/network-connections` element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCreate {
    #[serde(flatten)]
    pub config: ConnectionConfig,
    pub endpoints: Vec<EndpointCreate>,
}

// ── Endpoints (shared by connections and transport capacities) ──────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointConfig {
    #[serde(deserialize_with = "lenient")]
    pub selector: Option<InterfaceSelector>,
    #[serde(deserialize_with = "opt_int64")]
    pub capacity: Option<i64>,
}

/// The module interface an endpoint resolved to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleIf {
    pub module_id: Option<String>,
    pub module_name: Option<String>,
    #[serde(rename = "moduleMAC")]
    pub module_mac: Option<String>,
    pub module_serial_number: Option<String>,
    pub client_if_aid: Option<String>,
    #[serde(deserialize_with = "opt_int64")]
    pub client_if_col_id: Option<i64>,
    #[serde(deserialize_with = "opt_int64")]
    pub client_if_port_speed: Option<i64>,
    pub current_role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointState {
    pub host_port: Option<HostPort>,
    pub module_if: Option<ModuleIf>,
    #[serde(deserialize_with = "opt_int64")]
    pub capacity: Option<i64>,
    pub lifecycle_state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoint {
    pub id: Option<String>,
    pub href: Option<String>,
    pub parent_id: Option<String>,
    pub config: Option<EndpointConfig>,
    pub state: Option<EndpointState>,
    pub acs: Vec<Ac>,
}

impl Endpoint {
    pub fn selector(&self) -> Option<&InterfaceSelector> {
        self.config.as_ref().and_then(|c| c.selector.as_ref())
    }

    pub fn module_if(&self) -> Option<&ModuleIf> {
        self.state.as_ref().and_then(|s| s.module_if.as_ref())
    }
}

/// POST body element for an endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
    pub selector: InterfaceSelector,
}

/// PUT body for an endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointUpdate {
    pub capacity: i64,
}

// ── ACs and LCs ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AcState {
    #[serde(deserialize_with = "opt_int64")]
    pub col_id: Option<i64>,
    #[serde(deserialize_with = "opt_int64")]
    pub capacity: Option<i64>,
    pub imc: Option<String>,
    #[serde(rename = "imcOuterVID")]
    pub imc_outer_vid: Option<String>,
    pub emc: Option<String>,
    #[serde(rename = "emcOuterVID")]
    pub emc_outer_vid: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub ac_ctrl: Option<String>,
    pub lifecycle_state: Option<String>,
}

/// Attachment circuit on an endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ac {
    pub id: Option<String>,
    pub href: Option<String>,
    pub parent_id: Option<String>,
    pub state: Option<AcState>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LcState {
    #[serde(deserialize_with = "opt_int64")]
    pub col_id: Option<i64>,
    pub lc_aid: Option<String>,
    pub direction: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub lc_ctrl: Option<String>,
    pub module_id: Option<String>,
    pub client_aid: Option<String>,
    pub dscg_aid: Option<String>,
    pub mac_address: Option<String>,
    pub line_aid: Option<String>,
    pub remote_module_id: Option<String>,
    pub remote_client_id: Option<String>,
    pub lifecycle_state: Option<String>,
}

/// Line carrier of a connection on one module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lc {
    pub id: Option<String>,
    pub href: Option<String>,
    pub parent_id: Option<String>,
    pub state: Option<LcState>,
}

// ── Transport capacities ────────────────────────────────────────────

/// Declared transport capacity settings. Doubles as the partial PUT body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapacityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

impl CapacityConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapacityState {
    pub name: Option<String>,
    pub capacity_mode: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub lifecycle_state: Option<String>,
    pub lifecycle_state_cause: Option<LifecycleStateCause>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportCapacity {
    pub id: Option<String>,
    pub href: Option<String>,
    pub config: Option<CapacityConfig>,
    pub state: Option<CapacityState>,
    pub endpoints: Vec<Endpoint>,
}

impl TransportCapacity {
    pub fn lifecycle_state(&self) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|s| s.lifecycle_state.as_deref())
    }
}

/// POST `/transport-capacities` element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityCreate {
    #[serde(flatten)]
    pub config: CapacityConfig,
    pub endpoints: Vec<EndpointCreate>,
}
