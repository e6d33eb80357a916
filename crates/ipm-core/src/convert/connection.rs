use ipm_api::types as wire;

use super::server_id;
use crate::attr::Attr;
use crate::error::CoreError;
use crate::matching::{match_endpoints, wire_candidate};
use crate::model::{
    Ac, AcState, ConnectionConfig, ConnectionEndpoint, ConnectionState, EndpointState,
    HostPort, IfSelectorBlock, Lc, LcState, LifecycleCause, ModuleIf, NcEndpoint,
    NetworkConnection,
};

// ── Config ──────────────────────────────────────────────────────────

impl ConnectionConfig {
    pub fn refresh(&self, server: Option<&wire::ConnectionConfig>) -> Self {
        let s = server.cloned().unwrap_or_default();
        Self {
            name: self.name.refresh(s.name),
            service_mode: self.service_mode.refresh(s.service_mode),
            mc: self.mc.refresh(s.mc),
            outer_vid: self.outer_vid.refresh(s.outer_vid),
            implicit_transport_capacity: self
                .implicit_transport_capacity
                .refresh(s.implicit_transport_capacity),
            labels: self.labels.refresh(s.labels),
        }
    }

    pub fn declared(&self) -> wire::ConnectionConfig {
        self.changes(&Self::default())
    }

    pub fn changes(&self, prior: &Self) -> wire::ConnectionConfig {
        wire::ConnectionConfig {
            name: self.name.changed_from(&prior.name).cloned(),
            service_mode: self.service_mode.changed_from(&prior.service_mode).cloned(),
            mc: self.mc.changed_from(&prior.mc).cloned(),
            outer_vid: self.outer_vid.changed_from(&prior.outer_vid).cloned(),
            implicit_transport_capacity: self
                .implicit_transport_capacity
                .changed_from(&prior.implicit_transport_capacity)
                .cloned(),
            labels: self.labels.changed_from(&prior.labels).cloned(),
        }
    }
}

// ── Computed blocks ─────────────────────────────────────────────────

impl From<&wire::ConnectionState> for ConnectionState {
    fn from(s: &wire::ConnectionState) -> Self {
        Self {
            name: s.name.clone(),
            service_mode: s.service_mode.clone(),
            mc: s.mc.clone(),
            outer_vid: s.outer_vid.clone(),
            implicit_transport_capacity: s.implicit_transport_capacity.clone(),
            labels: s.labels.clone(),
            lifecycle_state: s.lifecycle_state.clone(),
            operational_status: s.operational_status.clone(),
            managed_by: s.managed_by.clone(),
            lifecycle_state_cause: s.lifecycle_state_cause.as_ref().map(LifecycleCause::from),
        }
    }
}

impl From<&wire::ModuleIf> for ModuleIf {
    fn from(m: &wire::ModuleIf) -> Self {
        Self {
            module_id: m.module_id.clone(),
            module_name: m.module_name.clone(),
            module_mac: m.module_mac.clone(),
            module_serial_number: m.module_serial_number.clone(),
            client_if_aid: m.client_if_aid.clone(),
            client_if_col_id: m.client_if_col_id,
            client_if_port_speed: m.client_if_port_speed,
            current_role: m.current_role.clone(),
        }
    }
}

impl From<&wire::EndpointState> for EndpointState {
    fn from(s: &wire::EndpointState) -> Self {
        Self {
            host_port: s.host_port.as_ref().map(HostPort::from),
            module_if: s.module_if.as_ref().map(ModuleIf::from),
            capacity: s.capacity,
            lifecycle_state: s.lifecycle_state.clone(),
        }
    }
}

impl From<&wire::AcState> for AcState {
    fn from(s: &wire::AcState) -> Self {
        Self {
            col_id: s.col_id,
            capacity: s.capacity,
            imc: s.imc.clone(),
            imc_outer_vid: s.imc_outer_vid.clone(),
            emc: s.emc.clone(),
            emc_outer_vid: s.emc_outer_vid.clone(),
            ac_ctrl: s.ac_ctrl.clone(),
            lifecycle_state: s.lifecycle_state.clone(),
        }
    }
}

impl From<&wire::LcState> for LcState {
    fn from(s: &wire::LcState) -> Self {
        Self {
            col_id: s.col_id,
            lc_aid: s.lc_aid.clone(),
            direction: s.direction.clone(),
            lc_ctrl: s.lc_ctrl.clone(),
            module_id: s.module_id.clone(),
            client_aid: s.client_aid.clone(),
            dscg_aid: s.dscg_aid.clone(),
            mac_address: s.mac_address.clone(),
            line_aid: s.line_aid.clone(),
            remote_module_id: s.remote_module_id.clone(),
            remote_client_id: s.remote_client_id.clone(),
            lifecycle_state: s.lifecycle_state.clone(),
        }
    }
}

/// An AC as the server reports it; `plan` supplies the declared id.
pub fn project_ac(plan: &Ac, server: &wire::Ac) -> Ac {
    Ac {
        id: plan
            .id
            .refresh(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        parent_id: Attr::computed(server.parent_id.clone()),
        state: Attr::computed(server.state.as_ref().map(AcState::from)),
    }
}

pub fn project_lc(plan: &Lc, server: &wire::Lc) -> Lc {
    Lc {
        id: plan
            .id
            .refresh(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        parent_id: Attr::computed(server.parent_id.clone()),
        state: Attr::computed(server.state.as_ref().map(LcState::from)),
    }
}

fn observed_ac(server: &wire::Ac) -> Ac {
    project_ac(
        &Ac {
            id: Attr::Unknown,
            ..Ac::default()
        },
        server,
    )
}

fn observed_lc(server: &wire::Lc) -> Lc {
    project_lc(
        &Lc {
            id: Attr::Unknown,
            ..Lc::default()
        },
        server,
    )
}

// ── Endpoints ───────────────────────────────────────────────────────

fn endpoint_capacity(server: &wire::Endpoint) -> Option<i64> {
    server
        .config
        .as_ref()
        .and_then(|c| c.capacity)
        .or_else(|| server.state.as_ref().and_then(|s| s.capacity))
}

fn project_entry(
    selector: &IfSelectorBlock,
    capacity: &Attr<i64>,
    server: &wire::Endpoint,
) -> ConnectionEndpoint {
    let selector = if selector.is_empty() {
        server
            .selector()
            .map(IfSelectorBlock::from_wire)
            .unwrap_or_default()
    } else {
        selector.clone()
    };
    ConnectionEndpoint {
        id: Attr::computed(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        selector,
        capacity: capacity.refresh(endpoint_capacity(server)),
        state: Attr::computed(server.state.as_ref().map(EndpointState::from)),
        acs: server.acs.iter().map(observed_ac).collect(),
    }
}

/// Server endpoints in planned order; unmatched plan entries are dropped.
///
/// With no planned endpoints (import, data sources) every server
/// endpoint is reported in server order.
pub(crate) fn project_endpoints(
    plan: &[(&IfSelectorBlock, &Attr<i64>)],
    server: &[wire::Endpoint],
) -> Vec<ConnectionEndpoint> {
    if plan.is_empty() {
        return server
            .iter()
            .map(|ep| project_entry(&IfSelectorBlock::default(), &Attr::Unknown, ep))
            .collect();
    }
    let selectors: Vec<_> = plan
        .iter()
        .map(|(sel, _)| sel.to_wire().ok().flatten())
        .collect();
    match_endpoints(&selectors, server, wire_candidate)
        .into_iter()
        .zip(plan)
        .filter_map(|(matched, (sel, cap))| {
            matched
                .and_then(|i| server.get(i))
                .map(|ep| project_entry(sel, cap, ep))
        })
        .collect()
}

pub fn project_connection(
    plan: &NetworkConnection,
    server: &wire::NetworkConnection,
) -> NetworkConnection {
    let planned: Vec<_> = plan
        .endpoints
        .iter()
        .map(|ep| (&ep.selector, &ep.capacity))
        .collect();
    NetworkConnection {
        id: Attr::computed(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        config: plan.config.refresh(server.config.as_ref()),
        endpoints: project_endpoints(&planned, &server.endpoints),
        state: Attr::computed(server.state.as_ref().map(ConnectionState::from)),
        lcs: server.lcs.iter().map(observed_lc).collect(),
    }
}

pub fn project_nc_endpoint(plan: &NcEndpoint, server: &wire::Endpoint) -> NcEndpoint {
    let entry = project_entry(&plan.selector, &plan.capacity, server);
    NcEndpoint {
        nc_id: plan.nc_id.refresh(server.parent_id.clone()),
        id: entry.id,
        href: entry.href,
        selector: entry.selector,
        capacity: entry.capacity,
        state: entry.state,
        acs: entry.acs,
    }
}

// ── Request bodies ──────────────────────────────────────────────────

pub fn endpoint_create(
    selector: &IfSelectorBlock,
    capacity: &Attr<i64>,
) -> Result<wire::EndpointCreate, CoreError> {
    Ok(wire::EndpointCreate {
        capacity: capacity.known().copied(),
        selector: selector.require()?,
    })
}

/// POST `/network-connections` element. Checks the create preconditions
/// that need no server round-trip.
pub fn connection_create(plan: &NetworkConnection) -> Result<wire::ConnectionCreate, CoreError> {
    if plan.config.name.known().is_none() {
        return Err(CoreError::config("config.name is required"));
    }
    if plan.config.service_mode.known().is_none() {
        return Err(CoreError::config("config.service_mode is required"));
    }
    if plan.endpoints.len() < 2 {
        return Err(CoreError::config(format!(
            "a network connection needs at least 2 endpoints, got {}",
            plan.endpoints.len()
        )));
    }
    let endpoints = plan
        .endpoints
        .iter()
        .enumerate()
        .map(|(i, ep)| {
            endpoint_create(&ep.selector, &ep.capacity)
                .map_err(|e| CoreError::config(format!("endpoints[{i}]: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(wire::ConnectionCreate {
        config: plan.config.declared(),
        endpoints,
    })
}
