use std::collections::BTreeMap;

use ipm_api::types as wire;
use serde_json::Value;

use super::server_id;
use crate::attr::Attr;
use crate::error::CoreError;
use crate::model::{
    HostPort, Module, ModuleConfig, ModuleSelectorBlock, ModuleSettings, ModuleState,
    ReachableModule, ReachableState,
};

// ── Settings ────────────────────────────────────────────────────────

impl ModuleSettings {
    pub fn refresh(&self, server: Option<&wire::ModuleSettings>) -> Self {
        let s = server.cloned().unwrap_or_default();
        Self {
            planned_capacity: self.planned_capacity.refresh(s.planned_capacity),
            traffic_mode: self.traffic_mode.refresh(s.traffic_mode),
            fiber_connection_mode: self.fiber_connection_mode.refresh(s.fiber_connection_mode),
            fec_iterations: self.fec_iterations.refresh(s.fec_iterations),
            requested_nominal_psd_offset: self
                .requested_nominal_psd_offset
                .refresh(s.requested_nominal_psd_offset),
            tx_clp_target: self.tx_clp_target.refresh(s.tx_clp_target),
            max_dscs: self.max_dscs.refresh(s.max_dscs),
            max_tx_dscs: self.max_tx_dscs.refresh(s.max_tx_dscs),
        }
    }

    /// Known values only.
    pub fn declared(&self) -> wire::ModuleSettings {
        self.changes(&Self::default())
    }

    /// Known values that differ from `prior`.
    pub fn changes(&self, prior: &Self) -> wire::ModuleSettings {
        wire::ModuleSettings {
            planned_capacity: self.planned_capacity.changed_from(&prior.planned_capacity).cloned(),
            traffic_mode: self.traffic_mode.changed_from(&prior.traffic_mode).cloned(),
            fiber_connection_mode: self
                .fiber_connection_mode
                .changed_from(&prior.fiber_connection_mode)
                .cloned(),
            fec_iterations: self.fec_iterations.changed_from(&prior.fec_iterations).cloned(),
            requested_nominal_psd_offset: self
                .requested_nominal_psd_offset
                .changed_from(&prior.requested_nominal_psd_offset)
                .cloned(),
            tx_clp_target: self.tx_clp_target.changed_from(&prior.tx_clp_target).copied(),
            max_dscs: self.max_dscs.changed_from(&prior.max_dscs).copied(),
            max_tx_dscs: self.max_tx_dscs.changed_from(&prior.max_tx_dscs).copied(),
        }
    }
}

// ── Config ──────────────────────────────────────────────────────────

impl ModuleConfig {
    pub fn refresh(&self, server: Option<&wire::ModuleConfig>) -> Self {
        let selector = if self.selector.is_empty() {
            server
                .and_then(|c| c.selector.as_ref())
                .map(ModuleSelectorBlock::from_wire)
                .unwrap_or_default()
        } else {
            self.selector.clone()
        };
        Self {
            selector,
            module: self.module.refresh(server.and_then(|c| c.module.as_ref())),
            managed_by: self
                .managed_by
                .refresh(server.and_then(|c| c.managed_by.clone())),
        }
    }

    pub fn to_create(&self) -> Result<wire::ModuleCreate, CoreError> {
        Ok(wire::ModuleCreate {
            selector: self.selector.require()?,
            module: self.module.declared(),
            managed_by: self.managed_by.known().cloned(),
        })
    }

    /// Partial PUT body: the selector when it changed, plus changed settings.
    pub fn changes(&self, prior: &Self) -> Result<wire::ModuleUpdate, CoreError> {
        let selector = self.selector.to_wire()?;
        let prior_selector = prior.selector.to_wire().ok().flatten();
        Ok(wire::ModuleUpdate {
            selector: selector.filter(|s| Some(s) != prior_selector.as_ref()),
            module: self.module.changes(&prior.module),
            managed_by: self.managed_by.changed_from(&prior.managed_by).cloned(),
        })
    }

    /// Full PUT body of every known value.
    pub fn declared_update(&self) -> Result<wire::ModuleUpdate, CoreError> {
        Ok(wire::ModuleUpdate {
            selector: Some(self.selector.require()?),
            module: self.module.declared(),
            managed_by: self.managed_by.known().cloned(),
        })
    }
}

// ── State ───────────────────────────────────────────────────────────

fn capability_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<&wire::ModuleStatus> for ModuleState {
    fn from(m: &wire::ModuleStatus) -> Self {
        Self {
            module_id: m.module_id.clone(),
            module_name: m.module_name.clone(),
            mac_address: m.mac_address.clone(),
            serial_number: m.serial_number.clone(),
            current_role: m.current_role.clone(),
            configured_role: m.configured_role.clone(),
            role_status: m.role_status.clone(),
            traffic_mode: m.traffic_mode.clone(),
            fiber_connection_mode: m.fiber_connection_mode.clone(),
            fec_iterations: m.fec_iterations.clone(),
            planned_capacity: m.planned_capacity.clone(),
            requested_nominal_psd_offset: m.requested_nominal_psd_offset.clone(),
            actual_constellation_frequency: m.actual_constellation_frequency,
            operating_modulation: m.operating_modulation.clone(),
            baud_rate: m.baud_rate,
            tx_clp_target: m.tx_clp_target,
            max_dscs: m.max_dscs,
            max_tx_dscs: m.max_tx_dscs,
            capabilities: m.capabilities.as_ref().map(|caps| {
                caps.iter()
                    .map(|(k, v)| (k.clone(), capability_text(v)))
                    .collect::<BTreeMap<_, _>>()
            }),
            host_port: None,
            lifecycle_state: None,
            managed_by: None,
        }
    }
}

impl From<&wire::ModuleState> for ModuleState {
    fn from(s: &wire::ModuleState) -> Self {
        let mut state = s.module.as_ref().map(ModuleState::from).unwrap_or_default();
        state.host_port = s.host_port.as_ref().map(HostPort::from);
        state.lifecycle_state.clone_from(&s.lifecycle_state);
        state.managed_by.clone_from(&s.managed_by);
        state
    }
}

// ── Projections ─────────────────────────────────────────────────────

pub fn project_module(plan: &Module, server: &wire::Module) -> Module {
    Module {
        network_id: plan
            .network_id
            .refresh(server.parent_id.clone()),
        id: Attr::computed(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        config: plan.config.refresh(server.config.as_ref()),
        state: Attr::computed(server.state.as_ref().map(ModuleState::from)),
    }
}

pub fn project_reachable(plan: &ReachableModule, server: &wire::ReachableModule) -> ReachableModule {
    let state = server.state.as_ref().map(|s| ReachableState {
        discovered_time: s.discovered_time.clone(),
        module: s.module.as_ref().map(ModuleState::from),
        endpoints: s
            .endpoints
            .iter()
            .filter_map(|e| e.host_port.as_ref().map(HostPort::from))
            .collect(),
    });
    ReachableModule {
        network_id: plan.network_id.refresh(server.parent_id.clone()),
        id: plan.id.refresh(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        state: Attr::computed(state),
    }
}
