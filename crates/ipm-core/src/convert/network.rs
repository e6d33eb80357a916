use ipm_api::types as wire;

use super::server_id;
use crate::attr::Attr;
use crate::error::CoreError;
use crate::model::{
    AvailableService, ControlLink, LifecycleCause, Network, NetworkConfig, NetworkState,
};

impl NetworkConfig {
    pub fn refresh(&self, server: Option<&wire::NetworkConfig>) -> Self {
        let s = server.cloned().unwrap_or_default();
        Self {
            name: self.name.refresh(s.name),
            constellation_frequency: self.constellation_frequency.refresh(s.constellation_frequency),
            modulation: self.modulation.refresh(s.modulation),
            tc_mode: self.tc_mode.refresh(s.tc_mode),
            topology: self.topology.refresh(s.topology),
            managed_by: self.managed_by.refresh(s.managed_by),
        }
    }

    pub fn declared(&self) -> wire::NetworkConfig {
        self.changes(&Self::default())
    }

    pub fn changes(&self, prior: &Self) -> wire::NetworkConfig {
        wire::NetworkConfig {
            name: self.name.changed_from(&prior.name).cloned(),
            constellation_frequency: self
                .constellation_frequency
                .changed_from(&prior.constellation_frequency)
                .copied(),
            modulation: self.modulation.changed_from(&prior.modulation).cloned(),
            tc_mode: self.tc_mode.changed_from(&prior.tc_mode).copied(),
            topology: self.topology.changed_from(&prior.topology).cloned(),
            managed_by: self.managed_by.changed_from(&prior.managed_by).cloned(),
        }
    }
}

impl From<&wire::NetworkState> for NetworkState {
    fn from(s: &wire::NetworkState) -> Self {
        Self {
            name: s.name.clone(),
            constellation_frequency: s.constellation_frequency,
            operating_frequency: s.operating_frequency,
            modulation: s.modulation.clone(),
            tc_mode: s.tc_mode,
            topology: s.topology.clone(),
            managed_by: s.managed_by.clone(),
            lifecycle_state: s.lifecycle_state.clone(),
            lifecycle_state_cause: s.lifecycle_state_cause.as_ref().map(LifecycleCause::from),
            control_links: s
                .control_links
                .iter()
                .map(|l| ControlLink {
                    source_module_id: l.source_module_id.clone(),
                    destination_module_id: l.destination_module_id.clone(),
                    con_state: l.con_state.clone(),
                    last_con_state_change: l.last_con_state_change.clone(),
                })
                .collect(),
            available_services: s
                .available_services
                .iter()
                .map(|a| AvailableService {
                    kind: a.service_type.clone(),
                    maximum: a.maximum,
                    available: a.available,
                    used: a.used,
                })
                .collect(),
        }
    }
}

pub fn project_network(plan: &Network, server: &wire::Network) -> Network {
    let hub = server.hub_module.as_ref();
    Network {
        id: Attr::computed(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        config: plan.config.refresh(server.config.as_ref()),
        hub_module: plan
            .hub_module
            .refresh(hub.and_then(|h| h.config.as_ref())),
        hub_module_id: Attr::computed(hub.and_then(|h| server_id(h.id.as_ref(), h.href.as_ref()))),
        state: Attr::computed(server.state.as_ref().map(NetworkState::from)),
    }
}

/// POST `/xr-networks` element for a planned network.
pub fn network_create(plan: &Network) -> Result<wire::NetworkCreate, CoreError> {
    if plan.config.constellation_frequency.known().is_none() {
        return Err(CoreError::config(
            "constellation_frequency is required to create a network",
        ));
    }
    Ok(wire::NetworkCreate {
        config: plan.config.declared(),
        hub_module: plan.hub_module.to_create()?,
    })
}
