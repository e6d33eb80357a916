use ipm_api::types as wire;

use super::connection::{endpoint_create, project_endpoints};
use super::server_id;
use crate::attr::Attr;
use crate::error::CoreError;
use crate::model::{
    CapacityConfig, CapacityEndpoint, CapacityState, LifecycleCause, TransportCapacity,
};

impl CapacityConfig {
    pub fn refresh(&self, server: Option<&wire::CapacityConfig>) -> Self {
        let s = server.cloned().unwrap_or_default();
        Self {
            name: self.name.refresh(s.name),
            capacity_mode: self.capacity_mode.refresh(s.capacity_mode),
            labels: self.labels.refresh(s.labels),
        }
    }

    pub fn declared(&self) -> wire::CapacityConfig {
        self.changes(&Self::default())
    }

    pub fn changes(&self, prior: &Self) -> wire::CapacityConfig {
        wire::CapacityConfig {
            name: self.name.changed_from(&prior.name).cloned(),
            capacity_mode: self.capacity_mode.changed_from(&prior.capacity_mode).cloned(),
            labels: self.labels.changed_from(&prior.labels).cloned(),
        }
    }
}

impl From<&wire::CapacityState> for CapacityState {
    fn from(s: &wire::CapacityState) -> Self {
        Self {
            name: s.name.clone(),
            capacity_mode: s.capacity_mode.clone(),
            labels: s.labels.clone(),
            lifecycle_state: s.lifecycle_state.clone(),
            lifecycle_state_cause: s.lifecycle_state_cause.as_ref().map(LifecycleCause::from),
        }
    }
}

pub fn project_capacity(plan: &TransportCapacity, server: &wire::TransportCapacity) -> TransportCapacity {
    let planned: Vec<_> = plan
        .endpoints
        .iter()
        .map(|ep| (&ep.selector, &ep.capacity))
        .collect();
    let endpoints = project_endpoints(&planned, &server.endpoints)
        .into_iter()
        .map(|ep| CapacityEndpoint {
            selector: ep.selector,
            capacity: ep.capacity,
            state: ep.state,
        })
        .collect();
    TransportCapacity {
        id: Attr::computed(server_id(server.id.as_ref(), server.href.as_ref())),
        href: Attr::computed(server.href.clone()),
        config: plan.config.refresh(server.config.as_ref()),
        endpoints,
        state: Attr::computed(server.state.as_ref().map(CapacityState::from)),
    }
}

pub fn capacity_create(plan: &TransportCapacity) -> Result<wire::CapacityCreate, CoreError> {
    if plan.endpoints.len() < 2 {
        return Err(CoreError::config(format!(
            "a transport capacity needs at least 2 endpoints, got {}",
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
    Ok(wire::CapacityCreate {
        config: plan.config.declared(),
        endpoints,
    })
}
