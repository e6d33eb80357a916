// ── Network connection ──
//
// Create checks that a transport capacity covers the first two
// endpoints, POSTs the connection and reads it back until the server
// reports every planned endpoint. Update PUTs changed config fields,
// then reconciles endpoint membership: endpoints gone from the plan are
// deleted, new ones are added, matched ones get capacity changes.
// Delete waits a grace period first; the server NACKs deletes that
// arrive right after another operation.

use std::collections::HashSet;

use async_trait::async_trait;
use ipm_api::InterfaceSelector;
use ipm_api::types::{self as wire, EndpointCreate, EndpointUpdate};
use tracing::{info, warn};

use super::{Reconciler, deleted, read_back, required};
use crate::convert::{connection_create, endpoint_create, project_connection};
use crate::error::CoreError;
use crate::filter::{capacity_filter, connection_filter};
use crate::matching::{match_endpoints_exact, wire_candidate};
use crate::model::{ConnectionEndpoint, NetworkConnection};
use crate::session::Session;

const ENTITY: &str = "network connection";
const CONFIGURED: &str = "configured";

pub struct ConnectionReconciler;

// ── Reads ───────────────────────────────────────────────────────────

fn planned_selectors(plan: &NetworkConnection) -> Vec<Option<InterfaceSelector>> {
    plan.endpoints
        .iter()
        .map(|ep| ep.selector.to_wire().ok().flatten())
        .collect()
}

/// A read-back is complete once the server lists every planned endpoint
/// under its exact selector (and at least two).
fn converged(plan: &NetworkConnection, server: &wire::NetworkConnection) -> Result<(), CoreError> {
    let expected = plan.endpoints.len().max(2);
    if server.endpoints.len() < expected {
        return Err(CoreError::pending(format!(
            "connection lists {} of {expected} endpoints",
            server.endpoints.len()
        )));
    }
    let matched =
        match_endpoints_exact(&planned_selectors(plan), &server.endpoints, wire_candidate);
    if let Some(missing) = matched.iter().position(Option::is_none) {
        return Err(CoreError::pending(format!(
            "endpoint {missing} is not reported yet"
        )));
    }
    Ok(())
}

impl ConnectionReconciler {
    async fn fetch(
        session: &Session,
        plan: &NetworkConnection,
        id: &str,
        attempts: u32,
        complete: bool,
    ) -> Result<NetworkConnection, CoreError> {
        let client = session.client();
        let server = session
            .settings()
            .connection_retry(attempts)
            .run("connection read", |_| async move {
                let server = client.get_connection(id).await?;
                if complete {
                    converged(plan, &server)?;
                }
                Ok::<_, CoreError>(server)
            })
            .await?;
        Ok(project_connection(plan, &server))
    }

    /// Locate a connection without an id through a filter on service
    /// mode and endpoints.
    async fn find(
        session: &Session,
        plan: &NetworkConnection,
    ) -> Result<NetworkConnection, CoreError> {
        let selectors = planned_selectors(plan);
        let endpoints = plan
            .endpoints
            .iter()
            .zip(&selectors)
            .map(|(ep, sel)| sel.as_ref().map(|s| (s, ep.capacity.known().copied())))
            .collect::<Option<Vec<_>>>()
            .filter(|eps| eps.len() >= 2)
            .ok_or_else(|| {
                CoreError::config("a connection without id needs at least two endpoint selectors")
            })?;
        let filter = connection_filter(plan.config.service_mode.as_deref(), &endpoints)?;

        let client = session.client();
        let filter = filter.as_str();
        let mut found = session
            .settings()
            .connection_retry(session.settings().read_attempts)
            .run("connection lookup", |_| async move {
                client
                    .list_connections(Some(filter))
                    .await
                    .map_err(CoreError::from)
            })
            .await?;
        if found.len() > 1 {
            warn!(count = found.len(), "filter matched several connections, using the first");
        }
        if found.is_empty() {
            return Err(CoreError::NotFound {
                entity: ENTITY,
                id: filter.to_owned(),
            });
        }
        let server = found.swap_remove(0);
        Ok(project_connection(plan, &server))
    }

    /// Wait for a configured transport capacity covering the first two
    /// endpoints. Runs before any POST.
    async fn await_capacity(session: &Session, plan: &NetworkConnection) -> Result<(), CoreError> {
        let selectors = planned_selectors(plan);
        let pair: Vec<&InterfaceSelector> = selectors.iter().take(2).flatten().collect();
        let filter = capacity_filter(&pair)?;

        let client = session.client();
        let filter = filter.as_str();
        let settings = session.settings();
        settings
            .connection_retry(settings.precondition_attempts)
            .run("transport capacity precondition", |_| async move {
                let capacities = client
                    .list_capacities(Some(filter))
                    .await
                    .map_err(CoreError::from)?;
                if capacities.is_empty() {
                    return Err(CoreError::pending(
                        "no transport capacity covers the first two endpoints",
                    ));
                }
                let ready = capacities
                    .iter()
                    .any(|tc| tc.lifecycle_state() == Some(CONFIGURED));
                if ready {
                    Ok(())
                } else {
                    Err(CoreError::pending(
                        "the transport capacity for the first two endpoints is not configured yet",
                    ))
                }
            })
            .await
            .map_err(|e| match e {
                CoreError::Pending { message } => CoreError::Precondition { message },
                other => other,
            })
    }
}

// ── Endpoint membership ─────────────────────────────────────────────

/// Endpoint calls that turn the prior membership into the planned one.
#[derive(Debug, Default)]
pub struct MembershipDiff {
    /// Ids of prior endpoints no planned endpoint selects.
    pub remove: Vec<String>,
    /// Planned endpoints with no prior counterpart.
    pub add: Vec<EndpointCreate>,
    /// Prior endpoints whose planned capacity differs: `(id, capacity)`.
    pub resize: Vec<(String, i64)>,
}

impl MembershipDiff {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty() && self.resize.is_empty()
    }
}

/// Pair planned and prior endpoints by identical selector.
///
/// A selector edit on an existing endpoint is a removal plus an addition.
pub fn membership_diff(
    plan: &[ConnectionEndpoint],
    prior: &[ConnectionEndpoint],
) -> Result<MembershipDiff, CoreError> {
    let prior_selectors: Vec<Option<InterfaceSelector>> = prior
        .iter()
        .map(|ep| ep.selector.to_wire().ok().flatten())
        .collect();
    let mut claimed = HashSet::new();
    let mut diff = MembershipDiff::default();

    for planned in plan {
        let selector = planned.selector.require()?;
        let counterpart = prior_selectors
            .iter()
            .enumerate()
            .position(|(i, s)| !claimed.contains(&i) && s.as_ref() == Some(&selector));
        match counterpart {
            Some(i) => {
                claimed.insert(i);
                let old = &prior[i];
                if let Some(&capacity) = planned.capacity.changed_from(&old.capacity) {
                    diff.resize
                        .push((required(&old.id, "endpoint id")?.to_owned(), capacity));
                }
            }
            None => diff.add.push(endpoint_create(&planned.selector, &planned.capacity)?),
        }
    }
    for (i, old) in prior.iter().enumerate() {
        if !claimed.contains(&i) {
            diff.remove
                .push(required(&old.id, "endpoint id")?.to_owned());
        }
    }
    Ok(diff)
}

async fn apply_membership(
    session: &Session,
    connection_id: &str,
    diff: &MembershipDiff,
) -> Result<(), CoreError> {
    let client = session.client();
    for id in &diff.remove {
        deleted(client.delete_endpoint(connection_id, id).await, "endpoint", id)?;
        info!(connection_id, endpoint = %id, "endpoint removed");
    }
    for body in &diff.add {
        let id = client.create_endpoint(connection_id, body).await?;
        info!(connection_id, endpoint = %id, "endpoint added");
    }
    for (id, capacity) in &diff.resize {
        let body = EndpointUpdate {
            capacity: *capacity,
        };
        client.update_endpoint(connection_id, id, &body).await?;
        info!(connection_id, endpoint = %id, capacity, "endpoint capacity changed");
    }
    Ok(())
}

// ── Contract ────────────────────────────────────────────────────────

#[async_trait]
impl Reconciler for ConnectionReconciler {
    type Model = NetworkConnection;

    fn validate(&self, plan: &NetworkConnection) -> Result<(), CoreError> {
        plan.endpoints
            .iter()
            .enumerate()
            .try_for_each(|(i, ep)| {
                ep.selector
                    .validate()
                    .map_err(|e| CoreError::config(format!("endpoints[{i}]: {e}")))
            })
    }

    async fn create(
        &self,
        session: &Session,
        plan: &NetworkConnection,
    ) -> Result<NetworkConnection, CoreError> {
        let body = connection_create(plan)?;
        Self::await_capacity(session, plan).await?;

        let id = session.client().create_connection(&body).await?;
        info!(id = %id, "network connection created");

        let attempts = session.settings().create_read_attempts;
        read_back(ENTITY, &id, Self::fetch(session, plan, &id, attempts, true)).await
    }

    async fn read(
        &self,
        session: &Session,
        prior: &NetworkConnection,
    ) -> Result<NetworkConnection, CoreError> {
        match prior.id.as_deref() {
            Some(id) => {
                let attempts = session.settings().read_attempts;
                Self::fetch(session, prior, id, attempts, false).await
            }
            None => Self::find(session, prior).await,
        }
    }

    async fn update(
        &self,
        session: &Session,
        plan: &NetworkConnection,
        prior: &NetworkConnection,
    ) -> Result<NetworkConnection, CoreError> {
        let id = required(&prior.id, "network connection id")?;

        let config = plan.config.changes(&prior.config);
        if !config.is_empty() {
            session.client().update_connection(id, &config).await?;
            info!(id, "network connection updated");
        }

        let diff = membership_diff(&plan.endpoints, &prior.endpoints)?;
        if !diff.is_empty() {
            apply_membership(session, id, &diff).await?;
        }

        let attempts = session.settings().update_read_attempts;
        Self::fetch(session, plan, id, attempts, true).await
    }

    async fn delete(&self, session: &Session, prior: &NetworkConnection) -> Result<(), CoreError> {
        let id = required(&prior.id, "network connection id")?;
        tokio::time::sleep(session.settings().delete_grace).await;
        deleted(session.client().delete_connection(id).await, ENTITY, id)?;
        info!(id, "network connection deleted");
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<NetworkConnection, CoreError> {
        Ok(NetworkConnection::importing(id))
    }
}
