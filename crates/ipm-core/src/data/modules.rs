use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, fetch};
use crate::attr::Attr;
use crate::convert::{project_module, project_reachable};
use crate::error::CoreError;
use crate::model::{Module, ReachableModule};
use crate::reconcile::required;
use crate::schema::{AttrType, Attribute, SchemaType};
use crate::session::Session;

// ── ipm_hub_module ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubModuleData {
    pub network_id: Attr<String>,
    pub module: Attr<Module>,
}

impl SchemaType for HubModuleData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("network_id", AttrType::String),
            Attribute::computed("module", AttrType::object::<Module>()),
        ]
    }
}

pub struct HubModuleLookup;

#[async_trait]
impl DataSource for HubModuleLookup {
    type Model = HubModuleData;

    async fn read(&self, session: &Session, query: HubModuleData) -> Result<HubModuleData, CoreError> {
        let network_id = required(&query.network_id, "network_id")?;
        let client = session.client();
        let hub = fetch(session, "hub module lookup", |_| {
            client.get_hub_module(network_id)
        })
        .await?;
        let module = project_module(&Module::importing(network_id, None), &hub);
        Ok(HubModuleData {
            module: Attr::Known(module),
            ..query
        })
    }
}

// ── ipm_leaf_modules ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafModulesData {
    pub network_id: Attr<String>,
    pub id: Attr<String>,
    pub modules: Vec<Module>,
}

impl SchemaType for LeafModulesData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("network_id", AttrType::String),
            Attribute::optional("id", AttrType::String),
            Attribute::computed("modules", AttrType::list_of::<Module>()),
        ]
    }
}

pub struct LeafModules;

#[async_trait]
impl DataSource for LeafModules {
    type Model = LeafModulesData;

    async fn read(
        &self,
        session: &Session,
        query: LeafModulesData,
    ) -> Result<LeafModulesData, CoreError> {
        let network_id = required(&query.network_id, "network_id")?;
        let client = session.client();
        let leaves = match query.id.as_deref() {
            Some(id) => vec![
                fetch(session, "leaf module lookup", |_| {
                    client.get_leaf_module(network_id, id)
                })
                .await?,
            ],
            None => {
                fetch(session, "leaf module list", |_| {
                    client.list_leaf_modules(network_id)
                })
                .await?
            }
        };
        let template = Module::importing(network_id, None);
        let modules = leaves.iter().map(|m| project_module(&template, m)).collect();
        Ok(LeafModulesData { modules, ..query })
    }
}

// ── ipm_reachable_modules ───────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachableModulesData {
    pub network_id: Attr<String>,
    pub modules: Vec<ReachableModule>,
}

impl SchemaType for ReachableModulesData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("network_id", AttrType::String),
            Attribute::computed("modules", AttrType::list_of::<ReachableModule>()),
        ]
    }
}

pub struct ReachableModules;

#[async_trait]
impl DataSource for ReachableModules {
    type Model = ReachableModulesData;

    async fn read(
        &self,
        session: &Session,
        query: ReachableModulesData,
    ) -> Result<ReachableModulesData, CoreError> {
        let network_id = required(&query.network_id, "network_id")?;
        let client = session.client();
        let found = fetch(session, "reachable module list", |_| {
            client.list_reachable_modules(network_id)
        })
        .await?;
        let template = ReachableModule {
            network_id: Attr::Known(network_id.to_owned()),
            id: Attr::Unknown,
            href: Attr::Unknown,
            state: Attr::Unknown,
        };
        let modules = found.iter().map(|m| project_reachable(&template, m)).collect();
        Ok(ReachableModulesData { modules, ..query })
    }
}
