// ── Resource type registry ──
//
// Maps host type names (`ipm_<suffix>`) to their handlers. Entries are
// listed once here; schemas come from the handlers themselves.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::data::{
    Acs, Data, DataHandler, FoundConnections, FoundNetworks, HubModuleLookup, Lcs, LeafModules,
    NcEndpoints, NetworkConnections, Networks, ReachableModules, TransportCapacities,
};
use crate::error::{CoreError, Diagnostic};
use crate::reconcile::{
    AcReconciler, CapacityReconciler, ConnectionReconciler, EndpointReconciler,
    HubModuleReconciler, LcReconciler, LeafModuleReconciler, NetworkReconciler,
    ReachableModuleReconciler, Resource, ResourceHandler,
};
use crate::schema::{AttrType, Attribute, Schema};

pub const TYPE_PREFIX: &str = "ipm_";

type ResourceFactory = fn() -> Box<dyn ResourceHandler>;
type DataFactory = fn() -> Box<dyn DataHandler>;

const RESOURCES: &[(&str, ResourceFactory)] = &[
    ("constellation_network", || Box::new(Resource(NetworkReconciler))),
    ("hub_module", || Box::new(Resource(HubModuleReconciler))),
    ("leaf_module", || Box::new(Resource(LeafModuleReconciler))),
    ("reachable_module", || Box::new(Resource(ReachableModuleReconciler))),
    ("network_connection", || Box::new(Resource(ConnectionReconciler))),
    ("nc_endpoint", || Box::new(Resource(EndpointReconciler))),
    ("nc_ac", || Box::new(Resource(AcReconciler))),
    ("nc_lc", || Box::new(Resource(LcReconciler))),
    ("transport_capacity", || Box::new(Resource(CapacityReconciler))),
];

const DATA_SOURCES: &[(&str, DataFactory)] = &[
    ("networks", || Box::new(Data(Networks))),
    ("found_networks", || Box::new(Data(FoundNetworks))),
    ("hub_module", || Box::new(Data(HubModuleLookup))),
    ("leaf_modules", || Box::new(Data(LeafModules))),
    ("reachable_modules", || Box::new(Data(ReachableModules))),
    ("network_connections", || Box::new(Data(NetworkConnections))),
    ("found_network_connections", || Box::new(Data(FoundConnections))),
    ("nc_endpoints", || Box::new(Data(NcEndpoints))),
    ("nc_acs", || Box::new(Data(Acs))),
    ("nc_lcs", || Box::new(Data(Lcs))),
    ("transport_capacities", || Box::new(Data(TransportCapacities))),
];

/// Schema of the provider block.
pub fn provider_schema() -> Schema {
    Schema {
        version: 0,
        attributes: vec![
            Attribute::required("host", AttrType::String),
            Attribute::required("username", AttrType::String),
            Attribute::required("password", AttrType::String).sensitive(),
            Attribute::optional("insecure", AttrType::Bool),
            Attribute::optional("ca_cert", AttrType::String),
        ],
    }
}

/// Everything the host needs to know up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resource_schemas: IndexMap<String, Schema>,
    pub data_source_schemas: IndexMap<String, Schema>,
}

pub struct Registry {
    resources: IndexMap<String, Box<dyn ResourceHandler>>,
    data_sources: IndexMap<String, Box<dyn DataHandler>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            resources: RESOURCES
                .iter()
                .map(|(suffix, factory)| (format!("{TYPE_PREFIX}{suffix}"), factory()))
                .collect(),
            data_sources: DATA_SOURCES
                .iter()
                .map(|(suffix, factory)| (format!("{TYPE_PREFIX}{suffix}"), factory()))
                .collect(),
        }
    }

    pub fn resource(&self, type_name: &str) -> Option<&dyn ResourceHandler> {
        self.resources.get(type_name).map(|h| &**h)
    }

    pub fn data_source(&self, type_name: &str) -> Option<&dyn DataHandler> {
        self.data_sources.get(type_name).map(|h| &**h)
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    /// Diagnostics for a planned configuration; no server access.
    pub fn validate(&self, type_name: &str, config: &Value) -> Vec<Diagnostic> {
        match self.resource(type_name) {
            Some(handler) => handler.validate(config),
            None => vec![Diagnostic::from(&CoreError::Unsupported {
                operation: format!("unknown resource type `{type_name}`"),
            })],
        }
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: provider_schema(),
            resource_schemas: self
                .resources
                .iter()
                .map(|(name, h)| (name.clone(), h.schema()))
                .collect(),
            data_source_schemas: self
                .data_sources
                .iter()
                .map(|(name, h)| (name.clone(), h.schema()))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::data::{
        AcsData, CapacitiesData, FoundConnectionsData, FoundNetworksData, HubModuleData,
        LcsData, LeafModulesData, NcEndpointsData, NetworkConnectionsData, NetworksData,
        ReachableModulesData,
    };
    use crate::model::{
        Ac, Lc, Module, NcEndpoint, Network, NetworkConnection, ReachableModule,
        TransportCapacity,
    };
    use crate::schema::SchemaType;

    fn serialized_keys_match_descriptor<T: SchemaType + Serialize + Default>() {
        let value = serde_json::to_value(T::default()).unwrap();
        T::attribute_type()
            .conforms(&value)
            .unwrap_or_else(|e| panic!("{}: {e}", std::any::type_name::<T>()));
    }

    #[test]
    fn every_model_serializes_to_its_descriptor() {
        serialized_keys_match_descriptor::<Network>();
        serialized_keys_match_descriptor::<Module>();
        serialized_keys_match_descriptor::<ReachableModule>();
        serialized_keys_match_descriptor::<NetworkConnection>();
        serialized_keys_match_descriptor::<NcEndpoint>();
        serialized_keys_match_descriptor::<Ac>();
        serialized_keys_match_descriptor::<Lc>();
        serialized_keys_match_descriptor::<TransportCapacity>();
        serialized_keys_match_descriptor::<NetworksData>();
        serialized_keys_match_descriptor::<FoundNetworksData>();
        serialized_keys_match_descriptor::<HubModuleData>();
        serialized_keys_match_descriptor::<LeafModulesData>();
        serialized_keys_match_descriptor::<ReachableModulesData>();
        serialized_keys_match_descriptor::<NetworkConnectionsData>();
        serialized_keys_match_descriptor::<FoundConnectionsData>();
        serialized_keys_match_descriptor::<NcEndpointsData>();
        serialized_keys_match_descriptor::<AcsData>();
        serialized_keys_match_descriptor::<LcsData>();
        serialized_keys_match_descriptor::<CapacitiesData>();
    }

    #[test]
    fn type_names_carry_the_prefix() {
        let registry = Registry::new();
        assert!(registry.resource("ipm_network_connection").is_some());
        assert!(registry.resource("network_connection").is_none());
        assert!(registry.data_source("ipm_found_network_connections").is_some());
        assert_eq!(registry.resource_types().count(), RESOURCES.len());
        assert_eq!(registry.data_source_types().count(), DATA_SOURCES.len());
        assert!(registry.resource_types().all(|t| t.starts_with(TYPE_PREFIX)));
    }

    #[test]
    fn provider_password_is_sensitive() {
        let schema = provider_schema();
        assert!(schema.attribute("password").unwrap().sensitive);
        assert!(!schema.attribute("host").unwrap().sensitive);
    }

    #[test]
    fn schemas_serialize() {
        let value = serde_json::to_value(Registry::new().schema()).unwrap();
        let nc = &value["resource_schemas"]["ipm_network_connection"];
        assert_eq!(nc["version"], 0);
        assert!(nc["attributes"].as_array().unwrap().iter().any(|a| a["name"] == "endpoints"));
    }

    #[test]
    fn validate_flags_unknown_types_and_bad_selectors() {
        let registry = Registry::new();
        let unknown = registry.validate("ipm_nonexistent", &serde_json::json!({}));
        assert_eq!(unknown.len(), 1);

        let plan = serde_json::json!({
            "network_id": "nw-1",
            "config": {"selector": {
                "module_selector_by_module_id": {"module_id": "m-1"},
                "module_selector_by_module_name": {"module_name": "LeafB"}
            }}
        });
        assert_eq!(registry.validate("ipm_leaf_module", &plan).len(), 1);
    }
}
