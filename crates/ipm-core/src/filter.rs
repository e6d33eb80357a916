// ── Server-side filter expressions ──
//
// The server takes MongoDB-style JSON in the `q` query parameter.
// Selector paths are derived from the serialized selector, so the
// variant key and field names come from a single definition in
// `ipm_api::selector`. Maps keep insertion order, which makes the
// rendered expression byte-identical for the same input.

use ipm_api::InterfaceSelector;
use serde_json::{Map, Value, json};

use crate::error::CoreError;

/// `(path, value)` pairs addressing a selector inside an endpoint,
/// e.g. `config.selector.moduleIfSelectorByModuleName.moduleName`.
pub fn selector_paths(selector: &InterfaceSelector) -> Result<Vec<(String, Value)>, CoreError> {
    let value = serde_json::to_value(selector)
        .map_err(|e| CoreError::protocol(format!("selector: {e}")))?;
    let Value::Object(outer) = value else {
        return Err(CoreError::protocol("selector did not serialize to an object"));
    };
    let mut paths = Vec::new();
    for (variant, fields) in outer {
        let Value::Object(fields) = fields else {
            return Err(CoreError::protocol(format!("selector {variant} has no fields")));
        };
        for (field, v) in fields {
            paths.push((format!("config.selector.{variant}.{field}"), v));
        }
    }
    Ok(paths)
}

/// `{"endpoints":{"$elemMatch":{…}}}` for one endpoint.
pub fn endpoint_clause(
    selector: &InterfaceSelector,
    capacity: Option<i64>,
) -> Result<Value, CoreError> {
    let mut criteria = Map::new();
    if let Some(capacity) = capacity {
        criteria.insert("config.capacity".into(), Value::from(capacity));
    }
    for (path, v) in selector_paths(selector)? {
        criteria.insert(path, v);
    }
    Ok(json!({"endpoints": {"$elemMatch": Value::Object(criteria)}}))
}

/// Filter for network connections by service mode and endpoints.
pub fn connection_filter(
    service_mode: Option<&str>,
    endpoints: &[(&InterfaceSelector, Option<i64>)],
) -> Result<String, CoreError> {
    let mut clauses = Vec::with_capacity(endpoints.len() + 1);
    if let Some(mode) = service_mode {
        clauses.push(json!({"config.serviceMode": mode}));
    }
    for (selector, capacity) in endpoints {
        clauses.push(endpoint_clause(selector, *capacity)?);
    }
    render(clauses)
}

/// Filter for transport capacities that mention every given endpoint.
pub fn capacity_filter(endpoints: &[&InterfaceSelector]) -> Result<String, CoreError> {
    let clauses = endpoints
        .iter()
        .map(|selector| endpoint_clause(selector, None))
        .collect::<Result<Vec<_>, _>>()?;
    render(clauses)
}

/// Filter for networks by name.
pub fn names_filter(names: &[String]) -> String {
    json!({"config.name": {"$in": names}}).to_string()
}

fn render(clauses: Vec<Value>) -> Result<String, CoreError> {
    if clauses.is_empty() {
        return Err(CoreError::config("a filter needs at least one criterion"));
    }
    Ok(json!({"$and": clauses}).to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ipm_api::selector::{ByName, ClientIf, HostPortBySysName};
    use pretty_assertions::assert_eq;

    use super::*;

    fn by_name(name: &str) -> InterfaceSelector {
        InterfaceSelector::ModuleName(ClientIf {
            module: ByName {
                module_name: name.into(),
            },
            client_if_aid: "XR-T1".into(),
        })
    }

    #[test]
    fn connection_filter_is_byte_identical() {
        let hub = by_name("HubA");
        let leaf = by_name("LeafB");
        let expected = concat!(
            r#"{"$and":[{"config.serviceMode":"XR-L1"},"#,
            r#"{"endpoints":{"$elemMatch":{"config.capacity":100,"#,
            r#""config.selector.moduleIfSelectorByModuleName.moduleName":"HubA","#,
            r#""config.selector.moduleIfSelectorByModuleName.moduleClientIfAid":"XR-T1"}}},"#,
            r#"{"endpoints":{"$elemMatch":{"config.capacity":100,"#,
            r#""config.selector.moduleIfSelectorByModuleName.moduleName":"LeafB","#,
            r#""config.selector.moduleIfSelectorByModuleName.moduleClientIfAid":"XR-T1"}}}]}"#,
        );
        for _ in 0..3 {
            let q = connection_filter(Some("XR-L1"), &[(&hub, Some(100)), (&leaf, Some(100))])
                .unwrap();
            assert_eq!(q, expected);
        }
    }

    #[test]
    fn path_prefix_follows_variant() {
        let sel = InterfaceSelector::HostPortSysName(HostPortBySysName {
            sys_name: "sw1".into(),
            port_id_subtype: "ifName".into(),
            port_id: "Eth1/1".into(),
        });
        let paths: Vec<String> = selector_paths(&sel)
            .unwrap()
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(
            paths,
            vec![
                "config.selector.hostPortSelectorBySysName.sysName",
                "config.selector.hostPortSelectorBySysName.portIdSubtype",
                "config.selector.hostPortSelectorBySysName.portId",
            ]
        );
    }

    #[test]
    fn capacity_filter_omits_capacity() {
        let q = capacity_filter(&[&by_name("HubA")]).unwrap();
        assert!(!q.contains("config.capacity"));
        assert!(q.starts_with(r#"{"$and":[{"endpoints":{"$elemMatch":"#));
    }

    #[test]
    fn names_filter_uses_in() {
        let q = names_filter(&["a".into(), "b".into()]);
        assert_eq!(q, r#"{"config.name":{"$in":["a","b"]}}"#);
    }

    #[test]
    fn empty_filter_is_rejected() {
        assert!(connection_filter(None, &[]).is_err());
    }
}
