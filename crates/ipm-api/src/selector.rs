// ── Selector sum types ──
//
// A selector names one module (or one client interface on a module) by
// exactly one of eight identification schemes. On the wire it is an
// object with a single key, the variant name, whose value carries the
// variant's fields:
//
//   {"moduleIfSelectorByModuleName": {"moduleName": "HubA", "moduleClientIfAid": "XR-T1"}}
//
// serde's externally tagged enums produce exactly that shape, so the
// `rename` attributes below are the only place variant and field names
// are spelled out. Filter paths are derived from the serialized form.

use serde::{Deserialize, Serialize};

// ── Module identification ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ById {
    pub module_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByName {
    pub module_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByMac {
    #[serde(rename = "moduleMAC")]
    pub module_mac: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BySerialNumber {
    pub module_serial_number: String,
}

// ── Host port identification ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPortByName {
    pub host_name: String,
    pub host_port_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPortById {
    pub chassis_id_subtype: String,
    pub chassis_id: String,
    pub port_id_subtype: String,
    pub port_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPortBySysName {
    pub sys_name: String,
    pub port_id_subtype: String,
    pub port_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPortBySourceMac {
    #[serde(rename = "portSourceMAC")]
    pub port_source_mac: String,
}

/// A module-level identifier plus the client interface on that module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIf<M> {
    #[serde(flatten)]
    pub module: M,
    #[serde(rename = "moduleClientIfAid")]
    pub client_if_aid: String,
}

// ── Discriminating key ──────────────────────────────────────────────

/// The field that discriminates one selector target from another.
///
/// Endpoint matching compares selectors on this key only, so two
/// selectors that name the same module through the same scheme match
/// even if other fields (e.g. the client interface) differ in casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKey<'a> {
    ModuleId(&'a str),
    ModuleName(&'a str),
    ModuleMac(&'a str),
    ModuleSerialNumber(&'a str),
    HostPort,
}

// ── ModuleSelector ──────────────────────────────────────────────────

/// Identifies a whole module (hub or leaf).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleSelector {
    #[serde(rename = "moduleSelectorByModuleId")]
    ModuleId(ById),
    #[serde(rename = "moduleSelectorByModuleName")]
    ModuleName(ByName),
    #[serde(rename = "moduleSelectorByModuleMAC")]
    ModuleMac(ByMac),
    #[serde(rename = "moduleSelectorByModuleSerialNumber")]
    ModuleSerialNumber(BySerialNumber),
    #[serde(rename = "hostPortSelectorByName")]
    HostPortName(HostPortByName),
    #[serde(rename = "hostPortSelectorByPortId")]
    HostPortId(HostPortById),
    #[serde(rename = "hostPortSelectorBySysName")]
    HostPortSysName(HostPortBySysName),
    #[serde(rename = "hostPortSelectorByPortSourceMAC")]
    HostPortSourceMac(HostPortBySourceMac),
}

impl ModuleSelector {
    pub fn target_key(&self) -> TargetKey<'_> {
        match self {
            Self::ModuleId(s) => TargetKey::ModuleId(&s.module_id),
            Self::ModuleName(s) => TargetKey::ModuleName(&s.module_name),
            Self::ModuleMac(s) => TargetKey::ModuleMac(&s.module_mac),
            Self::ModuleSerialNumber(s) => TargetKey::ModuleSerialNumber(&s.module_serial_number),
            Self::HostPortName(_)
            | Self::HostPortId(_)
            | Self::HostPortSysName(_)
            | Self::HostPortSourceMac(_) => TargetKey::HostPort,
        }
    }
}

// ── InterfaceSelector ───────────────────────────────────────────────

/// Identifies one client interface: a module variant plus the interface
/// AID, or a host port (which implies the interface).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceSelector {
    #[serde(rename = "moduleIfSelectorByModuleId")]
    ModuleId(ClientIf<ById>),
    #[serde(rename = "moduleIfSelectorByModuleName")]
    ModuleName(ClientIf<ByName>),
    #[serde(rename = "moduleIfSelectorByModuleMAC")]
    ModuleMac(ClientIf<ByMac>),
    #[serde(rename = "moduleIfSelectorByModuleSerialNumber")]
    ModuleSerialNumber(ClientIf<BySerialNumber>),
    #[serde(rename = "hostPortSelectorByName")]
    HostPortName(HostPortByName),
    #[serde(rename = "hostPortSelectorByPortId")]
    HostPortId(HostPortById),
    #[serde(rename = "hostPortSelectorBySysName")]
    HostPortSysName(HostPortBySysName),
    #[serde(rename = "hostPortSelectorByPortSourceMAC")]
    HostPortSourceMac(HostPortBySourceMac),
}

impl InterfaceSelector {
    pub fn target_key(&self) -> TargetKey<'_> {
        match self {
            Self::ModuleId(s) => TargetKey::ModuleId(&s.module.module_id),
            Self::ModuleName(s) => TargetKey::ModuleName(&s.module.module_name),
            Self::ModuleMac(s) => TargetKey::ModuleMac(&s.module.module_mac),
            Self::ModuleSerialNumber(s) => {
                TargetKey::ModuleSerialNumber(&s.module.module_serial_number)
            }
            Self::HostPortName(_)
            | Self::HostPortId(_)
            | Self::HostPortSysName(_)
            | Self::HostPortSourceMac(_) => TargetKey::HostPort,
        }
    }

    /// The client interface AID, for module-based variants.
    pub fn client_if_aid(&self) -> Option<&str> {
        match self {
            Self::ModuleId(s) => Some(&s.client_if_aid),
            Self::ModuleName(s) => Some(&s.client_if_aid),
            Self::ModuleMac(s) => Some(&s.client_if_aid),
            Self::ModuleSerialNumber(s) => Some(&s.client_if_aid),
            _ => None,
        }
    }

    /// Whether `other` names the same target.
    ///
    /// Module variants compare on their discriminating field; host port
    /// variants have no single discriminating field and compare whole.
    pub fn same_target(&self, other: &Self) -> bool {
        match (self.target_key(), other.target_key()) {
            (TargetKey::HostPort, TargetKey::HostPort) => self == other,
            (a, b) => a == b,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn by_name(name: &str, aid: &str) -> InterfaceSelector {
        InterfaceSelector::ModuleName(ClientIf {
            module: ByName {
                module_name: name.into(),
            },
            client_if_aid: aid.into(),
        })
    }

    #[test]
    fn interface_selector_wire_shape() {
        let value = serde_json::to_value(by_name("HubA", "XR-T1")).unwrap();
        assert_eq!(
            value,
            json!({"moduleIfSelectorByModuleName": {"moduleName": "HubA", "moduleClientIfAid": "XR-T1"}})
        );
    }

    #[test]
    fn mac_variants_use_upper_case_acronyms() {
        let sel = InterfaceSelector::ModuleMac(ClientIf {
            module: ByMac {
                module_mac: "00:0b:f8:00:01:01".into(),
            },
            client_if_aid: "XR-T1".into(),
        });
        let value = serde_json::to_value(&sel).unwrap();
        assert_eq!(
            value,
            json!({"moduleIfSelectorByModuleMAC": {"moduleMAC": "00:0b:f8:00:01:01", "moduleClientIfAid": "XR-T1"}})
        );

        let port = ModuleSelector::HostPortSourceMac(HostPortBySourceMac {
            port_source_mac: "aa".into(),
        });
        assert_eq!(
            serde_json::to_value(&port).unwrap(),
            json!({"hostPortSelectorByPortSourceMAC": {"portSourceMAC": "aa"}})
        );
    }

    #[test]
    fn sys_name_selector_uses_its_own_key() {
        let sel = ModuleSelector::HostPortSysName(HostPortBySysName {
            sys_name: "sw1".into(),
            port_id_subtype: "ifName".into(),
            port_id: "Eth1/1".into(),
        });
        let value = serde_json::to_value(&sel).unwrap();
        assert!(value.get("hostPortSelectorBySysName").is_some());
    }

    #[test]
    fn parses_server_selector() {
        let sel: ModuleSelector =
            serde_json::from_value(json!({"moduleSelectorByModuleSerialNumber": {"moduleSerialNumber": "SN1"}}))
                .unwrap();
        assert_eq!(sel.target_key(), TargetKey::ModuleSerialNumber("SN1"));
    }

    #[test]
    fn same_target_ignores_interface_for_module_variants() {
        assert!(by_name("HubA", "XR-T1").same_target(&by_name("HubA", "XR-T2")));
        assert!(!by_name("HubA", "XR-T1").same_target(&by_name("LeafB", "XR-T1")));
    }

    #[test]
    fn same_target_requires_same_variant() {
        let by_id = InterfaceSelector::ModuleId(ClientIf {
            module: ById {
                module_id: "HubA".into(),
            },
            client_if_aid: "XR-T1".into(),
        });
        assert!(!by_id.same_target(&by_name("HubA", "XR-T1")));
    }
}
