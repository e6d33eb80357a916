// ── Selector blocks ──
//
// The configuration-side shape of a selector: one optional nested block
// per variant, in snake_case. Exactly one block may be set. Conversion
// to and from the wire enums in `ipm_api::selector` happens here and
// nowhere else.

use ipm_api::selector::{
    ById, ByMac, ByName, BySerialNumber, ClientIf, HostPortById, HostPortByName,
    HostPortBySourceMac, HostPortBySysName,
};
use ipm_api::{InterfaceSelector, ModuleSelector};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schema::{AttrType, Attribute, SchemaType};

// ── Variant fields ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleId {
    pub module_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleName {
    pub module_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMac {
    pub module_mac: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSerialNumber {
    pub module_serial_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPortName {
    pub host_name: String,
    pub host_port_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPortId {
    pub chassis_id_subtype: String,
    pub chassis_id: String,
    pub port_id_subtype: String,
    pub port_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPortSysName {
    pub sys_name: String,
    pub port_id_subtype: String,
    pub port_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPortSourceMac {
    pub port_source_mac: String,
}

/// A module variant plus the client interface AID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfOn<M> {
    #[serde(flatten)]
    pub module: M,
    pub module_client_if_aid: String,
}

// ── Blocks ──────────────────────────────────────────────────────────

/// Selects a whole module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSelectorBlock {
    pub module_selector_by_module_id: Option<ModuleId>,
    pub module_selector_by_module_name: Option<ModuleName>,
    pub module_selector_by_module_mac: Option<ModuleMac>,
    pub module_selector_by_module_serial_number: Option<ModuleSerialNumber>,
    pub host_port_selector_by_name: Option<HostPortName>,
    pub host_port_selector_by_port_id: Option<HostPortId>,
    pub host_port_selector_by_sys_name: Option<HostPortSysName>,
    pub host_port_selector_by_port_source_mac: Option<HostPortSourceMac>,
}

/// Selects one client interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IfSelectorBlock {
    pub module_if_selector_by_module_id: Option<IfOn<ModuleId>>,
    pub module_if_selector_by_module_name: Option<IfOn<ModuleName>>,
    pub module_if_selector_by_module_mac: Option<IfOn<ModuleMac>>,
    pub module_if_selector_by_module_serial_number: Option<IfOn<ModuleSerialNumber>>,
    pub host_port_selector_by_name: Option<HostPortName>,
    pub host_port_selector_by_port_id: Option<HostPortId>,
    pub host_port_selector_by_sys_name: Option<HostPortSysName>,
    pub host_port_selector_by_port_source_mac: Option<HostPortSourceMac>,
}

fn exclusive(set: usize, what: &str) -> Result<(), CoreError> {
    if set > 1 {
        return Err(CoreError::config(format!(
            "{what}: exactly one selector variant may be set, found {set}"
        )));
    }
    Ok(())
}

impl ModuleSelectorBlock {
    pub fn variants_set(&self) -> usize {
        [
            self.module_selector_by_module_id.is_some(),
            self.module_selector_by_module_name.is_some(),
            self.module_selector_by_module_mac.is_some(),
            self.module_selector_by_module_serial_number.is_some(),
            self.host_port_selector_by_name.is_some(),
            self.host_port_selector_by_port_id.is_some(),
            self.host_port_selector_by_sys_name.is_some(),
            self.host_port_selector_by_port_source_mac.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.variants_set() == 0
    }

    /// Reject more than one variant. An empty block passes.
    pub fn validate(&self) -> Result<(), CoreError> {
        exclusive(self.variants_set(), "module selector")
    }

    /// The wire selector, or `None` when no variant is set.
    pub fn to_wire(&self) -> Result<Option<ModuleSelector>, CoreError> {
        self.validate()?;
        let sel = if let Some(s) = &self.module_selector_by_module_id {
            ModuleSelector::ModuleId(ById {
                module_id: s.module_id.clone(),
            })
        } else if let Some(s) = &self.module_selector_by_module_name {
            ModuleSelector::ModuleName(ByName {
                module_name: s.module_name.clone(),
            })
        } else if let Some(s) = &self.module_selector_by_module_mac {
            ModuleSelector::ModuleMac(ByMac {
                module_mac: s.module_mac.clone(),
            })
        } else if let Some(s) = &self.module_selector_by_module_serial_number {
            ModuleSelector::ModuleSerialNumber(BySerialNumber {
                module_serial_number: s.module_serial_number.clone(),
            })
        } else if let Some(s) = &self.host_port_selector_by_name {
            ModuleSelector::HostPortName(s.into())
        } else if let Some(s) = &self.host_port_selector_by_port_id {
            ModuleSelector::HostPortId(s.into())
        } else if let Some(s) = &self.host_port_selector_by_sys_name {
            ModuleSelector::HostPortSysName(s.into())
        } else if let Some(s) = &self.host_port_selector_by_port_source_mac {
            ModuleSelector::HostPortSourceMac(s.into())
        } else {
            return Ok(None);
        };
        Ok(Some(sel))
    }

    /// The wire selector; an empty block is a configuration error.
    pub fn require(&self) -> Result<ModuleSelector, CoreError> {
        self.to_wire()?
            .ok_or_else(|| CoreError::config("module selector: one variant must be set"))
    }

    pub fn from_wire(sel: &ModuleSelector) -> Self {
        let mut block = Self::default();
        match sel {
            ModuleSelector::ModuleId(s) => {
                block.module_selector_by_module_id = Some(ModuleId {
                    module_id: s.module_id.clone(),
                });
            }
            ModuleSelector::ModuleName(s) => {
                block.module_selector_by_module_name = Some(ModuleName {
                    module_name: s.module_name.clone(),
                });
            }
            ModuleSelector::ModuleMac(s) => {
                block.module_selector_by_module_mac = Some(ModuleMac {
                    module_mac: s.module_mac.clone(),
                });
            }
            ModuleSelector::ModuleSerialNumber(s) => {
                block.module_selector_by_module_serial_number = Some(ModuleSerialNumber {
                    module_serial_number: s.module_serial_number.clone(),
                });
            }
            ModuleSelector::HostPortName(s) => block.host_port_selector_by_name = Some(s.into()),
            ModuleSelector::HostPortId(s) => block.host_port_selector_by_port_id = Some(s.into()),
            ModuleSelector::HostPortSysName(s) => {
                block.host_port_selector_by_sys_name = Some(s.into());
            }
            ModuleSelector::HostPortSourceMac(s) => {
                block.host_port_selector_by_port_source_mac = Some(s.into());
            }
        }
        block
    }
}

impl IfSelectorBlock {
    pub fn variants_set(&self) -> usize {
        [
            self.module_if_selector_by_module_id.is_some(),
            self.module_if_selector_by_module_name.is_some(),
            self.module_if_selector_by_module_mac.is_some(),
            self.module_if_selector_by_module_serial_number.is_some(),
            self.host_port_selector_by_name.is_some(),
            self.host_port_selector_by_port_id.is_some(),
            self.host_port_selector_by_sys_name.is_some(),
            self.host_port_selector_by_port_source_mac.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.variants_set() == 0
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        exclusive(self.variants_set(), "interface selector")
    }

    pub fn to_wire(&self) -> Result<Option<InterfaceSelector>, CoreError> {
        self.validate()?;
        let sel = if let Some(s) = &self.module_if_selector_by_module_id {
            InterfaceSelector::ModuleId(client_if(s, |m| ById {
                module_id: m.module_id.clone(),
            }))
        } else if let Some(s) = &self.module_if_selector_by_module_name {
            InterfaceSelector::ModuleName(client_if(s, |m| ByName {
                module_name: m.module_name.clone(),
            }))
        } else if let Some(s) = &self.module_if_selector_by_module_mac {
            InterfaceSelector::ModuleMac(client_if(s, |m| ByMac {
                module_mac: m.module_mac.clone(),
            }))
        } else if let Some(s) = &self.module_if_selector_by_module_serial_number {
            InterfaceSelector::ModuleSerialNumber(client_if(s, |m| BySerialNumber {
                module_serial_number: m.module_serial_number.clone(),
            }))
        } else if let Some(s) = &self.host_port_selector_by_name {
            InterfaceSelector::HostPortName(s.into())
        } else if let Some(s) = &self.host_port_selector_by_port_id {
            InterfaceSelector::HostPortId(s.into())
        } else if let Some(s) = &self.host_port_selector_by_sys_name {
            InterfaceSelector::HostPortSysName(s.into())
        } else if let Some(s) = &self.host_port_selector_by_port_source_mac {
            InterfaceSelector::HostPortSourceMac(s.into())
        } else {
            return Ok(None);
        };
        Ok(Some(sel))
    }

    pub fn require(&self) -> Result<InterfaceSelector, CoreError> {
        self.to_wire()?
            .ok_or_else(|| CoreError::config("interface selector: one variant must be set"))
    }

    pub fn from_wire(sel: &InterfaceSelector) -> Self {
        let mut block = Self::default();
        match sel {
            InterfaceSelector::ModuleId(s) => {
                block.module_if_selector_by_module_id = Some(if_on(s, |m| ModuleId {
                    module_id: m.module_id.clone(),
                }));
            }
            InterfaceSelector::ModuleName(s) => {
                block.module_if_selector_by_module_name = Some(if_on(s, |m| ModuleName {
                    module_name: m.module_name.clone(),
                }));
            }
            InterfaceSelector::ModuleMac(s) => {
                block.module_if_selector_by_module_mac = Some(if_on(s, |m| ModuleMac {
                    module_mac: m.module_mac.clone(),
                }));
            }
            InterfaceSelector::ModuleSerialNumber(s) => {
                block.module_if_selector_by_module_serial_number =
                    Some(if_on(s, |m| ModuleSerialNumber {
                        module_serial_number: m.module_serial_number.clone(),
                    }));
            }
            InterfaceSelector::HostPortName(s) => block.host_port_selector_by_name = Some(s.into()),
            InterfaceSelector::HostPortId(s) => {
                block.host_port_selector_by_port_id = Some(s.into());
            }
            InterfaceSelector::HostPortSysName(s) => {
                block.host_port_selector_by_sys_name = Some(s.into());
            }
            InterfaceSelector::HostPortSourceMac(s) => {
                block.host_port_selector_by_port_source_mac = Some(s.into());
            }
        }
        block
    }
}

fn client_if<M, W>(s: &IfOn<M>, module: impl FnOnce(&M) -> W) -> ClientIf<W> {
    ClientIf {
        module: module(&s.module),
        client_if_aid: s.module_client_if_aid.clone(),
    }
}

fn if_on<W, M>(s: &ClientIf<W>, module: impl FnOnce(&W) -> M) -> IfOn<M> {
    IfOn {
        module: module(&s.module),
        module_client_if_aid: s.client_if_aid.clone(),
    }
}

// ── Host port field mapping ─────────────────────────────────────────

impl From<&HostPortName> for HostPortByName {
    fn from(s: &HostPortName) -> Self {
        Self {
            host_name: s.host_name.clone(),
            host_port_name: s.host_port_name.clone(),
        }
    }
}

impl From<&HostPortByName> for HostPortName {
    fn from(s: &HostPortByName) -> Self {
        Self {
            host_name: s.host_name.clone(),
            host_port_name: s.host_port_name.clone(),
        }
    }
}

impl From<&HostPortId> for HostPortById {
    fn from(s: &HostPortId) -> Self {
        Self {
            chassis_id_subtype: s.chassis_id_subtype.clone(),
            chassis_id: s.chassis_id.clone(),
            port_id_subtype: s.port_id_subtype.clone(),
            port_id: s.port_id.clone(),
        }
    }
}

impl From<&HostPortById> for HostPortId {
    fn from(s: &HostPortById) -> Self {
        Self {
            chassis_id_subtype: s.chassis_id_subtype.clone(),
            chassis_id: s.chassis_id.clone(),
            port_id_subtype: s.port_id_subtype.clone(),
            port_id: s.port_id.clone(),
        }
    }
}

impl From<&HostPortSysName> for HostPortBySysName {
    fn from(s: &HostPortSysName) -> Self {
        Self {
            sys_name: s.sys_name.clone(),
            port_id_subtype: s.port_id_subtype.clone(),
            port_id: s.port_id.clone(),
        }
    }
}

impl From<&HostPortBySysName> for HostPortSysName {
    fn from(s: &HostPortBySysName) -> Self {
        Self {
            sys_name: s.sys_name.clone(),
            port_id_subtype: s.port_id_subtype.clone(),
            port_id: s.port_id.clone(),
        }
    }
}

impl From<&HostPortSourceMac> for HostPortBySourceMac {
    fn from(s: &HostPortSourceMac) -> Self {
        Self {
            port_source_mac: s.port_source_mac.clone(),
        }
    }
}

impl From<&HostPortBySourceMac> for HostPortSourceMac {
    fn from(s: &HostPortBySourceMac) -> Self {
        Self {
            port_source_mac: s.port_source_mac.clone(),
        }
    }
}

// ── Schema ──────────────────────────────────────────────────────────

fn fields(names: &[&'static str]) -> AttrType {
    AttrType::Object {
        attributes: names
            .iter()
            .map(|&n| Attribute::required(n, AttrType::String))
            .collect(),
    }
}

fn host_port_variants() -> Vec<Attribute> {
    vec![
        Attribute::optional(
            "host_port_selector_by_name",
            fields(&["host_name", "host_port_name"]),
        ),
        Attribute::optional(
            "host_port_selector_by_port_id",
            fields(&["chassis_id_subtype", "chassis_id", "port_id_subtype", "port_id"]),
        ),
        Attribute::optional(
            "host_port_selector_by_sys_name",
            fields(&["sys_name", "port_id_subtype", "port_id"]),
        ),
        Attribute::optional(
            "host_port_selector_by_port_source_mac",
            fields(&["port_source_mac"]),
        ),
    ]
}

impl SchemaType for ModuleSelectorBlock {
    fn attributes() -> Vec<Attribute> {
        let mut attrs = vec![
            Attribute::optional("module_selector_by_module_id", fields(&["module_id"])),
            Attribute::optional("module_selector_by_module_name", fields(&["module_name"])),
            Attribute::optional("module_selector_by_module_mac", fields(&["module_mac"])),
            Attribute::optional(
                "module_selector_by_module_serial_number",
                fields(&["module_serial_number"]),
            ),
        ];
        attrs.extend(host_port_variants());
        attrs
    }
}

impl SchemaType for IfSelectorBlock {
    fn attributes() -> Vec<Attribute> {
        let mut attrs = vec![
            Attribute::optional(
                "module_if_selector_by_module_id",
                fields(&["module_id", "module_client_if_aid"]),
            ),
            Attribute::optional(
                "module_if_selector_by_module_name",
                fields(&["module_name", "module_client_if_aid"]),
            ),
            Attribute::optional(
                "module_if_selector_by_module_mac",
                fields(&["module_mac", "module_client_if_aid"]),
            ),
            Attribute::optional(
                "module_if_selector_by_module_serial_number",
                fields(&["module_serial_number", "module_client_if_aid"]),
            ),
        ];
        attrs.extend(host_port_variants());
        attrs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn two_variants_are_rejected() {
        let block: IfSelectorBlock = serde_json::from_value(json!({
            "module_if_selector_by_module_name": {"module_name": "HubA", "module_client_if_aid": "XR-T1"},
            "module_if_selector_by_module_id": {"module_id": "m-1", "module_client_if_aid": "XR-T1"}
        }))
        .unwrap();
        assert_eq!(block.variants_set(), 2);
        assert!(matches!(block.validate(), Err(CoreError::Config { .. })));
        assert!(block.to_wire().is_err());
    }

    #[test]
    fn empty_block_validates_but_cannot_be_required() {
        let block = IfSelectorBlock::default();
        assert!(block.validate().is_ok());
        assert!(block.to_wire().unwrap().is_none());
        assert!(matches!(block.require(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn snake_case_block_maps_to_wire_keys() {
        let block: IfSelectorBlock = serde_json::from_value(json!({
            "module_if_selector_by_module_mac": {"module_mac": "aa:bb", "module_client_if_aid": "XR-T1"}
        }))
        .unwrap();
        let wire = serde_json::to_value(block.require().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({"moduleIfSelectorByModuleMAC": {"moduleMAC": "aa:bb", "moduleClientIfAid": "XR-T1"}})
        );
    }

    #[test]
    fn wire_round_trip_keeps_variant() {
        let block: ModuleSelectorBlock = serde_json::from_value(json!({
            "host_port_selector_by_sys_name": {"sys_name": "sw1", "port_id_subtype": "ifName", "port_id": "Eth1/1"}
        }))
        .unwrap();
        let wire = block.require().unwrap();
        assert!(matches!(wire, ModuleSelector::HostPortSysName(_)));
        assert_eq!(ModuleSelectorBlock::from_wire(&wire), block);
    }

    #[test]
    fn block_schema_matches_serialized_keys() {
        let value = serde_json::to_value(IfSelectorBlock::default()).unwrap();
        IfSelectorBlock::attribute_type().conforms(&value).unwrap();
        let value = serde_json::to_value(ModuleSelectorBlock::default()).unwrap();
        ModuleSelectorBlock::attribute_type().conforms(&value).unwrap();
    }
}
