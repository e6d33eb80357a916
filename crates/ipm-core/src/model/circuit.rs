// ── Attachment circuits and line carriers ──
//
// Both are created by the server as part of a network connection; the
// resources only read them.

use serde::{Deserialize, Serialize};

use crate::attr::Attr;
use crate::schema::{AttrType, Attribute, SchemaType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcState {
    pub col_id: Option<i64>,
    pub capacity: Option<i64>,
    pub imc: Option<String>,
    pub imc_outer_vid: Option<String>,
    pub emc: Option<String>,
    pub emc_outer_vid: Option<String>,
    pub ac_ctrl: Option<String>,
    pub lifecycle_state: Option<String>,
}

impl SchemaType for AcState {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::computed("col_id", AttrType::Int64),
            Attribute::computed("capacity", AttrType::Int64),
            Attribute::computed("imc", AttrType::String),
            Attribute::computed("imc_outer_vid", AttrType::String),
            Attribute::computed("emc", AttrType::String),
            Attribute::computed("emc_outer_vid", AttrType::String),
            Attribute::computed("ac_ctrl", AttrType::String),
            Attribute::computed("lifecycle_state", AttrType::String),
        ]
    }
}

/// `ipm_nc_ac`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ac {
    pub id: Attr<String>,
    pub href: Attr<String>,
    /// Owning endpoint.
    pub parent_id: Attr<String>,
    pub state: Attr<AcState>,
}

impl SchemaType for Ac {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::computed("parent_id", AttrType::String),
            Attribute::computed("state", AttrType::object::<AcState>()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcState {
    pub col_id: Option<i64>,
    pub lc_aid: Option<String>,
    pub direction: Option<String>,
    pub lc_ctrl: Option<String>,
    pub module_id: Option<String>,
    pub client_aid: Option<String>,
    pub dscg_aid: Option<String>,
    pub mac_address: Option<String>,
    pub line_aid: Option<String>,
    pub remote_module_id: Option<String>,
    pub remote_client_id: Option<String>,
    pub lifecycle_state: Option<String>,
}

impl SchemaType for LcState {
    fn attributes() -> Vec<Attribute> {
        let mut attrs = vec![Attribute::computed("col_id", AttrType::Int64)];
        attrs.extend(
            [
                "lc_aid",
                "direction",
                "lc_ctrl",
                "module_id",
                "client_aid",
                "dscg_aid",
                "mac_address",
                "line_aid",
                "remote_module_id",
                "remote_client_id",
                "lifecycle_state",
            ]
            .into_iter()
            .map(|name| Attribute::computed(name, AttrType::String)),
        );
        attrs
    }
}

/// `ipm_nc_lc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lc {
    pub id: Attr<String>,
    pub href: Attr<String>,
    /// Owning network connection.
    pub parent_id: Attr<String>,
    pub state: Attr<LcState>,
}

impl SchemaType for Lc {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::required("id", AttrType::String),
            Attribute::computed("href", AttrType::String),
            Attribute::computed("parent_id", AttrType::String),
            Attribute::computed("state", AttrType::object::<LcState>()),
        ]
    }
}
