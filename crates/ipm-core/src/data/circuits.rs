use async_trait::async_trait;
use ipm_api::types as wire;
use serde::{Deserialize, Serialize};

use super::{DataSource, fetch};
use crate::attr::Attr;
use crate::convert::{project_ac, project_lc};
use crate::error::CoreError;
use crate::model::{Ac, Lc};
use crate::schema::{AttrType, Attribute, SchemaType};
use crate::session::Session;

/// Keep items whose parent is `parent`, when one is given.
fn under<'a, T>(
    items: &'a [T],
    parent: Option<&'a str>,
    parent_of: impl Fn(&T) -> Option<&str> + 'a,
) -> impl Iterator<Item = &'a T> + 'a {
    items
        .iter()
        .filter(move |item| parent.is_none_or(|p| parent_of(item) == Some(p)))
}

// ── ipm_nc_acs ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcsData {
    pub id: Attr<String>,
    pub endpoint_id: Attr<String>,
    pub acs: Vec<Ac>,
}

impl SchemaType for AcsData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("id", AttrType::String),
            Attribute::optional("endpoint_id", AttrType::String),
            Attribute::computed("acs", AttrType::list_of::<Ac>()),
        ]
    }
}

pub struct Acs;

#[async_trait]
impl DataSource for Acs {
    type Model = AcsData;

    async fn read(&self, session: &Session, query: AcsData) -> Result<AcsData, CoreError> {
        let client = session.client();
        let found = match query.id.as_deref() {
            Some(id) => vec![fetch(session, "ac lookup", |_| client.get_ac(id)).await?],
            None => fetch(session, "ac list", |_| client.list_acs()).await?,
        };
        let template = Ac {
            id: Attr::Unknown,
            ..Ac::default()
        };
        let acs = under(&found, query.endpoint_id.as_deref(), |ac: &wire::Ac| {
            ac.parent_id.as_deref()
        })
        .map(|ac| project_ac(&template, ac))
        .collect();
        Ok(AcsData { acs, ..query })
    }
}

// ── ipm_nc_lcs ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcsData {
    pub id: Attr<String>,
    pub nc_id: Attr<String>,
    pub lcs: Vec<Lc>,
}

impl SchemaType for LcsData {
    fn attributes() -> Vec<Attribute> {
        vec![
            Attribute::optional("id", AttrType::String),
            Attribute::optional("nc_id", AttrType::String),
            Attribute::computed("lcs", AttrType::list_of::<Lc>()),
        ]
    }
}

pub struct Lcs;

#[async_trait]
impl DataSource for Lcs {
    type Model = LcsData;

    async fn read(&self, session: &Session, query: LcsData) -> Result<LcsData, CoreError> {
        let client = session.client();
        let found = match query.id.as_deref() {
            Some(id) => vec![fetch(session, "lc lookup", |_| client.get_lc(id)).await?],
            None => fetch(session, "lc list", |_| client.list_lcs()).await?,
        };
        let template = Lc {
            id: Attr::Unknown,
            ..Lc::default()
        };
        let lcs = under(&found, query.nc_id.as_deref(), |lc: &wire::Lc| {
            lc.parent_id.as_deref()
        })
        .map(|lc| project_lc(&template, lc))
        .collect();
        Ok(LcsData { lcs, ..query })
    }
}
