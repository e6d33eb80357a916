// ── Marshaller: wire documents ↔ schema model ──
//
// Server payloads (`ipm_api::types`, camelCase) are projected onto the
// schema model (snake_case, tri-state). Key renaming is enumerated field
// by field in the struct definitions on both sides; the functions here
// only move values.
//
// Projection rules: declared attributes go through `Attr::refresh` so
// that omitted attributes stay null; computed attributes go through
// `Attr::computed`. Request bodies are built from known plan values only.

mod capacity;
mod common;
mod connection;
mod module;
mod network;

pub use capacity::{capacity_create, project_capacity};
pub use connection::{
    connection_create, endpoint_create, project_ac, project_connection, project_lc,
    project_nc_endpoint,
};
pub use module::{project_module, project_reachable};
pub use network::{network_create, project_network};

use ipm_api::types::id_from_href;

/// Server id of an object: its `id`, else the last `href` segment.
pub(crate) fn server_id(id: Option<&String>, href: Option<&String>) -> Option<String> {
    id.cloned()
        .or_else(|| href.and_then(|h| id_from_href(h)).map(str::to_owned))
}
