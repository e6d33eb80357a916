//! Reconciliation engine for the IPM optical-network provider.
//!
//! Sits between `ipm-api` (wire types, HTTP) and the host runtime:
//!
//! - **[`Provider`]**: facade configured once from a [`ProviderConfig`].
//!   Dispatches create/read/update/delete/import and data-source reads by
//!   type name through the [`Registry`].
//!
//! - **Reconcilers** ([`reconcile`]): one per resource type. The network
//!   connection reconciler owns the transport-capacity precondition,
//!   read-back convergence, endpoint matching and membership diffs.
//!
//! - **Schema model** ([`model`]): snake_case documents whose declared
//!   attributes are tri-state [`Attr`] values. [`convert`] projects
//!   server payloads onto them without turning omitted attributes into
//!   server defaults.
//!
//! - **[`RetryPolicy`]**: the one retry loop shared by every convergence
//!   wait, driven by [`CoreError::is_retryable`].

pub mod attr;
pub mod config;
pub mod convert;
pub mod data;
pub mod error;
pub mod filter;
pub mod matching;
pub mod model;
pub mod provider;
pub mod reconcile;
pub mod registry;
pub mod retry;
pub mod schema;
pub mod session;
pub mod settings;

// ── Primary re-exports ──────────────────────────────────────────────
pub use attr::{Attr, UNKNOWN};
pub use config::{ProviderConfig, TlsVerification};
pub use error::{CoreError, Diagnostic, Severity};
pub use provider::Provider;
pub use registry::{ProviderSchema, Registry, TYPE_PREFIX};
pub use retry::{Backoff, RetryPolicy};
pub use schema::{AttrType, Attribute, Mode, Schema, SchemaType};
pub use session::Session;
pub use settings::ReconcileSettings;
