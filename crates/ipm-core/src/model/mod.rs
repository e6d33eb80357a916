// ── Schema model ──
//
// The host-facing shape of every resource: snake_case keys, tri-state
// declared attributes and computed blocks filled from server data.

pub mod capacity;
pub mod circuit;
pub mod common;
pub mod connection;
pub mod endpoint;
pub mod module;
pub mod network;
pub mod reachable;
pub mod selector;

// ── Re-exports ──────────────────────────────────────────────────────

pub use capacity::{CapacityConfig, CapacityEndpoint, CapacityState, TransportCapacity};
pub use circuit::{Ac, AcState, Lc, LcState};
pub use common::{CauseError, HostPort, LifecycleCause};
pub use connection::{ConnectionConfig, ConnectionState, NetworkConnection};
pub use endpoint::{ConnectionEndpoint, EndpointState, ModuleIf, NcEndpoint};
pub use module::{Module, ModuleConfig, ModuleSettings, ModuleState};
pub use network::{AvailableService, ControlLink, Network, NetworkConfig, NetworkState};
pub use reachable::{ReachableModule, ReachableState};
pub use selector::{IfSelectorBlock, ModuleSelectorBlock};
