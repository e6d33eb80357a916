// ipm-api: Async Rust client for the IPM optical constellation management API

pub mod auth;
pub mod client;
pub mod decode;
pub mod error;
pub mod selector;
pub mod transport;
pub mod types;

mod capacities;
mod circuits;
mod connections;
mod networks;

pub use auth::{BearerToken, Credentials};
pub use client::IpmClient;
pub use error::Error;
pub use selector::{InterfaceSelector, ModuleSelector, TargetKey};
pub use transport::{Timeouts, TlsMode, TransportConfig};
