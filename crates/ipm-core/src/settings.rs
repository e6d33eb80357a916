// Reconcile timing
//
// Defaults follow the server's observed convergence times: connection
// reads retry every 3s, network and module reads every 2s.

use std::time::Duration;

use crate::retry::{Backoff, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// Interval between network-connection and transport-capacity reads.
    pub connection_interval: Duration,
    /// Interval between network and module reads.
    pub network_interval: Duration,
    pub backoff: Backoff,
    /// Transport capacity lookups before a connection create gives up.
    pub precondition_attempts: u32,
    pub create_read_attempts: u32,
    pub update_read_attempts: u32,
    pub read_attempts: u32,
    /// Pause before a connection DELETE; the server rejects deletes that
    /// follow the previous operation too closely.
    pub delete_grace: Duration,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            connection_interval: Duration::from_secs(3),
            network_interval: Duration::from_secs(2),
            backoff: Backoff::Fixed,
            precondition_attempts: 5,
            create_read_attempts: 5,
            update_read_attempts: 3,
            read_attempts: 1,
            delete_grace: Duration::from_secs(1),
        }
    }
}

impl ReconcileSettings {
    /// Millisecond timings for tests against a local mock server.
    pub fn fast() -> Self {
        Self {
            connection_interval: Duration::from_millis(5),
            network_interval: Duration::from_millis(5),
            delete_grace: Duration::from_millis(5),
            ..Self::default()
        }
    }

    pub fn connection_retry(&self, attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            interval: self.connection_interval,
            backoff: self.backoff,
        }
    }

    pub fn network_retry(&self, attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            interval: self.network_interval,
            backoff: self.backoff,
        }
    }
}
