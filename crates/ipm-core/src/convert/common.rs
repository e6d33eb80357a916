use ipm_api::types as wire;

use crate::model::{CauseError, HostPort, LifecycleCause};

impl From<&wire::HostPort> for HostPort {
    fn from(hp: &wire::HostPort) -> Self {
        Self {
            chassis_id_subtype: hp.chassis_id_subtype.clone(),
            chassis_id: hp.chassis_id.clone(),
            port_id_subtype: hp.port_id_subtype.clone(),
            port_id: hp.port_id.clone(),
            sys_name: hp.sys_name.clone(),
            port_descr: hp.port_descr.clone(),
            port_source_mac: hp.port_source_mac.clone(),
        }
    }
}

impl From<&wire::LifecycleStateCause> for LifecycleCause {
    fn from(cause: &wire::LifecycleStateCause) -> Self {
        Self {
            action: cause.action.clone(),
            timestamp: cause.timestamp.clone(),
            trace_id: cause.trace_id.clone(),
            errors: cause
                .errors
                .iter()
                .map(|e| CauseError {
                    code: e.code.clone(),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }
}
