// ── Endpoint matching ──
//
// The server returns a connection's endpoints unordered. Each planned
// endpoint, in declaration order, is paired with the first free server
// endpoint that names the same target: exact selector matches are
// paired first, then a match on the variant's discriminating field
// (module name, id, MAC or serial number). Server endpoints without a configured selector
// are compared through the module interface they resolved to.
//
// Each server endpoint pairs with at most one planned endpoint, except
// when the configuration repeats a selector verbatim.

use ipm_api::InterfaceSelector;
use ipm_api::selector::TargetKey;
use ipm_api::types as wire;

/// Resolved module-interface identifiers of an existing endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleIfKeys<'a> {
    pub module_id: Option<&'a str>,
    pub module_name: Option<&'a str>,
    pub module_mac: Option<&'a str>,
    pub module_serial_number: Option<&'a str>,
    pub client_if_aid: Option<&'a str>,
}

/// What matching knows about one existing endpoint.
#[derive(Debug, Clone, Default)]
pub struct Candidate<'a> {
    pub selector: Option<InterfaceSelector>,
    pub module_if: Option<ModuleIfKeys<'a>>,
}

/// Candidate view of an endpoint returned by the server.
pub fn wire_candidate(ep: &wire::Endpoint) -> Candidate<'_> {
    Candidate {
        selector: ep.selector().cloned(),
        module_if: ep.module_if().map(|m| ModuleIfKeys {
            module_id: m.module_id.as_deref(),
            module_name: m.module_name.as_deref(),
            module_mac: m.module_mac.as_deref(),
            module_serial_number: m.module_serial_number.as_deref(),
            client_if_aid: m.client_if_aid.as_deref(),
        }),
    }
}

impl Candidate<'_> {
    fn matches(&self, plan: &InterfaceSelector, exact: bool) -> bool {
        if let Some(sel) = &self.selector {
            return if exact {
                sel == plan
            } else {
                sel.same_target(plan)
            };
        }
        let Some(keys) = &self.module_if else {
            return false;
        };
        let same_module = match plan.target_key() {
            TargetKey::ModuleId(v) => keys.module_id == Some(v),
            TargetKey::ModuleName(v) => keys.module_name == Some(v),
            TargetKey::ModuleMac(v) => keys.module_mac == Some(v),
            TargetKey::ModuleSerialNumber(v) => keys.module_serial_number == Some(v),
            TargetKey::HostPort => false,
        };
        same_module && (!exact || keys.client_if_aid == plan.client_if_aid())
    }
}

/// For each planned selector, the index of the matching candidate.
///
/// Exact matches are paired first, then the remaining planned
/// selectors fall back to the discriminating field. A candidate pairs
/// with at most one planned selector unless the plan repeats that exact
/// selector.
pub fn match_endpoints<T>(
    plan: &[Option<InterfaceSelector>],
    candidates: &[T],
    view: impl Fn(&T) -> Candidate<'_>,
) -> Vec<Option<usize>> {
    pair(plan, candidates, view, true)
}

/// Like [`match_endpoints`] without the discriminating-field fallback.
pub fn match_endpoints_exact<T>(
    plan: &[Option<InterfaceSelector>],
    candidates: &[T],
    view: impl Fn(&T) -> Candidate<'_>,
) -> Vec<Option<usize>> {
    pair(plan, candidates, view, false)
}

fn pair<T>(
    plan: &[Option<InterfaceSelector>],
    candidates: &[T],
    view: impl Fn(&T) -> Candidate<'_>,
    loose: bool,
) -> Vec<Option<usize>> {
    let views: Vec<Candidate<'_>> = candidates.iter().map(view).collect();
    let mut claimed = vec![false; views.len()];
    let mut matched: Vec<Option<usize>> = vec![None; plan.len()];

    for (slot, planned) in plan.iter().enumerate() {
        let Some(planned) = planned else { continue };
        let repeat = repeated(plan, &matched, slot, planned);
        let free = views
            .iter()
            .enumerate()
            .position(|(i, c)| !claimed[i] && c.matches(planned, true));
        matched[slot] = free.or(repeat);
        if let Some(i) = free {
            claimed[i] = true;
        }
    }
    if !loose {
        return matched;
    }

    for (slot, planned) in plan.iter().enumerate() {
        let Some(planned) = planned else { continue };
        if matched[slot].is_some() {
            continue;
        }
        let free = views
            .iter()
            .enumerate()
            .position(|(i, c)| !claimed[i] && c.matches(planned, false));
        if let Some(i) = free {
            claimed[i] = true;
            matched[slot] = Some(i);
        } else {
            matched[slot] = repeated(plan, &matched, slot, planned);
        }
    }
    matched
}

/// The pairing of an earlier planned selector identical to `planned`.
fn repeated(
    plan: &[Option<InterfaceSelector>],
    matched: &[Option<usize>],
    slot: usize,
    planned: &InterfaceSelector,
) -> Option<usize> {
    plan.iter()
        .zip(matched)
        .take(slot)
        .find_map(|(earlier, m)| (earlier.as_ref() == Some(planned)).then_some(*m).flatten())
}
