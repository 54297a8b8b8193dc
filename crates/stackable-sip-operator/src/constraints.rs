//! Pure predicate logic the scheduler uses to decide whether a candidate host is eligible for a
//! role, and which anti-affinity domain it occupies.
//!
//! Deliberately has no Kubernetes API access: everything here operates on labels already in
//! hand, so it can be exercised with plain unit tests instead of a cluster fixture.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};

/// Reports whether `labels` satisfies every `match_labels` entry and `match_expressions`
/// requirement of `selector`. An empty selector matches everything.
pub fn matches_selector(labels: &BTreeMap<String, String>, selector: &LabelSelector) -> bool {
    let match_labels_ok = selector
        .match_labels
        .as_ref()
        .is_none_or(|required| required.iter().all(|(k, v)| labels.get(k) == Some(v)));

    let expressions_ok = selector
        .match_expressions
        .as_ref()
        .is_none_or(|reqs| reqs.iter().all(|req| matches_requirement(labels, req)));

    match_labels_ok && expressions_ok
}

fn matches_requirement(labels: &BTreeMap<String, String>, req: &LabelSelectorRequirement) -> bool {
    let values = req.values.as_deref().unwrap_or_default();
    match req.operator.as_str() {
        "In" => labels.get(&req.key).is_some_and(|v| values.contains(v)),
        "NotIn" => labels.get(&req.key).is_none_or(|v| !values.contains(v)),
        "Exists" => labels.contains_key(&req.key),
        "DoesNotExist" => !labels.contains_key(&req.key),
        // An operator this crate doesn't recognize can never be satisfied.
        _ => false,
    }
}

/// The anti-affinity domain `labels` occupies under `topology_key`, if any.
///
/// A host missing the topology label occupies no domain and is scheduled as if the constraint
/// didn't apply, matching the behavior documented for `NodeSet::topology_key`.
pub fn topology_domain<'a>(labels: &'a BTreeMap<String, String>, topology_key: &str) -> Option<&'a str> {
    labels.get(topology_key).map(String::as_str)
}
