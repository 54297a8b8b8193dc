//! Component C: the deterministic, name-sorted first-fit scheduler.
//!
//! Grounded on `MachineList.scheduleIt`/`ScheduleSet` in the original scheduler: for each role,
//! work out how many hosts are still missing after accounting for hosts already claimed, then
//! walk the sorted candidate list once, skipping hosts that don't match the role's selector or
//! that would occupy an already-occupied topology domain.

use std::collections::{BTreeMap, HashSet};

use kube::ResourceExt;
use snafu::Snafu;

use crate::{
    bmh::BareMetalHost,
    constraints::{matches_selector, topology_domain},
    crd::v1alpha1::{NodeSet, Nodes},
    machine::{Machine, MachineList, Role, ScheduleState},
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("could not find enough BareMetalHosts for role {role} (needed {needed}, found {found})"))]
    CannotFullySchedule { role: Role, needed: u16, found: u16 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn host_labels(host: &BareMetalHost) -> BTreeMap<String, String> {
    host.metadata.labels.clone().unwrap_or_default()
}

fn node_set_for_role(nodes: &Nodes, role: Role) -> &NodeSet {
    match role {
        Role::ControlPlane => &nodes.control_plane,
        Role::Worker => &nodes.worker,
    }
}

/// Inserts a [`Machine`] in state [`ScheduleState::Scheduled`] for every host in `claimed` that
/// isn't already represented in `machines`, for hosts a previous reconcile already claimed for
/// `role` (see [`crate::host_pool::list_claimed_by`]). Hosts that no longer satisfy
/// [`Machine::new`]'s requirements are skipped with a warning; a future scheduling pass will then
/// try to claim a replacement for the resulting deficit.
pub fn reconstruct_role_claims(machines: &mut MachineList, role: Role, claimed: Vec<BareMetalHost>) {
    for host in claimed {
        let name = host.name_any();
        if machines.contains(&name) {
            continue;
        }
        match Machine::new(host, role, ScheduleState::Scheduled) {
            Ok(machine) => machines.insert(machine),
            Err(source) => {
                tracing::warn!(host = name, %source, "claimed BareMetalHost did not meet scheduling requirements");
            }
        }
    }
}

/// Fills any deficit left in `machines` for each role in `nodes`, matching candidates from
/// `unclaimed` (expected to be sorted by name) against that role's selector and topology
/// constraint, in order.
pub fn schedule(machines: &mut MachineList, nodes: &Nodes, unclaimed: &[BareMetalHost]) -> Result<()> {
    for role in Role::ALL {
        schedule_role(machines, role, node_set_for_role(nodes, role), unclaimed)?;
    }
    Ok(())
}

fn schedule_role(machines: &mut MachineList, role: Role, node_set: &NodeSet, candidates: &[BareMetalHost]) -> Result<()> {
    let needed = node_set.count.total();
    let mut deficit = needed.saturating_sub(machines.ready_for_schedule_count(role));
    if deficit == 0 {
        return Ok(());
    }

    let mut used_domains: HashSet<String> = HashSet::new();

    for host in candidates {
        if deficit == 0 {
            break;
        }

        let name = host.name_any();
        if machines.contains(&name) {
            continue;
        }

        let labels = host_labels(host);
        if !matches_selector(&labels, &node_set.selector) {
            continue;
        }

        if let Some(topology_key) = &node_set.topology_key {
            if let Some(domain) = topology_domain(&labels, topology_key) {
                if !used_domains.insert(domain.to_string()) {
                    // Domain already occupied by an earlier pick for this role; skip.
                    continue;
                }
            }
        }

        match Machine::new(host.clone(), role, ScheduleState::ToBeScheduled) {
            Ok(machine) => {
                machines.insert(machine);
                deficit -= 1;
            }
            Err(source) => {
                tracing::warn!(host = name, %source, "skipping BareMetalHost that did not meet scheduling requirements");
            }
        }
    }

    if deficit > 0 {
        return CannotFullyScheduleSnafu {
            role,
            needed,
            found: needed - deficit,
        }
        .fail();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
    use kube::core::ObjectMeta;

    use super::*;
    use crate::{
        bmh::{BareMetalHostSpec, Bmc},
        crd::v1alpha1::NodeCount,
    };

    fn host(name: &str, labels: &[(&str, &str)]) -> BareMetalHost {
        BareMetalHost {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                labels: Some(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()),
                ..Default::default()
            },
            spec: BareMetalHostSpec {
                bmc: Bmc {
                    address: "redfish://bmc".to_string(),
                    credentials_name: "bmc-creds".to_string(),
                },
                network_data: Some(k8s_openapi::api::core::v1::SecretReference {
                    name: Some("net-data".to_string()),
                    namespace: Some("default".to_string()),
                }),
            },
        }
    }

    fn node_set(active: u16, topology_key: Option<&str>) -> NodeSet {
        NodeSet {
            selector: LabelSelector::default(),
            topology_key: topology_key.map(str::to_string),
            count: NodeCount { active, standby: 0 },
        }
    }

    fn nodes(control_plane: NodeSet, worker: NodeSet) -> Nodes {
        Nodes { control_plane, worker }
    }

    #[test]
    fn schedules_up_to_the_requested_count() {
        let mut machines = MachineList::new();
        let candidates = vec![host("a", &[]), host("b", &[]), host("c", &[])];
        let nodes = nodes(node_set(2, None), node_set(0, None));

        schedule(&mut machines, &nodes, &candidates).unwrap();

        assert_eq!(machines.by_role(Role::ControlPlane).count(), 2);
        assert_eq!(machines.by_role(Role::Worker).count(), 0);
    }

    #[test]
    fn fails_when_not_enough_candidates_match() {
        let mut machines = MachineList::new();
        let candidates = vec![host("a", &[])];
        let nodes = nodes(node_set(2, None), node_set(0, None));

        let err = schedule(&mut machines, &nodes, &candidates).unwrap_err();
        assert!(matches!(
            err,
            Error::CannotFullySchedule {
                role: Role::ControlPlane,
                needed: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn topology_key_limits_one_pick_per_domain() {
        let mut machines = MachineList::new();
        let candidates = vec![
            host("a", &[("rack", "1")]),
            host("b", &[("rack", "1")]),
            host("c", &[("rack", "2")]),
        ];
        let nodes = nodes(node_set(2, Some("rack")), node_set(0, None));

        schedule(&mut machines, &nodes, &candidates).unwrap();

        let picked: Vec<_> = machines.by_role(Role::ControlPlane).map(|m| m.name()).collect();
        assert_eq!(picked, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn hosts_missing_topology_label_are_unconstrained() {
        let mut machines = MachineList::new();
        let candidates = vec![host("a", &[]), host("b", &[])];
        let nodes = nodes(node_set(2, Some("rack")), node_set(0, None));

        schedule(&mut machines, &nodes, &candidates).unwrap();
        assert_eq!(machines.by_role(Role::ControlPlane).count(), 2);
    }

    #[test]
    fn already_claimed_machines_reduce_the_deficit() {
        let mut machines = MachineList::new();
        reconstruct_role_claims(&mut machines, Role::ControlPlane, vec![host("already-claimed", &[])]);
        let candidates = vec![host("a", &[])];
        let nodes = nodes(node_set(2, None), node_set(0, None));

        schedule(&mut machines, &nodes, &candidates).unwrap();
        assert_eq!(machines.by_role(Role::ControlPlane).count(), 2);
    }
}
