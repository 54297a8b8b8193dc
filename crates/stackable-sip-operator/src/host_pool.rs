//! Component A: the view of the shared `BareMetalHost` pool the scheduler works from.
//!
//! Grounded on `MachineList.getBMHs` and `MachineList.countScheduledAndTobeScheduled` in the
//! original scheduler, which list hosts missing the cluster-claim label and hosts already
//! carrying a given cluster's claim label, respectively.

use kube::api::ListParams;
use snafu::{ResultExt, Snafu};

use stackable_operator::client::Client;

use crate::{bmh::BareMetalHost, machine::Role, CLUSTER_LABEL, NODE_TYPE_LABEL};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to list BareMetalHosts"))]
    List { source: stackable_operator::client::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Lists every `BareMetalHost` in `namespace` that carries no cluster-claim label, sorted by
/// name so the scheduler's first-fit walk is deterministic across reconciles.
pub async fn list_unclaimed(client: &Client, namespace: &str) -> Result<Vec<BareMetalHost>> {
    let list_params = ListParams::default().labels(&format!("!{CLUSTER_LABEL}"));
    let mut hosts = client
        .list::<BareMetalHost>(namespace, &list_params)
        .await
        .context(ListSnafu)?;
    hosts.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
    Ok(hosts)
}

/// Lists every `BareMetalHost` in `namespace` already claimed by `cluster_key` (see
/// [`crate::cluster_key`]) for `role`, sorted by name.
pub async fn list_claimed_by(
    client: &Client,
    namespace: &str,
    cluster_key: &str,
    role: Role,
) -> Result<Vec<BareMetalHost>> {
    let list_params = ListParams::default().labels(&format!(
        "{CLUSTER_LABEL}={cluster_key},{NODE_TYPE_LABEL}={}",
        role.label_value()
    ));
    let mut hosts = client
        .list::<BareMetalHost>(namespace, &list_params)
        .await
        .context(ListSnafu)?;
    hosts.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
    Ok(hosts)
}
