//! Component E: owns the claim labels ([`crate::CLUSTER_LABEL`], [`crate::NODE_TYPE_LABEL`])
//! that mark a `BareMetalHost` as belonging to a `SipCluster`.
//!
//! Grounded on `MachineList.ApplyLabels`/`RemoveLabels` in the original scheduler. Applied as a
//! server-side apply patch scoped to just `metadata.labels` (rather than a full object update, or
//! server-side apply of the whole host), so this operator only ever owns its two labels and never
//! contends with Metal3's own controller over the rest of a host's spec, while still getting the
//! API server's field-manager conflict detection if another claimant raced it onto the same host.

use kube::{
    Api, Resource,
    api::{ListParams, Patch, PatchParams},
};
use serde_json::{Map, Value, json};
use snafu::{ResultExt, Snafu};

use stackable_operator::client::Client;

use crate::{
    CLUSTER_LABEL, NODE_TYPE_LABEL,
    bmh::BareMetalHost,
    machine::{MachineList, ScheduleState},
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to patch claim labels on BareMetalHost {host}"))]
    Patch { source: kube::Error, host: String },

    #[snafu(display("BareMetalHost {host} was claimed by another field manager before this patch landed"))]
    ClaimConflict { source: kube::Error, host: String },

    #[snafu(display("failed to list BareMetalHosts claimed by {cluster_key}"))]
    ListClaimed {
        source: stackable_operator::client::Error,
        cluster_key: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Lists every `BareMetalHost` in `namespace` still carrying `cluster_key`'s claim label,
/// regardless of role. Used by the finalizer path to find everything that needs releasing,
/// since by then the `SipCluster`'s spec may no longer be available to derive a `MachineList`
/// from.
pub async fn reconstruct_claimed(client: &Client, namespace: &str, cluster_key: &str) -> Result<Vec<BareMetalHost>> {
    let list_params = ListParams::default().labels(&format!("{CLUSTER_LABEL}={cluster_key}"));
    client
        .list::<BareMetalHost>(namespace, &list_params)
        .await
        .context(ListClaimedSnafu {
            cluster_key: cluster_key.to_string(),
        })
}

/// Labels every newly-selected machine in `machines` with `cluster_key` and its assigned role.
/// Machines already [`ScheduleState::Scheduled`] from a previous reconcile are left untouched,
/// since they already carry these labels.
pub async fn apply(client: &Client, namespace: &str, cluster_key: &str, machines: &MachineList) -> Result<()> {
    let api: Api<BareMetalHost> = client.get_api(namespace);
    for machine in machines.iter().filter(|m| m.schedule_state == ScheduleState::ToBeScheduled) {
        let name = machine.name();
        let mut labels = Map::new();
        labels.insert(CLUSTER_LABEL.to_string(), Value::String(cluster_key.to_string()));
        labels.insert(NODE_TYPE_LABEL.to_string(), Value::String(machine.role.label_value().to_string()));
        let patch = labels_patch(&name, labels);

        apply_labels(&api, client, &name, &patch).await?;
    }
    Ok(())
}

/// Removes the claim labels from every named host, e.g. when a `SipCluster` is being deleted.
pub async fn release(client: &Client, namespace: &str, host_names: &[String]) -> Result<()> {
    let api: Api<BareMetalHost> = client.get_api(namespace);
    for name in host_names {
        let mut labels = Map::new();
        labels.insert(CLUSTER_LABEL.to_string(), Value::Null);
        labels.insert(NODE_TYPE_LABEL.to_string(), Value::Null);
        let patch = labels_patch(name, labels);

        apply_labels(&api, client, name, &patch).await?;
    }
    Ok(())
}

fn labels_patch(name: &str, labels: Map<String, Value>) -> Value {
    json!({
        "apiVersion": BareMetalHost::api_version(&()),
        "kind": BareMetalHost::kind(&()),
        "metadata": { "name": name, "labels": labels },
    })
}

/// Server-side applies `patch` onto `name`, scoped to this operator's field manager, translating
/// an API-server conflict (another field manager owns one of these labels) into
/// [`Error::ClaimConflict`] rather than the generic [`Error::Patch`].
async fn apply_labels(api: &Api<BareMetalHost>, client: &Client, name: &str, patch: &Value) -> Result<()> {
    let patch_params = PatchParams::apply(client.field_manager());
    api.patch(name, &patch_params, &Patch::Apply(patch))
        .await
        .map(|_| ())
        .map_err(|source| match source {
            kube::Error::Api(ref api_error) if api_error.code == 409 => Error::ClaimConflict {
                source,
                host: name.to_string(),
            },
            source => Error::Patch {
                source,
                host: name.to_string(),
            },
        })
}
