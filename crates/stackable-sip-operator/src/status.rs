//! Component G: writes the `SipCluster` status subresource's `Ready` condition.
//!
//! There is no direct Go counterpart for a typed status reporter (the original project reports
//! progress only through structured logs); this follows the same compare-and-set-on-generation,
//! `apply_patch_status` pattern used across Stackable's product operators for their status
//! subresources.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, Time};
use kube::{Resource, ResourceExt};
use snafu::{ResultExt, Snafu};

use stackable_operator::client::Client;

use crate::crd::v1alpha1::{SipCluster, SipClusterStatus};

/// The closed set of reasons this operator reports on a `SipCluster`'s `Ready` condition.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::IntoStaticStr)]
pub enum Reason {
    /// Reconciliation is underway; no terminal outcome yet.
    Progressing,
    /// The scheduler could not find enough matching, unclaimed hosts for some role.
    Unschedulable,
    /// The renderer failed to apply one of the sub-cluster's supporting services.
    InfraServiceFailure,
    /// The claim manager failed to label a selected host.
    UnableToApplyLabels,
    /// The finalizer failed to release claimed hosts during deletion.
    UnableToDecommission,
    /// The sub-cluster is fully scheduled, extrapolated, and rendered.
    ReconciliationSucceeded,
}

impl Reason {
    fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Builds the `Ready` condition reported for `reason`, with `status` true only for
/// [`Reason::ReconciliationSucceeded`].
fn ready_condition(reason: Reason, message: impl Into<String>, observed_generation: i64) -> Condition {
    let status = match reason {
        Reason::ReconciliationSucceeded => "True",
        _ => "False",
    };
    Condition {
        type_: "Ready".to_string(),
        status: status.to_string(),
        reason: reason.as_str().to_string(),
        message: message.into(),
        observed_generation: Some(observed_generation),
        last_transition_time: Time(chrono_now()),
    }
}

/// `k8s_openapi::chrono` isn't available standalone; condition timestamps only need to be
/// monotonic-ish for `kubectl describe` output, so this stamps the current wall-clock time via
/// `std::time`, converted into the RFC 3339 shape `Time` expects.
fn chrono_now() -> k8s_openapi::chrono::DateTime<k8s_openapi::chrono::Utc> {
    k8s_openapi::chrono::Utc::now()
}

/// Patches `cluster`'s `Ready` condition to `reason`/`message` via server-side apply on the
/// status subresource, scoped to `cluster`'s `observed_generation` so a concurrently-applied
/// newer spec is never clobbered by a stale reconcile's status write.
pub async fn report(client: &Client, cluster: &SipCluster, reason: Reason, message: impl Into<String>) -> Result<()> {
    let namespace = cluster.namespace().unwrap_or_default();
    let generation = cluster.meta().generation.unwrap_or_default();

    let status_patch = SipCluster {
        metadata: kube::core::ObjectMeta {
            name: cluster.meta().name.clone(),
            namespace: cluster.meta().namespace.clone(),
            uid: cluster.meta().uid.clone(),
            ..Default::default()
        },
        spec: cluster.spec.clone(),
        status: Some(SipClusterStatus {
            conditions: vec![ready_condition(reason, message, generation)],
        }),
    };

    client
        .apply_patch_status(&namespace, &status_patch)
        .await
        .context(ApplyStatusSnafu)?;
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to patch SipCluster status"))]
    ApplyStatus { source: stackable_operator::client::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reconciliation_succeeded_reports_ready_true() {
        for reason in [
            Reason::Progressing,
            Reason::Unschedulable,
            Reason::InfraServiceFailure,
            Reason::UnableToApplyLabels,
            Reason::UnableToDecommission,
        ] {
            let condition = ready_condition(reason, "test", 1);
            assert_eq!(condition.status, "False");
        }

        let condition = ready_condition(Reason::ReconciliationSucceeded, "test", 1);
        assert_eq!(condition.status, "True");
    }

    #[test]
    fn reason_strings_are_stable() {
        assert_eq!(Reason::Progressing.as_str(), "Progressing");
        assert_eq!(Reason::Unschedulable.as_str(), "Unschedulable");
        assert_eq!(Reason::InfraServiceFailure.as_str(), "InfraServiceFailure");
        assert_eq!(Reason::UnableToApplyLabels.as_str(), "UnableToApplyLabels");
        assert_eq!(Reason::UnableToDecommission.as_str(), "UnableToDecommission");
        assert_eq!(Reason::ReconciliationSucceeded.as_str(), "ReconciliationSucceeded");
    }
}
