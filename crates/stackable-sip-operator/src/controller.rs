//! Component F: the reconciliation driver wiring every other component into one
//! [`kube::runtime::Controller`] loop.
//!
//! Grounded on `Reconcile` in the original controller: on every pass, gather the current
//! `BareMetalHost` pool, schedule any deficit, extrapolate the network/BMC data the configured
//! services need, render those services, and finally commit the claim labels. A scheduling or
//! extrapolation failure doesn't fail the whole pass outright; it retries from a fresh schedule up
//! to [`MAX_SCHEDULE_ATTEMPTS`] times, since a different pick of candidate hosts may succeed where
//! the previous one didn't.
//!
//! Unlike the original's hand-rolled finalizer string list, deletion is gated by
//! [`kube::runtime::finalizer`], and BareMetalHost changes are picked up through a secondary watch
//! keyed off [`crate::CLUSTER_LABEL`] rather than Kubernetes owner references, since claimed hosts
//! are never actually owned by the `SipCluster` that claims them.

use std::{sync::Arc, time::Duration};

use kube::{
    Api, ResourceExt,
    runtime::{
        controller::Action,
        finalizer::{Event as FinalizerEvent, finalizer},
        reflector::ObjectRef,
    },
};
use snafu::ResultExt;

use stackable_operator::client::Client;

use crate::{
    CLUSTER_LABEL, claim, cluster_key,
    crd::v1alpha1::SipCluster,
    bmh::BareMetalHost,
    error::{
        Error, HostPoolSnafu, ManageFinalizerSnafu, ObjectHasNoNamespaceSnafu, ReconstructClaimsSnafu, ReportStatusSnafu,
        Result, ScheduleSnafu,
    },
    extrapolate, host_pool,
    machine::{MachineList, Role},
    render::Renderer,
    scheduler, status,
};

/// How many times a reconcile re-schedules from scratch before giving up, bounding the amount of
/// work a pathologically flaky pool of hosts can cause in a single pass.
const MAX_SCHEDULE_ATTEMPTS: u8 = 5;

/// Marks a claimed `BareMetalHost` as this operator's to release on deletion.
pub const FINALIZER: &str = "sip.stackable.tech/cleanup";

/// Shared state handed to every reconcile and error-policy invocation.
pub struct Ctx {
    pub client: Client,
}

/// Reconciles a single `SipCluster`, gated by [`FINALIZER`] so deletion always runs
/// [`cleanup_sip`] before the object is allowed to go away.
pub async fn reconcile(sip: Arc<SipCluster>, ctx: Arc<Ctx>) -> Result<Action> {
    tracing::info!(sip = %sip.name_any(), "reconciling SipCluster");

    let client = &ctx.client;
    let namespace = sip.namespace().context(ObjectHasNoNamespaceSnafu)?;
    let api: Api<SipCluster> = client.get_api(&namespace);

    finalizer(&api, FINALIZER, sip, |event| async move {
        match event {
            FinalizerEvent::Apply(sip) => apply_sip(client, &namespace, &sip).await,
            FinalizerEvent::Cleanup(sip) => cleanup_sip(client, &namespace, &sip).await,
        }
    })
    .await
    .context(ManageFinalizerSnafu)
}

/// Schedules, extrapolates, renders, and claims hosts for a `SipCluster` that isn't being deleted.
async fn apply_sip(client: &Client, namespace: &str, sip: &SipCluster) -> Result<Action> {
    status::report(client, sip, status::Reason::Progressing, "reconciliation in progress")
        .await
        .context(ReportStatusSnafu)?;

    let cluster_key = cluster_key(namespace, &sip.name_any());

    let machines = match schedule_and_extrapolate(client, namespace, &cluster_key, sip).await {
        Ok(machines) => machines,
        Err(error) => {
            status::report(client, sip, status::Reason::Unschedulable, error.to_string())
                .await
                .context(ReportStatusSnafu)?;
            return Err(error);
        }
    };

    if let Err(source) = Renderer::new(client, sip).deploy(&machines).await {
        status::report(client, sip, status::Reason::InfraServiceFailure, source.to_string())
            .await
            .context(ReportStatusSnafu)?;
        return Err(Error::Render { source });
    }

    if let Err(source) = claim::apply(client, namespace, &cluster_key, &machines).await {
        status::report(client, sip, status::Reason::UnableToApplyLabels, source.to_string())
            .await
            .context(ReportStatusSnafu)?;
        return Err(Error::ApplyClaims { source });
    }

    status::report(
        client,
        sip,
        status::Reason::ReconciliationSucceeded,
        "all BareMetalHosts scheduled and claimed",
    )
    .await
    .context(ReportStatusSnafu)?;

    Ok(Action::await_change())
}

/// Releases every host this `SipCluster` claimed and tears down its rendered services, for the
/// deletion path.
async fn cleanup_sip(client: &Client, namespace: &str, sip: &SipCluster) -> Result<Action> {
    let cluster_key = cluster_key(namespace, &sip.name_any());

    if let Err(source) = Renderer::new(client, sip).finalize().await {
        status::report(client, sip, status::Reason::UnableToDecommission, source.to_string())
            .await
            .context(ReportStatusSnafu)?;
        return Err(Error::Finalize { source });
    }

    let claimed = claim::reconstruct_claimed(client, namespace, &cluster_key)
        .await
        .context(ReconstructClaimsSnafu)?;
    let host_names: Vec<String> = claimed.iter().map(|host| host.name_any()).collect();

    if let Err(source) = claim::release(client, namespace, &host_names).await {
        status::report(client, sip, status::Reason::UnableToDecommission, source.to_string())
            .await
            .context(ReportStatusSnafu)?;
        return Err(Error::ReleaseClaims { source });
    }

    Ok(Action::await_change())
}

/// Repeatedly reconstructs already-claimed hosts, schedules any deficit, and extrapolates network
/// and BMC data, until a full pass succeeds or [`MAX_SCHEDULE_ATTEMPTS`] is exhausted.
///
/// `machines` is carried across attempts rather than rebuilt from scratch: a host demoted to
/// `UnableToSchedule` by a failed extrapolation stays in the list (just no longer counted toward
/// its role's ready count), so the next attempt's scheduling pass skips over it instead of
/// reselecting the same bad host forever. A scheduling failure itself is not retried here — it
/// fails the pass immediately, matching S2's direct transition to `Unschedulable`; only
/// extrapolation failures loop back to reschedule.
async fn schedule_and_extrapolate(
    client: &Client,
    namespace: &str,
    cluster_key: &str,
    sip: &SipCluster,
) -> Result<MachineList> {
    let required_interfaces = sip.spec.required_interfaces();
    let mut last_error = None;
    let mut machines = MachineList::new();

    for attempt in 1..=MAX_SCHEDULE_ATTEMPTS {
        for role in Role::ALL {
            let claimed = host_pool::list_claimed_by(client, namespace, cluster_key, role)
                .await
                .context(HostPoolSnafu)?;
            scheduler::reconstruct_role_claims(&mut machines, role, claimed);
        }

        let unclaimed = host_pool::list_unclaimed(client, namespace).await.context(HostPoolSnafu)?;
        scheduler::schedule(&mut machines, &sip.spec.nodes, &unclaimed).context(ScheduleSnafu)?;

        if let Err(source) = extrapolate::extrapolate_service_addresses(client, &mut machines, &required_interfaces).await {
            tracing::warn!(attempt, %source, "service address extrapolation failed for one or more BareMetalHosts, retrying");
            last_error = Some(Error::ExtrapolateServiceAddresses { source });
            continue;
        }
        if let Err(source) = extrapolate::extrapolate_bmc_auth(client, &mut machines).await {
            tracing::warn!(attempt, %source, "BMC credential extrapolation failed for one or more BareMetalHosts, retrying");
            last_error = Some(Error::ExtrapolateBmcAuth { source });
            continue;
        }

        return Ok(machines);
    }

    Err(last_error.unwrap_or(Error::SchedulingAttemptsExhausted {
        attempts: MAX_SCHEDULE_ATTEMPTS,
    }))
}

/// Maps a `BareMetalHost` change back to the `SipCluster` that claims it, so the controller
/// re-reconciles whenever a claimed host's labels or status change underneath it.
///
/// `host`'s claim label is read rather than an owner reference, since `BareMetalHost`s are
/// labeled, not owned, by the `SipCluster` that claims them (see [`crate::claim`]).
pub fn sip_cluster_for_host(host: &BareMetalHost) -> Option<ObjectRef<SipCluster>> {
    let cluster_key = host.labels().get(CLUSTER_LABEL)?;
    let (namespace, name) = cluster_key.split_once('_')?;
    Some(ObjectRef::new(name).within(namespace))
}

/// The error policy every reconcile failure is routed through: log it and requeue at a fixed
/// backoff, regardless of which component failed.
pub fn error_policy(sip: Arc<SipCluster>, error: &Error, _ctx: Arc<Ctx>) -> Action {
    tracing::error!(sip = %sip.name_any(), %error, "reconcile failed, requeuing");
    Action::requeue(Duration::from_secs(10))
}
