//! The top-level error type returned by a single reconcile pass, used by
//! [`kube::runtime::Controller`]'s error policy and by
//! [`stackable_operator::logging::k8s_events::publish_controller_error_as_k8s_event`] to report
//! failures back onto the `SipCluster` as both a log line and a Kubernetes `Event`.

use snafu::Snafu;
use strum::{EnumDiscriminants, IntoStaticStr};

use stackable_operator::logging::controller::ReconcilerError;

use crate::{claim, extrapolate, host_pool, render, scheduler, status};

#[derive(Debug, Snafu, EnumDiscriminants)]
#[strum_discriminants(derive(IntoStaticStr))]
pub enum Error {
    #[snafu(display("object is missing a namespace"))]
    ObjectHasNoNamespace,

    #[snafu(display("failed to query the BareMetalHost pool"))]
    HostPool { source: host_pool::Error },

    #[snafu(display("failed to schedule BareMetalHosts for this SipCluster"))]
    Schedule { source: scheduler::Error },

    #[snafu(display("failed to extrapolate service addresses for selected BareMetalHosts"))]
    ExtrapolateServiceAddresses { source: extrapolate::Error },

    #[snafu(display("failed to extrapolate BMC credentials for selected BareMetalHosts"))]
    ExtrapolateBmcAuth { source: extrapolate::Error },

    #[snafu(display("gave up scheduling after {attempts} attempt(s)"))]
    SchedulingAttemptsExhausted { attempts: u8 },

    #[snafu(display("failed to render infrastructure services for this SipCluster"))]
    Render { source: render::Error },

    #[snafu(display("failed to apply claim labels to selected BareMetalHosts"))]
    ApplyClaims { source: claim::Error },

    #[snafu(display("failed to reconstruct the claimed BareMetalHost set for this SipCluster"))]
    ReconstructClaims { source: claim::Error },

    #[snafu(display("failed to release claim labels during decommissioning"))]
    ReleaseClaims { source: claim::Error },

    #[snafu(display("failed to finalize infrastructure services during decommissioning"))]
    Finalize { source: render::Error },

    #[snafu(display("failed to report SipCluster status"))]
    ReportStatus { source: status::Error },

    #[snafu(display("failed to manage the SipCluster finalizer"))]
    ManageFinalizer { source: kube::runtime::finalizer::Error<Error> },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl ReconcilerError for Error {
    fn category(&self) -> &'static str {
        ErrorDiscriminants::from(self).into()
    }
}
