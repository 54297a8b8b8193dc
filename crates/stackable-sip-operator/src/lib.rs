//! Schedules bare-metal hosts into sub-clusters described by [`crd::v1alpha1::SipClusterSpec`].
//!
//! A `SipCluster` claims a fixed number of [`bmh::BareMetalHost`] objects out of a shared pool,
//! labels them so they can't be claimed twice, works out the network and BMC details each claimed
//! host needs, and renders the supporting infrastructure (load balancer, jump host) those hosts
//! are meant to serve.

pub mod bmh;
pub mod claim;
pub mod constraints;
pub mod controller;
pub mod crd;
pub mod error;
pub mod extrapolate;
pub mod host_pool;
pub mod machine;
pub mod render;
pub mod scheduler;
pub mod status;

/// Label namespacing every object this operator touches or produces.
pub const LABEL_BASE: &str = "sip.stackable.tech";

/// Label recording which `SipCluster` a [`bmh::BareMetalHost`] has been claimed by.
pub const CLUSTER_LABEL: &str = "sip.stackable.tech/cluster";

/// Label recording which node role (`control-plane`/`worker`) a claimed host was scheduled as.
pub const NODE_TYPE_LABEL: &str = "sip.stackable.tech/node-type";

/// Name the operator uses as its field manager and `ClusterResources` app name.
pub const APP_NAME: &str = "sip-cluster";

/// Name of the controller, distinguishing it from other controllers that might watch
/// [`crd::v1alpha1::SipCluster`] in the future.
pub const CONTROLLER_NAME: &str = "sipcluster";

/// Joins a `SipCluster`'s namespace and name into the stable key used to tag claimed hosts and
/// to key [`machine::MachineList`].
///
/// Mirrors the separator used by the scheduler this operator's behavior is modeled on, so
/// operators upgrading from hand-managed labels don't need to relabel existing hosts.
pub fn cluster_key(namespace: &str, name: &str) -> String {
    format!("{namespace}_{name}")
}
