//! The `SipCluster` custom resource: declares how many bare-metal hosts a sub-cluster needs
//! per role, how candidate hosts are told apart, and which supporting services get rendered
//! for it.

use std::collections::BTreeSet;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, LabelSelector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stackable_versioned::versioned;

#[versioned(version(name = "v1alpha1"))]
pub mod versioned {
    /// A sub-cluster of bare-metal hosts claimed out of a shared pool.
    ///
    /// The controller reconciles a `SipCluster` by claiming unclaimed hosts that match each
    /// role's selector, extrapolating the network and BMC data those hosts need, and rendering
    /// the services the sub-cluster exposes.
    #[versioned(k8s(
        group = "sip.stackable.tech",
        kind = "SipCluster",
        plural = "sipclusters",
        status = "v1alpha1::SipClusterStatus",
        crates(kube_core = "kube::core", k8s_openapi = "k8s_openapi", schemars = "schemars"),
        namespaced
    ))]
    #[derive(Clone, CustomResource, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SipClusterSpec {
        /// Node roles this sub-cluster is made of.
        pub nodes: Nodes,

        /// Supporting infrastructure services rendered for this sub-cluster.
        #[serde(default)]
        pub services: Vec<Service>,
    }

    /// The fixed set of node roles a `SipCluster` schedules, one [`NodeSet`] each.
    #[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Nodes {
        pub control_plane: NodeSet,
        pub worker: NodeSet,
    }

    /// Describes how to select, spread, and count candidate hosts for a single role.
    #[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NodeSet {
        /// Selects which [`BareMetalHost`](crate::bmh::BareMetalHost) objects are eligible for
        /// this role.
        #[serde(flatten)]
        pub selector: LabelSelector,

        /// A label name whose value partitions eligible hosts into anti-affinity domains (e.g.
        /// a rack or chassis label). Hosts missing this label don't occupy a domain slot and are
        /// scheduled as if unconstrained.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub topology_key: Option<String>,

        pub count: NodeCount,
    }

    /// How many hosts of a role to claim.
    #[derive(Clone, Copy, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NodeCount {
        /// Hosts that should be actively claimed and labeled.
        #[serde(default)]
        pub active: u16,

        /// Hosts held in reserve. Scheduled and labeled identically to active hosts; this crate
        /// does not distinguish standby hosts once claimed.
        #[serde(default)]
        pub standby: u16,
    }

    impl NodeCount {
        pub fn total(&self) -> u16 {
            self.active.saturating_add(self.standby)
        }
    }

    /// A supporting infrastructure service rendered for a sub-cluster's claimed hosts.
    #[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(tag = "type", rename_all = "camelCase")]
    pub enum Service {
        LoadBalancer(LoadBalancerService),
        JumpHost(JumpHostService),
    }

    /// An HAProxy load balancer fronting the sub-cluster's control-plane nodes.
    #[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoadBalancerService {
        pub image: String,

        /// The network interface (by id, as named in a host's network-data) whose address is
        /// used to reach this service's backends.
        pub node_interface: String,

        /// Host ports the rendered load balancer Service exposes.
        #[serde(default)]
        pub node_ports: Vec<i32>,

        /// Extra labels applied to the rendered load balancer's Pods.
        #[serde(default)]
        pub node_labels: std::collections::BTreeMap<String, String>,
    }

    /// A jump host Pod used to reach the sub-cluster's nodes over SSH.
    #[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct JumpHostService {
        pub image: String,

        /// The network interface (by id, as named in a host's network-data) whose address is
        /// used to reach the sub-cluster from the jump host.
        pub node_interface: String,

        /// An authorized public SSH key to install on the jump host.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub ssh_key: Option<String>,

        /// Extra labels applied to the rendered jump host's Pod.
        #[serde(default)]
        pub node_labels: std::collections::BTreeMap<String, String>,
    }

    /// Observed state of a `SipCluster`.
    #[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SipClusterStatus {
        #[serde(default)]
        pub conditions: Vec<Condition>,
    }
}

impl v1alpha1::Service {
    /// The network interface id this service needs a claimed host's network-data to resolve.
    pub fn node_interface(&self) -> &str {
        match self {
            Self::LoadBalancer(cfg) => &cfg.node_interface,
            Self::JumpHost(cfg) => &cfg.node_interface,
        }
    }
}

impl v1alpha1::SipClusterSpec {
    /// The set of network interface ids that claimed hosts must resolve an address for, derived
    /// from every configured service.
    pub fn required_interfaces(&self) -> BTreeSet<&str> {
        self.services.iter().map(|svc| svc.node_interface()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::v1alpha1::{LoadBalancerService, Service};

    #[test]
    fn required_interfaces_dedupes_across_services() {
        let spec = super::v1alpha1::SipClusterSpec {
            nodes: super::v1alpha1::Nodes {
                control_plane: default_node_set(),
                worker: default_node_set(),
            },
            services: vec![
                Service::LoadBalancer(LoadBalancerService {
                    image: "haproxy:latest".to_string(),
                    node_interface: "oam-ipv4".to_string(),
                    node_ports: vec![6443],
                    node_labels: Default::default(),
                }),
                Service::LoadBalancer(LoadBalancerService {
                    image: "haproxy:latest".to_string(),
                    node_interface: "oam-ipv4".to_string(),
                    node_ports: vec![8443],
                    node_labels: Default::default(),
                }),
            ],
        };

        assert_eq!(spec.required_interfaces(), ["oam-ipv4"].into());
    }

    fn default_node_set() -> super::v1alpha1::NodeSet {
        super::v1alpha1::NodeSet {
            selector: Default::default(),
            topology_key: None,
            count: super::v1alpha1::NodeCount {
                active: 0,
                standby: 0,
            },
        }
    }
}
