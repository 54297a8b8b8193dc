//! Renders the infrastructure services a `SipCluster` declares (§6 "Delegated to collaborators"):
//! an HAProxy `Deployment`/`Service` per [`LoadBalancerService`](crate::crd::v1alpha1::LoadBalancerService)
//! and an SSH jump-host `Deployment` per [`JumpHostService`](crate::crd::v1alpha1::JumpHostService).
//!
//! Kept separate from the scheduler/extrapolator/claim manager: this module only ever reads a
//! finished [`MachineList`], it never selects or claims hosts itself. Orphaned resources from a
//! previous reconcile (a service variant removed from the spec, say) are swept by
//! [`stackable_operator::cluster_resources::ClusterResources`], the same mechanism the framework's
//! other product operators use.

use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::{Deployment, DeploymentSpec},
        core::v1::{ConfigMap, ContainerPort, Service, ServicePort, ServiceSpec},
    },
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};
use kube::{ResourceExt, core::ObjectMeta};
use snafu::{ResultExt, Snafu};

use stackable_operator::{
    builder::{
        configmap::ConfigMapBuilder,
        meta::ObjectMetaBuilder,
        pod::{PodBuilder, container::ContainerBuilder, volume::VolumeBuilder},
    },
    client::Client,
    cluster_resources::ClusterResources,
};

use crate::{
    APP_NAME, CONTROLLER_NAME,
    crd::v1alpha1::{JumpHostService, LoadBalancerService, Service as ServiceSpecVariant, SipCluster},
    machine::{MachineList, Role},
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("SipCluster is missing a namespace"))]
    MissingNamespace,

    #[snafu(display("failed to start tracking this SipCluster's rendered resources"))]
    StartTracking { source: stackable_operator::cluster_resources::Error },

    #[snafu(display("failed to build ObjectMeta for rendered resource {name:?}"))]
    BuildMeta {
        source: stackable_operator::builder::meta::Error,
        name: String,
    },

    #[snafu(display("failed to build the {name:?} Container"))]
    BuildContainer {
        source: stackable_operator::builder::pod::container::Error,
        name: String,
    },

    #[snafu(display("failed to build the {name:?} Pod template"))]
    BuildPod {
        source: stackable_operator::builder::pod::Error,
        name: String,
    },

    #[snafu(display("failed to build ConfigMap {name:?}"))]
    BuildConfigMap {
        source: stackable_operator::builder::configmap::Error,
        name: String,
    },

    #[snafu(display("failed to apply rendered resource {name:?}"))]
    Apply {
        source: stackable_operator::cluster_resources::Error,
        name: String,
    },

    #[snafu(display("failed to delete orphaned rendered resources"))]
    DeleteOrphaned { source: stackable_operator::cluster_resources::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Materializes (or tears down) the `Deployment`/`Service` pair for every service a `SipCluster`
/// declares, from the addressing data [`crate::extrapolate`] populated on its [`MachineList`].
pub struct Renderer<'a> {
    client: &'a Client,
    cluster: &'a SipCluster,
}

impl<'a> Renderer<'a> {
    pub fn new(client: &'a Client, cluster: &'a SipCluster) -> Self {
        Self { client, cluster }
    }

    fn cluster_resources(&self) -> Result<ClusterResources> {
        if self.cluster.metadata.namespace.is_none() {
            return Err(Error::MissingNamespace);
        }
        ClusterResources::new(APP_NAME, CONTROLLER_NAME, &self.cluster.metadata).context(StartTrackingSnafu)
    }

    /// Renders every configured service against `machines`, applies the results, and garbage
    /// collects anything a previous reconcile rendered that the current spec no longer declares.
    pub async fn deploy(&self, machines: &MachineList) -> Result<()> {
        let mut cluster_resources = self.cluster_resources()?;

        for service in &self.cluster.spec.services {
            match service {
                ServiceSpecVariant::LoadBalancer(cfg) => {
                    self.deploy_load_balancer(&mut cluster_resources, cfg, machines).await?;
                }
                ServiceSpecVariant::JumpHost(cfg) => {
                    self.deploy_jump_host(&mut cluster_resources, cfg, machines).await?;
                }
            }
        }

        self.sweep(&cluster_resources).await
    }

    /// Removes every resource this renderer ever produced for this `SipCluster`, for the deletion
    /// path. There is nothing left to "touch" this pass, so every tracked resource is an orphan.
    pub async fn finalize(&self) -> Result<()> {
        let cluster_resources = self.cluster_resources()?;
        self.sweep(&cluster_resources).await
    }

    async fn sweep(&self, cluster_resources: &ClusterResources) -> Result<()> {
        cluster_resources
            .delete_orphaned_resources_of_kind::<Deployment>(self.client)
            .await
            .context(DeleteOrphanedSnafu)?;
        cluster_resources
            .delete_orphaned_resources_of_kind::<Service>(self.client)
            .await
            .context(DeleteOrphanedSnafu)?;
        cluster_resources
            .delete_orphaned_resources_of_kind::<ConfigMap>(self.client)
            .await
            .context(DeleteOrphanedSnafu)
    }

    async fn deploy_load_balancer(
        &self,
        cluster_resources: &mut ClusterResources,
        cfg: &LoadBalancerService,
        machines: &MachineList,
    ) -> Result<()> {
        let name = format!("{cluster}-lb", cluster = self.cluster.name_any());

        let backends: BTreeMap<String, String> = machines
            .schedulable()
            .filter(|m| m.role == Role::ControlPlane)
            .filter_map(|m| m.data.ip_on_interface.get(&cfg.node_interface).map(|ip| (m.name(), ip.clone())))
            .collect();

        let haproxy_cfg = render_haproxy_cfg(&backends, &cfg.node_ports);

        let config_map_name = format!("{name}-config");
        let config_map = ConfigMapBuilder::new()
            .metadata(self.child_meta(&config_map_name, &cfg.node_labels)?)
            .add_data("haproxy.cfg", haproxy_cfg)
            .build()
            .context(BuildConfigMapSnafu { name: config_map_name.clone() })?;
        cluster_resources
            .add(self.client, &config_map)
            .await
            .context(ApplySnafu { name: config_map_name.clone() })?;

        let container_ports: Vec<ContainerPort> = cfg
            .node_ports
            .iter()
            .enumerate()
            .map(|(i, port)| ContainerPort {
                name: Some(format!("port-{i}")),
                container_port: *port,
                ..Default::default()
            })
            .collect();

        let mut container_builder =
            ContainerBuilder::new("haproxy").context(BuildContainerSnafu { name: "haproxy".to_string() })?;
        container_builder.image(cfg.image.as_str());
        container_builder
            .add_volume_mount("config", "/usr/local/etc/haproxy")
            .context(BuildContainerSnafu { name: "haproxy".to_string() })?;
        container_builder.add_container_ports(container_ports);
        let container = container_builder.build();

        let mut pod_builder = PodBuilder::new();
        pod_builder.metadata(self.child_meta(&name, &cfg.node_labels)?).add_container(container);
        pod_builder
            .add_volume(VolumeBuilder::new("config").with_config_map(config_map_name.as_str()).build())
            .context(BuildPodSnafu { name: name.clone() })?;

        let deployment = Deployment {
            metadata: self.child_meta(&name, &cfg.node_labels)?,
            spec: Some(DeploymentSpec {
                replicas: Some(1),
                selector: selector_for(&name),
                template: pod_builder.build_template(),
                ..Default::default()
            }),
            status: None,
        };
        cluster_resources
            .add(self.client, &deployment)
            .await
            .context(ApplySnafu { name: name.clone() })?;

        let service = Service {
            metadata: self.child_meta(&name, &cfg.node_labels)?,
            spec: Some(ServiceSpec {
                selector: Some(selector_labels(&name)),
                type_: Some("NodePort".to_string()),
                ports: Some(
                    cfg.node_ports
                        .iter()
                        .enumerate()
                        .map(|(i, port)| ServicePort {
                            name: Some(format!("port-{i}")),
                            port: *port,
                            node_port: Some(*port),
                            ..Default::default()
                        })
                        .collect(),
                ),
                ..Default::default()
            }),
            status: None,
        };
        cluster_resources
            .add(self.client, &service)
            .await
            .context(ApplySnafu { name })?;

        Ok(())
    }

    async fn deploy_jump_host(
        &self,
        cluster_resources: &mut ClusterResources,
        cfg: &JumpHostService,
        machines: &MachineList,
    ) -> Result<()> {
        let name = format!("{cluster}-jump", cluster = self.cluster.name_any());

        let known_hosts: Vec<String> = machines
            .schedulable()
            .filter_map(|m| m.data.ip_on_interface.get(&cfg.node_interface).cloned())
            .collect();

        let mut container_builder =
            ContainerBuilder::new("jump-host").context(BuildContainerSnafu { name: "jump-host".to_string() })?;
        container_builder
            .image(cfg.image.as_str())
            .add_env_var("SIP_JUMP_HOST_TARGETS", known_hosts.join(","));
        if let Some(ssh_key) = &cfg.ssh_key {
            container_builder.add_env_var("SIP_JUMP_HOST_AUTHORIZED_KEY", ssh_key.as_str());
        }
        let container = container_builder.build();

        let mut pod_builder = PodBuilder::new();
        pod_builder.metadata(self.child_meta(&name, &cfg.node_labels)?).add_container(container);

        let deployment = Deployment {
            metadata: self.child_meta(&name, &cfg.node_labels)?,
            spec: Some(DeploymentSpec {
                replicas: Some(1),
                selector: selector_for(&name),
                template: pod_builder.build_template(),
                ..Default::default()
            }),
            status: None,
        };
        cluster_resources
            .add(self.client, &deployment)
            .await
            .context(ApplySnafu { name })
            .map(|_| ())
    }

    fn child_meta(&self, name: &str, extra_labels: &BTreeMap<String, String>) -> Result<ObjectMeta> {
        let mut builder = ObjectMetaBuilder::new();
        builder
            .name(name)
            .namespace_opt(self.cluster.metadata.namespace.clone())
            .with_labels(selector_labels(name))
            .with_labels(extra_labels.clone())
            .ownerreference_from_resource(self.cluster, None, Some(true))
            .context(BuildMetaSnafu { name: name.to_string() })?;
        Ok(builder.build())
    }
}

fn selector_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app.kubernetes.io/instance".to_string(), name.to_string())])
}

fn selector_for(name: &str) -> LabelSelector {
    LabelSelector {
        match_labels: Some(selector_labels(name)),
        match_expressions: None,
    }
}

/// A minimal `haproxy.cfg` balancing each configured port across `backends` (host name → IP).
/// Real deployments are expected to layer their own tuning on top via the `image` they supply;
/// this crate only owns getting the backend addresses right.
fn render_haproxy_cfg(backends: &BTreeMap<String, String>, node_ports: &[i32]) -> String {
    let mut cfg = String::from(
        "global\n    daemon\n\ndefaults\n    mode tcp\n    timeout connect 5s\n    timeout client 30s\n    timeout server 30s\n\n",
    );
    for port in node_ports {
        cfg.push_str(&format!(
            "frontend frontend-{port}\n    bind *:{port}\n    default_backend backend-{port}\n\nbackend backend-{port}\n"
        ));
        for (host, ip) in backends {
            cfg.push_str(&format!("    server {host} {ip}:{port} check\n"));
        }
        cfg.push('\n');
    }
    cfg
}
