//! Binary entrypoint: wires up the CLI, telemetry, and the [`kube::runtime::Controller`] loop
//! that drives [`stackable_sip_operator::controller::reconcile`].

use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use kube::{
    Api, CustomResourceExt,
    runtime::{Controller, watcher},
};
use snafu::{ResultExt, Snafu};

use stackable_operator::{
    cli::{Command, RunArguments},
    client::Client,
    logging::k8s_events::publish_controller_error_as_k8s_event,
    utils::cluster_info::KubernetesClusterInfo,
    yaml,
};

use stackable_sip_operator::{
    APP_NAME, CONTROLLER_NAME,
    bmh::BareMetalHost,
    controller::{self, Ctx},
    crd::v1alpha1::SipCluster,
};

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to initialize tracing"))]
    InitializeTracing { source: stackable_telemetry::tracing::Error },

    #[snafu(display("failed to serialize SipCluster CRD"))]
    SerializeCrd { source: stackable_operator::yaml::Error },

    #[snafu(display("failed to construct a Kubernetes client"))]
    InitializeClient { source: stackable_operator::client::Error },

    #[snafu(display("failed to resolve Kubernetes cluster information"))]
    ClusterInfo { source: stackable_operator::utils::cluster_info::Error },
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[tokio::main]
async fn main() -> Result<()> {
    let command = Command::<RunArguments>::parse();

    match command {
        Command::Crd => {
            let mut buf = Vec::new();
            yaml::serialize_to_explicit_document(&mut buf, &SipCluster::crd()).context(SerializeCrdSnafu)?;
            print!("{}", String::from_utf8_lossy(&buf));
            Ok(())
        }
        Command::Run(run) => run_operator(run).await,
    }
}

async fn run_operator(run: RunArguments) -> Result<()> {
    let _tracing_guard = run
        .common
        .telemetry
        .init(APP_NAME)
        .context(InitializeTracingSnafu)?;

    tracing::info!(
        version = built_info::PKG_VERSION,
        "starting {CONTROLLER_NAME} operator"
    );

    let client = Client::initialize(format!("{APP_NAME}.sip.stackable.tech"))
        .await
        .context(InitializeClientSnafu)?;

    let cluster_info = KubernetesClusterInfo::new(&client.as_kube_client(), &run.common.cluster_info)
        .await
        .context(ClusterInfoSnafu)?;
    tracing::info!(cluster_domain = %cluster_info.cluster_domain, "resolved Kubernetes cluster information");

    let sip_clusters: Api<SipCluster> = run.watch_namespace.get_api(&client);
    let bare_metal_hosts: Api<BareMetalHost> = run.watch_namespace.get_api(&client);

    let ctx = Arc::new(Ctx { client: client.clone() });

    Controller::new(sip_clusters, watcher::Config::default())
        .watches(bare_metal_hosts, watcher::Config::default(), |host| {
            controller::sip_cluster_for_host(&host)
        })
        .shutdown_on_signal()
        .run(controller::reconcile, controller::error_policy, ctx)
        .for_each(|result| {
            let client = client.clone();
            async move {
                match result {
                    Ok((object, action)) => {
                        tracing::info!(sip = ?object, ?action, "reconciled SipCluster");
                    }
                    Err(error) => publish_controller_error_as_k8s_event(&client, CONTROLLER_NAME, &error),
                }
            }
        })
        .await;

    Ok(())
}

mod built_info {
    pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
}
