//! Tracks the set of child resources a controller renders for an owning
//! cluster object so that resources removed between one reconcile and the
//! next ("orphans") get garbage collected instead of lingering forever.
//!
//! The usual shape in a `reconcile` function is:
//!
//! ```ignore
//! let mut cluster_resources = ClusterResources::new(APP_NAME, CONTROLLER_NAME, &owner_ref)?;
//! cluster_resources.add(client, &service).await?;
//! cluster_resources.add(client, &config_map).await?;
//! cluster_resources.delete_orphaned_resources(client).await?;
//! ```
//!
//! Every call to [`ClusterResources::add`] both applies the resource and
//! records its identity; [`ClusterResources::delete_orphaned_resources`] then
//! deletes anything still labeled as belonging to this cluster/controller that
//! wasn't touched during the current reconcile.

use k8s_openapi::NamespaceResourceScope;
use kube::{Resource, ResourceExt, api::ListParams, core::ObjectMeta};
use serde::{Serialize, de::DeserializeOwned};
use snafu::{OptionExt, ResultExt, Snafu};
use std::{collections::HashSet, fmt::Debug};

use crate::client::Client;
use crate::kvp::{Label, Labels};

/// Label recording which cluster-resources tracker rendered an object, so a
/// later reconcile can recognize objects it owns without re-deriving the
/// owner reference.
const CLUSTER_RESOURCES_LABEL: &str = "stackable.tech/cluster-resources-id";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to apply resource"))]
    Apply { source: crate::client::Error },

    #[snafu(display("failed to list {kind} resources to look for orphans"))]
    ListOrphans {
        source: crate::client::Error,
        kind: String,
    },

    #[snafu(display("failed to delete orphaned resource {kind} {name}"))]
    DeleteOrphan {
        source: crate::client::Error,
        kind: String,
        name: String,
    },

    #[snafu(display("object is missing a namespace"))]
    ObjectHasNoNamespace,

    #[snafu(display("failed to build tracking label"))]
    BuildLabel { source: crate::kvp::LabelError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Tracks the resources rendered for one controller's reconcile of one
/// owning object, so leftovers from a previous reconcile (a role-group that
/// got removed from the spec, say) are cleaned up afterwards.
pub struct ClusterResources {
    app_name: String,
    controller_name: String,
    cluster_resources_id: String,
    namespace: String,
    touched: HashSet<(String, String)>,
}

impl ClusterResources {
    /// Starts tracking resources for one reconcile.
    ///
    /// `app_name` is the product this operator manages (`"hbase"`,
    /// `"sip-cluster"`, ...), `controller_name` disambiguates multiple
    /// controllers watching the same kind, and `owner_ref` is the object
    /// metadata of the cluster-level resource every tracked child belongs to.
    pub fn new(app_name: &str, controller_name: &str, owner_ref: &ObjectMeta) -> Result<Self> {
        let namespace = owner_ref
            .namespace
            .clone()
            .context(ObjectHasNoNamespaceSnafu)?;
        let uid = owner_ref.uid.clone().unwrap_or_default();
        Ok(Self {
            app_name: app_name.to_string(),
            controller_name: controller_name.to_string(),
            cluster_resources_id: format!("{app_name}.{controller_name}.{uid}"),
            namespace,
            touched: HashSet::new(),
        })
    }

    fn tracking_label(&self) -> Result<Label> {
        Label::try_from((CLUSTER_RESOURCES_LABEL, self.cluster_resources_id.as_str()))
            .context(BuildLabelSnafu)
    }

    /// Applies `resource` (via server-side apply) after stamping it with this
    /// reconcile's tracking label, and records it as live for this reconcile.
    pub async fn add<T>(&mut self, client: &Client, resource: &T) -> Result<T>
    where
        T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Serialize
            + DeserializeOwned
            + Clone
            + Debug,
    {
        let mut resource = resource.clone();
        let labels: Labels = Labels::from_iter([self.tracking_label()?]);
        resource
            .meta_mut()
            .labels
            .get_or_insert_with(Default::default)
            .extend(labels.to_unvalidated());

        self.touched
            .insert((T::kind(&()).to_string(), resource.name_any()));

        client.apply_patch(&resource).await.context(ApplySnafu)
    }

    /// Deletes every object of kind `T` in this cluster's namespace that
    /// carries this reconcile's tracking label but was not touched by a call
    /// to [`ClusterResources::add`] during the current reconcile.
    pub async fn delete_orphaned_resources_of_kind<T>(&self, client: &Client) -> Result<()>
    where
        T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + Debug,
    {
        let kind = T::kind(&()).to_string();
        let list_params = ListParams::default().labels(&format!(
            "{CLUSTER_RESOURCES_LABEL}={}",
            self.cluster_resources_id
        ));
        let existing = client
            .list::<T>(&self.namespace, &list_params)
            .await
            .with_context(|_| ListOrphansSnafu { kind: kind.clone() })?;

        for obj in existing {
            let name = obj.name_any();
            if self.touched.contains(&(kind.clone(), name.clone())) {
                continue;
            }
            client
                .delete::<T>(&name, &self.namespace)
                .await
                .with_context(|_| DeleteOrphanSnafu {
                    kind: kind.clone(),
                    name: name.clone(),
                })?;
        }
        Ok(())
    }

    /// Sweeps every resource kind this crate knows how to own and deletes
    /// orphans of each. Operators with owned kinds beyond the common
    /// ConfigMap/Service/Secret/StatefulSet/Pod set should instead call
    /// [`ClusterResources::delete_orphaned_resources_of_kind`] explicitly for
    /// each kind they render.
    pub async fn delete_orphaned_resources(self, client: &Client) -> Result<()> {
        use k8s_openapi::api::{
            apps::v1::StatefulSet,
            core::v1::{ConfigMap, Pod, Secret, Service},
        };

        self.delete_orphaned_resources_of_kind::<ConfigMap>(client)
            .await?;
        self.delete_orphaned_resources_of_kind::<Service>(client)
            .await?;
        self.delete_orphaned_resources_of_kind::<Secret>(client)
            .await?;
        self.delete_orphaned_resources_of_kind::<StatefulSet>(client)
            .await?;
        self.delete_orphaned_resources_of_kind::<Pod>(client).await
    }

    /// The app name this tracker was created with.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The controller name this tracker was created with.
    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }
}
