//! A thin, typed wrapper around [`kube::Client`].
//!
//! Operators built on top of this crate should go through [`Client`] instead of
//! reaching for [`kube::Client`] directly: it centralizes the field manager used
//! for server-side apply and gives uniform `get`/`list`/`apply`/`delete` helpers
//! that work across both namespaced and cluster-scoped resources.

use k8s_openapi::NamespaceResourceScope;
use kube::{
    Api, Resource, ResourceExt,
    api::{DeleteParams, ListParams, Patch, PatchParams, PostParams},
    core::ObjectMeta,
};
use serde::{Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu};
use std::fmt::Debug;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to construct a default in-cluster Kubernetes client"))]
    InferConfig { source: kube::Error },

    #[snafu(display("failed to fetch {resource} from Kubernetes"))]
    Get {
        source: kube::Error,
        resource: String,
    },

    #[snafu(display("failed to list {resource} from Kubernetes"))]
    List {
        source: kube::Error,
        resource: String,
    },

    #[snafu(display("failed to apply {resource} to Kubernetes"))]
    Apply {
        source: kube::Error,
        resource: String,
    },

    #[snafu(display("failed to patch status of {resource}"))]
    ApplyStatus {
        source: kube::Error,
        resource: String,
    },

    #[snafu(display("failed to delete {resource} from Kubernetes"))]
    Delete {
        source: kube::Error,
        resource: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A Kubernetes client scoped to a single field manager.
///
/// Cloning a [`Client`] is cheap; the underlying [`kube::Client`] is reference
/// counted, same as the type it wraps.
#[derive(Clone)]
pub struct Client {
    client: kube::Client,
    field_manager: String,
}

impl Client {
    /// Builds a [`Client`] from the ambient Kubernetes configuration (in-cluster
    /// config when running inside a Pod, otherwise the local kubeconfig).
    pub async fn initialize(field_manager: impl Into<String>) -> Result<Self> {
        let client = kube::Client::try_default()
            .await
            .context(InferConfigSnafu)?;
        Ok(Self {
            client,
            field_manager: field_manager.into(),
        })
    }

    /// Wraps an existing [`kube::Client`], e.g. one built from a test fixture.
    pub fn new(client: kube::Client, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
        }
    }

    /// Returns the field manager name used for server-side apply calls.
    pub fn field_manager(&self) -> &str {
        &self.field_manager
    }

    /// Escape hatch to the underlying [`kube::Client`] for calls this wrapper
    /// doesn't expose (e.g. `apiserver_version`).
    pub fn as_kube_client(&self) -> kube::Client {
        self.client.clone()
    }

    /// Returns a typed [`Api`] scoped to `namespace`, for namespaced resources.
    pub fn get_api<T>(&self, namespace: &str) -> Api<T>
    where
        T: Resource<Scope = NamespaceResourceScope>,
        <T as Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Returns a typed [`Api`] that spans every namespace.
    pub fn get_all_api<T>(&self) -> Api<T>
    where
        T: Resource<Scope = NamespaceResourceScope>,
        <T as Resource>::DynamicType: Default,
    {
        Api::all(self.client.clone())
    }

    /// Fetches a single namespaced object by name.
    pub async fn get<T>(&self, name: &str, namespace: &str) -> Result<T>
    where
        T: Resource<Scope = NamespaceResourceScope> + DeserializeOwned + Clone + Debug,
        <T as Resource>::DynamicType: Default,
    {
        self.get_api::<T>(namespace)
            .get(name)
            .await
            .with_context(|_| GetSnafu {
                resource: object_id::<T>(name, Some(namespace)),
            })
    }

    /// Fetches a single namespaced object, returning `Ok(None)` if it doesn't exist.
    pub async fn get_opt<T>(&self, name: &str, namespace: &str) -> Result<Option<T>>
    where
        T: Resource<Scope = NamespaceResourceScope> + DeserializeOwned + Clone + Debug,
        <T as Resource>::DynamicType: Default,
    {
        match self.get_api::<T>(namespace).get_opt(name).await {
            Ok(obj) => Ok(obj),
            Err(err) => Err(err).with_context(|_| GetSnafu {
                resource: object_id::<T>(name, Some(namespace)),
            }),
        }
    }

    /// Lists namespaced objects matching `list_params`.
    pub async fn list<T>(&self, namespace: &str, list_params: &ListParams) -> Result<Vec<T>>
    where
        T: Resource<Scope = NamespaceResourceScope> + DeserializeOwned + Clone + Debug,
        <T as Resource>::DynamicType: Default,
    {
        self.get_api::<T>(namespace)
            .list(list_params)
            .await
            .map(|list| list.items)
            .with_context(|_| ListSnafu {
                resource: T::kind(&Default::default()).to_string(),
            })
    }

    /// Applies (server-side) `resource` using this client's field manager.
    pub async fn apply_patch<T>(&self, resource: &T) -> Result<T>
    where
        T: Resource<Scope = NamespaceResourceScope> + Serialize + DeserializeOwned + Clone + Debug,
        <T as Resource>::DynamicType: Default,
    {
        let namespace = resource.namespace().unwrap_or_default();
        let name = resource.name_any();
        let api = self.get_api::<T>(&namespace);
        let patch_params = PatchParams::apply(&self.field_manager);
        api.patch(&name, &patch_params, &Patch::Apply(resource))
            .await
            .with_context(|_| ApplySnafu {
                resource: object_id::<T>(&name, Some(&namespace)),
            })
    }

    /// Creates `resource` if no resource with that name exists yet, using a
    /// plain (non-apply) `POST`. Prefer [`Client::apply_patch`] unless the
    /// resource type doesn't support server-side apply well (e.g. `Secret`
    /// `stringData`).
    pub async fn create<T>(&self, namespace: &str, resource: &T) -> Result<T>
    where
        T: Resource<Scope = NamespaceResourceScope> + Serialize + DeserializeOwned + Clone + Debug,
        <T as Resource>::DynamicType: Default,
    {
        self.get_api::<T>(namespace)
            .create(&PostParams::default(), resource)
            .await
            .with_context(|_| ApplySnafu {
                resource: object_id::<T>(&resource.name_any(), Some(namespace)),
            })
    }

    /// Patches the status subresource of `resource` via server-side apply.
    pub async fn apply_patch_status<T>(&self, namespace: &str, resource: &T) -> Result<T>
    where
        T: Resource<Scope = NamespaceResourceScope> + Serialize + DeserializeOwned + Clone + Debug,
        <T as Resource>::DynamicType: Default,
    {
        let name = resource.name_any();
        let patch_params = PatchParams::apply(&self.field_manager);
        self.get_api::<T>(namespace)
            .patch_status(&name, &patch_params, &Patch::Apply(resource))
            .await
            .with_context(|_| ApplyStatusSnafu {
                resource: object_id::<T>(&name, Some(namespace)),
            })
    }

    /// Deletes the named namespaced object, treating a pre-existing absence as success.
    pub async fn delete<T>(&self, name: &str, namespace: &str) -> Result<()>
    where
        T: Resource<Scope = NamespaceResourceScope> + DeserializeOwned + Clone + Debug,
        <T as Resource>::DynamicType: Default,
    {
        match self
            .get_api::<T>(namespace)
            .delete(name, &DeleteParams::default())
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(err)) if err.code == 404 => Ok(()),
            Err(source) => Err(Error::Delete {
                source,
                resource: object_id::<T>(name, Some(namespace)),
            }),
        }
    }
}

fn object_id<T: Resource>(name: &str, namespace: Option<&str>) -> String
where
    <T as Resource>::DynamicType: Default,
{
    let kind = T::kind(&Default::default());
    match namespace {
        Some(ns) => format!("{kind} {ns}/{name}"),
        None => format!("{kind} {name}"),
    }
}

/// Helper used by [`ObjectMeta`]-only call sites that want a namespace string
/// even for objects that may not (yet) carry one.
pub fn namespace_or_default(meta: &ObjectMeta) -> String {
    meta.namespace.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_includes_namespace_when_present() {
        assert_eq!(
            object_id::<k8s_openapi::api::core::v1::Secret>("creds", Some("default")),
            "Secret default/creds"
        );
    }
}
