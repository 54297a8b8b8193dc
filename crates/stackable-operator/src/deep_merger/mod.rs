use k8s_openapi::DeepMerge;
use kube::{ResourceExt, core::DynamicObject};
use serde::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};

mod crd;
pub use crd::ObjectOverrides;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "failed to parse dynamic object as apiVersion {target_api_version:?} and kind {target_kind:?}"
    ))]
    ParseDynamicObject {
        source: kube::core::dynamic::ParseDynamicObjectError,
        target_api_version: String,
        target_kind: String,
    },
}

// Takes an arbitrary Kubernetes object (`base`) and applies the given list of deep merges onto it.
//
// Merges are only applied to objects that have the same apiVersion, kind, name
// and namespace.
pub fn apply_object_overrides<R>(
    base: &mut R,
    object_overrides: ObjectOverrides,
) -> Result<(), Error>
where
    R: kube::Resource<DynamicType = ()> + DeepMerge + DeserializeOwned,
{
    for object_override in object_overrides.object_overrides {
        apply_deep_merge(base, object_override)?;
    }
    Ok(())
}

// Takes an arbitrary Kubernetes object (`base`) and applies the deep merge.
//
// Merges are only applied to objects that have the same apiVersion, kind, name
// and namespace.
pub fn apply_deep_merge<R>(base: &mut R, merge: DynamicObject) -> Result<(), Error>
where
    R: kube::Resource<DynamicType = ()> + DeepMerge + DeserializeOwned,
{
    let Some(merge_type) = &merge.types else {
        return Ok(());
    };
    if merge_type.api_version != R::api_version(&()) || merge_type.kind != R::kind(&()) {
        return Ok(());
    }
    let Some(merge_name) = &merge.metadata.name else {
        return Ok(());
    };

    // The name always needs to match
    if &base.name_any() != merge_name {
        return Ok(());
    }

    // If there is a namespace on the base object, it needs to match as well
    // Note that it is not set for cluster-scoped objects.
    if base.namespace() != merge.metadata.namespace {
        return Ok(());
    }

    let deserialized_merge = merge
        .try_parse()
        .with_context(|_| ParseDynamicObjectSnafu {
            target_api_version: R::api_version(&()),
            target_kind: R::kind(&()),
        })?;
    base.merge_from(deserialized_merge);

    Ok(())
}
