//! The `BareMetalHost` custom resource, owned by the Metal3 bare-metal-operator.
//!
//! This operator only reads and labels `BareMetalHost` objects; it never creates or deletes
//! them. The subset of the upstream CRD modeled here is exactly what scheduling, constraint
//! evaluation, and extrapolation need: the object's labels, and the two secret references a
//! claimed host's network and BMC details are read from.

use k8s_openapi::api::core::v1::SecretReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A bare-metal host managed by Metal3, as seen by the sub-cluster scheduler.
///
/// Declared as a [`CustomResource`] so this crate gets a working [`kube::Resource`]
/// implementation for a CRD it does not own; only the fields this operator reads are modeled.
#[derive(Clone, CustomResource, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "metal3.io",
    version = "v1alpha1",
    kind = "BareMetalHost",
    plural = "baremetalhosts",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct BareMetalHostSpec {
    /// Baseboard management controller connection details for this host.
    pub bmc: Bmc,

    /// Reference to a `Secret` holding cloud-init style network configuration (a
    /// `networkData` key) for this host's network interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_data: Option<SecretReference>,
}

/// Baseboard management controller details of a [`BareMetalHost`].
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bmc {
    pub address: String,

    /// Name of a `Secret` (in the host's namespace) with `username`/`password` keys.
    pub credentials_name: String,
}
