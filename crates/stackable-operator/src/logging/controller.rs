//! Conventions for errors returned from a [`kube::runtime::Controller`]'s
//! reconcile function, so they can be logged and reported consistently.

use kube::{core::DynamicObject, runtime::reflector::ObjectRef};

/// An error that occurred during reconciliation, with enough structure to be
/// reported both in logs and as a Kubernetes `Event` on the object that
/// triggered it.
///
/// Implementors typically derive this from a [`snafu::Snafu`] enum's
/// discriminants, using [`strum::IntoStaticStr`] for [`category`][Self::category]:
///
/// ```ignore
/// #[derive(Snafu, Debug, EnumDiscriminants)]
/// #[strum_discriminants(derive(IntoStaticStr))]
/// pub enum Error {
///     #[snafu(display("failed to apply config map"))]
///     ApplyConfigMap { source: stackable_operator::client::Error },
/// }
///
/// impl ReconcilerError for Error {
///     fn category(&self) -> &'static str {
///         ErrorDiscriminants::from(self).into()
///     }
/// }
/// ```
pub trait ReconcilerError: std::error::Error {
    /// A short, machine-readable category for this error, used as the
    /// `reason` of the reported Kubernetes event (e.g. `"ApplyConfigMap"`).
    fn category(&self) -> &'static str;

    /// An additional object this error concerns, if not the object being
    /// reconciled (e.g. a `Secret` that failed to parse). Reported as the
    /// event's `secondary` object.
    fn secondary_object(&self) -> Option<ObjectRef<DynamicObject>> {
        None
    }
}
