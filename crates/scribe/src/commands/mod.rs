//! CLI command implementations.

mod common;
pub(crate) mod new;
pub(crate) mod reconcile;
pub(crate) mod serve;

pub(crate) use new::NewArgs;
pub(crate) use reconcile::ReconcileArgs;
pub(crate) use serve::ServeArgs;
