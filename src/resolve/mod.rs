//! Release resolution: find, create, or reconcile the remote release.
//!
//! Runs exactly once per invocation and hands the publisher an
//! immutable release handle.

mod resolver;

pub use resolver::{DesiredRelease, ReconcilePolicy, Resolved, resolve};
