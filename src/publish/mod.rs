//! Asset publishing for a resolved release.
//!
//! One call per local file, strictly sequential: duplicate
//! reconciliation first, then a retried upload.

mod publisher;
mod retry;

pub use publisher::{PublishOptions, PublishOutcome, publish};
pub use retry::retry_with_backoff;
