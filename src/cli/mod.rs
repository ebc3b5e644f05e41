//! Command line interface for release_upload.
//!
//! Argument parsing, normalized run configuration, command execution,
//! and user-facing output.

mod args;
mod commands;
mod output;

pub use args::{Args, RunConfig};
pub use commands::execute_upload;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_upload(args).await
}
