//! Workflow step outputs.
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` as
//! `name=value` lines; when the variable is unset (local runs) the
//! value is logged instead.

use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Record a step output for downstream workflow steps
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => append_output(Path::new(&path), name, value),
        None => {
            log::info!("output {name}={value}");
            Ok(())
        }
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{name}={value}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_name_value_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outputs");
        append_output(&path, "browser_download_url", "https://example.test/a.bin").unwrap();
        append_output(&path, "draft_id", "42").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "browser_download_url=https://example.test/a.bin\ndraft_id=42\n"
        );
    }
}
