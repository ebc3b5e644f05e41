//! Local asset staging: naming, templating, and glob expansion.

use std::path::{Path, PathBuf};

use crate::error::{Result, UploadError};

/// Placeholder in `asset_name` replaced with the resolved tag
const TAG_PLACEHOLDER: &str = "$tag";

/// A local file staged for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCandidate {
    /// Path of the file on disk
    pub path: PathBuf,
    /// Name the asset is published under
    pub name: String,
}

impl AssetCandidate {
    /// Stage a single file under an optional declared name.
    ///
    /// An unset or empty `asset_name` falls back to the file's base
    /// name; otherwise every `$tag` occurrence is replaced with the
    /// resolved tag before use.
    pub fn for_file(file: &str, asset_name: Option<&str>, tag: &str) -> Self {
        let name = match asset_name {
            Some(declared) if !declared.is_empty() => declared.replace(TAG_PLACEHOLDER, tag),
            _ => base_name(Path::new(file)),
        };
        Self {
            path: PathBuf::from(file),
            name,
        }
    }

    /// Stage a glob match. Globbed files are always published under
    /// their own base name.
    pub fn for_glob_match(path: PathBuf) -> Self {
        let name = base_name(&path);
        Self { path, name }
    }
}

/// Base name of a path, lossily converted for non-UTF-8 file names
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Expand a glob pattern into its matches, in glob-match order.
///
/// Zero matches is fatal: a CI step that uploads nothing is a
/// misconfigured build, not a success.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|e| UploadError::config(format!("Invalid glob pattern '{pattern}': {e}")))?;
    let mut matches = Vec::new();
    for entry in paths {
        matches.push(entry.map_err(glob::GlobError::into_error)?);
    }
    if matches.is_empty() {
        return Err(UploadError::NoMatch {
            pattern: pattern.to_string(),
        });
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_name_templated_with_tag() {
        let candidate =
            AssetCandidate::for_file("dist/app.zip", Some("build-$tag.zip"), "2.3.1");
        assert_eq!(candidate.name, "build-2.3.1.zip");
    }

    #[test]
    fn unset_name_defaults_to_base_name() {
        let candidate = AssetCandidate::for_file("dist/app.bin", None, "v1.0.0");
        assert_eq!(candidate.name, "app.bin");
        let candidate = AssetCandidate::for_file("dist/app.bin", Some(""), "v1.0.0");
        assert_eq!(candidate.name, "app.bin");
    }

    #[test]
    fn glob_match_uses_own_base_name() {
        let candidate = AssetCandidate::for_glob_match(PathBuf::from("out/nested/tool.tar.gz"));
        assert_eq!(candidate.name, "tool.tar.gz");
    }

    #[test]
    fn expand_glob_reports_matches_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["b.bin", "a.bin", "c.txt"] {
            std::fs::write(dir.path().join(file), b"x").unwrap();
        }
        let pattern = format!("{}/*.bin", dir.path().display());
        let matches = expand_glob(&pattern).unwrap();
        let names: Vec<String> = matches.iter().map(|p| base_name(p)).collect();
        assert_eq!(names, ["a.bin", "b.bin"]);
    }

    #[test]
    fn expand_glob_with_no_matches_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.bin", dir.path().display());
        assert!(matches!(
            expand_glob(&pattern),
            Err(UploadError::NoMatch { .. })
        ));
    }
}
