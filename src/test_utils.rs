//! Shared test utilities: an in-memory [`ReleaseHost`] fake.
//!
//! Records every remote call so tests can assert on call counts and
//! payloads without a network.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use crate::error::{Result, UploadError};
use crate::github::{NewRelease, Release, ReleaseAsset, ReleaseHost, ReleaseLookup, ReleasePatch};

/// In-memory stand-in for the GitHub API
pub struct FakeHost {
    /// Releases known to the fake, looked up by tag or id
    pub releases: Mutex<Vec<Release>>,
    /// Assets attached to releases, keyed by release id
    pub assets: Mutex<Vec<(u64, ReleaseAsset)>>,
    /// Git tags that exist in the repository
    pub tags: Mutex<HashSet<String>>,
    /// Journal of remote calls, in order
    pub calls: Mutex<Vec<&'static str>>,
    /// Creation payloads, in order
    pub created: Mutex<Vec<NewRelease>>,
    /// Update payloads, in order
    pub updates: Mutex<Vec<(u64, ReleasePatch)>>,
    upload_failures: AtomicU64,
    next_id: AtomicU64,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            releases: Mutex::new(Vec::new()),
            assets: Mutex::new(Vec::new()),
            tags: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            upload_failures: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    /// Number of journal entries for one remote operation
    pub fn count(&self, call: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|&&c| c == call)
            .count()
    }

    /// Add a release the fake already knows about
    pub fn seed_release(&self, tag: &str, mutate: impl FnOnce(&mut Release)) -> Release {
        let id = self.allocate_id();
        let mut release = Release {
            id,
            tag_name: tag.to_string(),
            draft: false,
            prerelease: false,
            name: None,
            body: None,
            upload_url: format!(
                "https://uploads.example.test/repos/o/r/releases/{id}/assets{{?name,label}}"
            ),
            target_commitish: String::new(),
        };
        mutate(&mut release);
        self.releases.lock().unwrap().push(release.clone());
        release
    }

    /// Add an existing git tag
    pub fn seed_tag(&self, tag: &str) {
        self.tags.lock().unwrap().insert(tag.to_string());
    }

    /// Attach an asset to a release
    pub fn seed_asset(&self, release_id: u64, name: &str) -> ReleaseAsset {
        let id = self.allocate_id();
        let asset = ReleaseAsset {
            id,
            name: name.to_string(),
            browser_download_url: format!("https://dl.example.test/{release_id}/{name}"),
        };
        self.assets.lock().unwrap().push((release_id, asset.clone()));
        asset
    }

    /// Make the next `n` uploads fail with a transient API error
    pub fn fail_uploads(&self, n: u64) {
        self.upload_failures.store(n, Ordering::SeqCst);
    }

    /// Names of the assets currently attached to a release
    pub fn asset_names(&self, release_id: u64) -> Vec<String> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .filter(|(rid, _)| *rid == release_id)
            .map(|(_, a)| a.name.clone())
            .collect()
    }
}

impl ReleaseHost for FakeHost {
    async fn release_by_tag(&self, tag: &str) -> Result<ReleaseLookup> {
        self.record("release_by_tag");
        let found = self
            .releases
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.tag_name == tag && !tag.is_empty())
            .cloned();
        Ok(match found {
            Some(release) => ReleaseLookup::Found(release),
            None => ReleaseLookup::NotFound,
        })
    }

    async fn release_by_id(&self, id: u64) -> Result<ReleaseLookup> {
        self.record("release_by_id");
        let found = self
            .releases
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned();
        Ok(match found {
            Some(release) => ReleaseLookup::Found(release),
            None => ReleaseLookup::NotFound,
        })
    }

    async fn create_release(&self, new: &NewRelease) -> Result<Release> {
        self.record("create_release");
        self.created.lock().unwrap().push(new.clone());
        let id = self.allocate_id();
        let release = Release {
            id,
            tag_name: new.tag_name.clone(),
            draft: new.draft,
            prerelease: new.prerelease,
            name: new.name.clone(),
            body: new.body.clone(),
            upload_url: format!(
                "https://uploads.example.test/repos/o/r/releases/{id}/assets{{?name,label}}"
            ),
            target_commitish: new.target_commitish.clone().unwrap_or_default(),
        };
        self.releases.lock().unwrap().push(release.clone());
        Ok(release)
    }

    async fn update_release(&self, id: u64, patch: &ReleasePatch) -> Result<Release> {
        self.record("update_release");
        self.updates.lock().unwrap().push((id, patch.clone()));
        let mut releases = self.releases.lock().unwrap();
        let release = releases.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            UploadError::Api {
                status: 404,
                message: format!("no release with id {id}"),
            }
        })?;
        if let Some(name) = &patch.name {
            release.name = Some(name.clone());
        }
        if let Some(body) = &patch.body {
            release.body = Some(body.clone());
        }
        if let Some(prerelease) = patch.prerelease {
            release.prerelease = prerelease;
        }
        Ok(release.clone())
    }

    async fn tag_exists(&self, tag: &str) -> Result<bool> {
        self.record("tag_exists");
        Ok(self.tags.lock().unwrap().contains(tag))
    }

    async fn release_assets(&self, release_id: u64) -> Result<Vec<ReleaseAsset>> {
        self.record("release_assets");
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|(rid, _)| *rid == release_id)
            .map(|(_, a)| a.clone())
            .collect())
    }

    async fn delete_asset(&self, asset_id: u64) -> Result<()> {
        self.record("delete_asset");
        self.assets.lock().unwrap().retain(|(_, a)| a.id != asset_id);
        Ok(())
    }

    async fn upload_asset(&self, release: &Release, name: &str, content: Bytes) -> Result<ReleaseAsset> {
        self.record("upload_asset");
        if self
            .upload_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(UploadError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }
        assert!(!content.is_empty(), "empty uploads must be skipped earlier");
        Ok(self.seed_asset(release.id, name))
    }
}
