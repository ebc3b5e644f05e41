//! reqwest-backed GitHub REST client.

use std::sync::OnceLock;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use super::models::{NewRelease, Release, ReleaseAsset, ReleaseLookup, ReleasePatch, ReleaseTarget};
use super::ReleaseHost;
use crate::error::{Result, UploadError};

/// Default API base when `GITHUB_API_URL` is not set (GHES overrides it)
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Page size used when draining the asset list
const ASSETS_PER_PAGE: usize = 100;

/// One-time initialization guard for the rustls crypto provider.
///
/// install_default() must run exactly once per process even when
/// multiple clients are constructed.
static RUSTLS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// GitHub REST client scoped to a single repository
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: Url,
    target: ReleaseTarget,
}

impl GitHubClient {
    /// Create a client authenticated with the given token.
    ///
    /// The API base is taken from `GITHUB_API_URL` when present so the
    /// same binary works against GitHub Enterprise Server.
    pub fn new(token: &str, target: ReleaseTarget) -> Result<Self> {
        RUSTLS_INITIALIZED.get_or_init(|| {
            rustls::crypto::ring::default_provider()
                .install_default()
                .unwrap_or_else(|e| {
                    panic!("Failed to install rustls crypto provider: {e:?}");
                })
        });

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| UploadError::config("repo_token contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .user_agent(concat!("release_upload/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        let api_base = std::env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        // A trailing slash keeps Url::join from eating the last path
        // segment of an Enterprise base like https://ghe.example/api/v3.
        let api_base = Url::parse(&format!("{}/", api_base.trim_end_matches('/')))
            .map_err(|e| UploadError::config(format!("Invalid GITHUB_API_URL: {e}")))?;

        Ok(Self {
            http,
            api_base,
            target,
        })
    }

    fn repo_url(&self, rest: &str) -> Result<Url> {
        let path = format!(
            "repos/{}/{}/{}",
            self.target.owner, self.target.repo, rest
        );
        self.api_base
            .join(&path)
            .map_err(|e| UploadError::config(format!("Invalid API URL for '{path}': {e}")))
    }

    /// Map a non-2xx response to an `Api` error carrying the platform's
    /// message when the body has one.
    async fn api_error(response: reqwest::Response) -> UploadError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(text);
        UploadError::Api { status, message }
    }

    async fn fetch_release(&self, url: Url) -> Result<ReleaseLookup> {
        let response = self.http.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(ReleaseLookup::NotFound),
            status if status.is_success() => {
                let release: Release = response.json().await?;
                Ok(ReleaseLookup::Found(release))
            }
            _ => Err(Self::api_error(response).await),
        }
    }
}

impl ReleaseHost for GitHubClient {
    async fn release_by_tag(&self, tag: &str) -> Result<ReleaseLookup> {
        log::debug!("Getting release by tag {tag}");
        let url = self.repo_url(&format!("releases/tags/{tag}"))?;
        self.fetch_release(url).await
    }

    async fn release_by_id(&self, id: u64) -> Result<ReleaseLookup> {
        log::debug!("Getting release by id {id}");
        let url = self.repo_url(&format!("releases/{id}"))?;
        self.fetch_release(url).await
    }

    async fn create_release(&self, new: &NewRelease) -> Result<Release> {
        log::debug!("Creating release for tag {}", new.tag_name);
        let url = self.repo_url("releases")?;
        let response = self.http.post(url).json(new).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn update_release(&self, id: u64, patch: &ReleasePatch) -> Result<Release> {
        log::debug!("Updating release {id}");
        let url = self.repo_url(&format!("releases/{id}"))?;
        let response = self.http.patch(url).json(patch).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn tag_exists(&self, tag: &str) -> Result<bool> {
        let url = self.repo_url(&format!("git/ref/tags/{tag}"))?;
        let response = self.http.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn release_assets(&self, release_id: u64) -> Result<Vec<ReleaseAsset>> {
        let mut assets = Vec::new();
        for page in 1.. {
            let url = self.repo_url(&format!(
                "releases/{release_id}/assets?per_page={ASSETS_PER_PAGE}&page={page}"
            ))?;
            let response = self.http.get(url).send().await?;
            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }
            let batch: Vec<ReleaseAsset> = response.json().await?;
            let drained = batch.len() < ASSETS_PER_PAGE;
            assets.extend(batch);
            if drained {
                break;
            }
        }
        Ok(assets)
    }

    async fn delete_asset(&self, asset_id: u64) -> Result<()> {
        log::debug!("Deleting asset {asset_id}");
        let url = self.repo_url(&format!("releases/assets/{asset_id}"))?;
        let response = self.http.delete(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }

    async fn upload_asset(&self, release: &Release, name: &str, content: Bytes) -> Result<ReleaseAsset> {
        // The upload endpoint lives on a separate host and arrives as a
        // hypermedia template: strip the {?name,label} suffix.
        let endpoint = release
            .upload_url
            .split('{')
            .next()
            .unwrap_or(&release.upload_url);
        let mut url = Url::parse(endpoint).map_err(|e| {
            UploadError::config(format!("Invalid upload endpoint '{endpoint}': {e}"))
        })?;
        url.query_pairs_mut().append_pair("name", name);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "binary/octet-stream")
            .header(CONTENT_LENGTH, content.len())
            .body(content)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json().await?)
    }
}
