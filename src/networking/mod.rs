use std::time::Duration;

use log::{info, warn};
use reqwest::Client;

use crate::engine::models::{Listing, Release};
use crate::error::{Result, UpdateError};
use crate::storage::Settings;

pub mod download;
pub mod progress;

pub const REGISTRY_API: &str = "https://www.curseforge.com/api/v1";

const FILES: &str = "files";
const ADDITIONAL_FILES: &str = "additional-files";
const DOWNLOAD: &str = "download";

/// Where release metadata comes from. The orchestrator only talks to this seam.
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    /// First entry of the release listing for the configured query.
    async fn latest_release(&self) -> Result<Release>;

    /// Server pack descriptor attached to `release` as an additional file.
    async fn server_pack_files(&self, release: &Release) -> Result<Release>;

    fn download_url(&self, release_id: u64) -> String;
}

/// Listing parameters for the registry files endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryQuery {
    pub pack_id: String,
    pub page_index: u32,
    pub page_size: u32,
    pub sort: String,
    pub sort_desc: bool,
    pub remove_alphas: bool,
}

impl From<&Settings> for RegistryQuery {
    fn from(settings: &Settings) -> Self {
        Self {
            pack_id: settings.pack_id.clone(),
            page_index: settings.page_index,
            page_size: settings.page_size,
            sort: settings.sort.clone(),
            sort_desc: settings.sort_desc,
            remove_alphas: settings.remove_alphas,
        }
    }
}

#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base: String,
    query: RegistryQuery,
}

impl RegistryClient {
    pub fn new(query: RegistryQuery) -> Self {
        Self::with_client(http_client(), REGISTRY_API, query)
    }

    pub fn with_client(client: Client, base: impl Into<String>, query: RegistryQuery) -> Self {
        Self {
            client,
            base: base.into().trim_end_matches('/').to_owned(),
            query,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn query_url(&self) -> String {
        let q = &self.query;
        format!(
            "{}/mods/{}/{FILES}?index={}&pageSize={}&sort={}&sortDescending={}&removeAlphas={}",
            self.base, q.pack_id, q.page_index, q.page_size, q.sort, q.sort_desc, q.remove_alphas
        )
    }

    pub fn additional_files_url(&self, release_id: u64) -> String {
        format!(
            "{}/mods/{}/{FILES}/{release_id}/{ADDITIONAL_FILES}",
            self.base, self.query.pack_id
        )
    }

    async fn first_entry(&self, url: &str) -> Result<Release> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpdateError::registry(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::registry(url, format!("HTTP {status}")));
        }
        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::registry(url, e))?;
        let listing: Listing<Release> =
            serde_json::from_str(&body).map_err(|e| UpdateError::malformed(url, e))?;
        listing
            .data
            .into_iter()
            .next()
            .ok_or_else(|| UpdateError::malformed(url, "listing contains no entries"))
    }
}

impl ReleaseSource for RegistryClient {
    async fn latest_release(&self) -> Result<Release> {
        let url = self.query_url();
        info!("registry: querying files endpoint {url}");
        let release = self.first_entry(&url).await?;
        info!(
            "registry: latest release {} ({})",
            release.display_name, release.id
        );
        Ok(release)
    }

    async fn server_pack_files(&self, release: &Release) -> Result<Release> {
        let url = self.additional_files_url(release.id);
        info!("registry: querying additional-files endpoint {url}");
        let files = self.first_entry(&url).await?;
        info!(
            "registry: additional file(s) for {}: {:?}",
            release.display_name, files
        );
        Ok(files)
    }

    fn download_url(&self, release_id: u64) -> String {
        format!(
            "{}/mods/{}/{FILES}/{release_id}/{DOWNLOAD}",
            self.base, self.query.pack_id
        )
    }
}

pub fn http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .read_timeout(Duration::from_secs(30))
        .user_agent(concat!("serverpack-updater/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|err| {
            warn!("network client: falling back to default HTTP client configuration ({err})");
            Client::new()
        })
}
