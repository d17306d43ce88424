use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use log::{debug, info};
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, UpdateError};

/// Streams remote artifacts to disk.
#[derive(Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Download `url` to `dest`, calling `on_progress(bytes_so_far, chunk_len, total)`
    /// after every chunk written.
    ///
    /// A failed transfer leaves whatever was already written in place.
    pub async fn fetch<F>(&self, url: &str, dest: &Path, mut on_progress: F) -> Result<u64>
    where
        F: FnMut(u64, usize, Option<u64>),
    {
        let failed = |reason: String| UpdateError::DownloadFailed {
            url: url.to_owned(),
            path: dest.to_path_buf(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| failed(format!("failed to create download dir: {e}")))?;
        }
        let mut file = File::create(dest)
            .await
            .map_err(|e| failed(format!("failed to create file: {e}")))?;

        let total = response.content_length();
        info!("download: {url} -> {} ({total:?} bytes)", dest.display());
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| failed(format!("stream error: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| failed(format!("write error: {e}")))?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, chunk.len(), total);
        }

        file.flush()
            .await
            .map_err(|e| failed(format!("flush error: {e}")))?;

        // hyper reports a body cut short of Content-Length as a stream error;
        // this catches transports that end the stream cleanly instead.
        if let Some(total) = total
            && downloaded < total
        {
            return Err(failed(format!(
                "download incomplete: received {downloaded} of {total} bytes"
            )));
        }

        debug!("download: finished {} ({downloaded} bytes)", dest.display());
        Ok(downloaded)
    }
}

/// Local file name for a registry artifact, stripped of any directory parts.
pub fn artifact_path(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let name = Path::new(file_name).file_name()?;
    Some(dir.join(name))
}
