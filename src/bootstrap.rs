//! Dataset provisioning.
//!
//! Makes sure the SQLite file exists before the server starts: if it is
//! missing, the configured archive is downloaded and the first `.db` entry in
//! it is written to the configured path. The file is written to a sibling
//! and renamed into place, so a failed download never leaves a truncated
//! dataset behind.

use crate::config::DatasetConfig;
use crate::constants::DATASET_FILE_EXTENSION;
use crate::error::ServerError;
use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Ensure the dataset file exists, downloading it if allowed.
///
/// Returns the path of the dataset file.
pub async fn ensure_dataset(config: &DatasetConfig) -> Result<PathBuf, ServerError> {
    let target = config.path.clone();

    if target.exists() {
        info!("{} already exists, skipping download", target.display());
        return Ok(target);
    }

    if !config.auto_download {
        return Err(ServerError::setup(format!(
            "dataset {} not found and automatic download is disabled",
            target.display()
        )));
    }

    info!("Downloading Chinook dataset from {}", config.source_url);
    let archive = download_archive(&config.source_url, config.download_timeout).await?;
    debug!("Downloaded {} bytes, extracting", archive.len());

    let destination = target.clone();
    let entry = tokio::task::spawn_blocking(move || extract_dataset(&archive, &destination))
        .await??;

    info!("Extracted {} to {}", entry, target.display());
    Ok(target)
}

async fn download_archive(url: &str, timeout: Duration) -> Result<Vec<u8>, ServerError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServerError::setup_with_source("failed to build HTTP client", e))?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ServerError::setup_with_source(format!("failed to download {}", url), e))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ServerError::setup_with_source(format!("failed to read {}", url), e))?;

    Ok(bytes.to_vec())
}

/// Write the first `.db` entry of a zip archive to `target`.
///
/// The entry's directory inside the archive is ignored. Returns the entry name.
pub fn extract_dataset(archive: &[u8], target: &Path) -> Result<String, ServerError> {
    let mut archive = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| ServerError::setup_with_source("downloaded file is not a zip archive", e))?;

    let mut found = None;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| ServerError::setup_with_source("unreadable archive entry", e))?;
        if entry.is_file() && entry.name().ends_with(DATASET_FILE_EXTENSION) {
            found = Some(index);
            break;
        }
    }

    let index = found.ok_or_else(|| {
        ServerError::setup(format!(
            "archive contains no {} file",
            DATASET_FILE_EXTENSION
        ))
    })?;

    let mut entry = archive
        .by_index(index)
        .map_err(|e| ServerError::setup_with_source("unreadable archive entry", e))?;
    let name = entry.name().to_string();

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ServerError::setup_with_source(format!("cannot create {}", parent.display()), e)
        })?;
    }

    let partial = partial_path(target);
    let written = File::create(&partial)
        .and_then(|mut file| io::copy(&mut entry, &mut file).and_then(|_| file.sync_all()))
        .and_then(|_| fs::rename(&partial, target));

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&partial) {
            warn!("Could not remove {}: {}", partial.display(), cleanup);
        }
        return Err(ServerError::setup_with_source(
            format!("failed to write {}", target.display()),
            e,
        ));
    }

    Ok(name)
}

fn partial_path(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    target.with_file_name(format!(".{}.partial", file_name))
}
