use super::error::ModelStoreError;
use app_state::ModelSettings;
use reqwest::{Client, header};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

const DRIVE_HOST: &str = "drive.google.com";

/// Makes sure the model file exists, downloading it when a URL is configured.
///
/// # Errors
///
/// Fails when the model is missing and no download URL is set, or when the download fails.
pub async fn ensure_model(
    settings: &ModelSettings,
    client: &Client,
) -> Result<PathBuf, ModelStoreError> {
    if settings.exists() {
        debug!("Model found at {}", settings.path.display());
        return Ok(settings.path.clone());
    }
    let Some(url) = &settings.download_url else {
        return Err(ModelStoreError::Missing(settings.path.clone()));
    };

    let url = direct_download_url(url)?;
    download_model(client, &url, &settings.path).await?;
    Ok(settings.path.clone())
}

/// Rewrites Google Drive share links to their direct download form, other URLs pass through.
pub fn direct_download_url(url: &str) -> Result<Url, ModelStoreError> {
    let url = Url::parse(url)?;
    if url.host_str() != Some(DRIVE_HOST) {
        return Ok(url);
    }

    // Share links look like /file/d/<id>/view, older ones like /open?id=<id>.
    let file_id = url
        .path_segments()
        .and_then(|mut segments| {
            match (segments.next(), segments.next(), segments.next()) {
                (Some("file"), Some("d"), Some(id)) if !id.is_empty() => Some(id.to_owned()),
                _ => None,
            }
        })
        .or_else(|| {
            url.query_pairs()
                .find(|(key, _)| key == "id")
                .map(|(_, value)| value.into_owned())
        });
    let Some(file_id) = file_id else {
        return Ok(url);
    };

    let mut direct = Url::parse("https://drive.google.com/uc")?;
    direct
        .query_pairs_mut()
        .append_pair("export", "download")
        .append_pair("id", &file_id);
    Ok(direct)
}

/// Streams `url` into `target`. The file only appears at `target` once it is complete.
pub async fn download_model(
    client: &Client,
    url: &Url,
    target: &Path,
) -> Result<(), ModelStoreError> {
    info!("Downloading model from {url} to {}", target.display());
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).await?;

    let mut response = client.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(ModelStoreError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"));
    if is_html {
        return Err(ModelStoreError::NotAFile(url.to_string()));
    }

    let temp = tempfile::Builder::new()
        .prefix(".model-")
        .suffix(".part")
        .tempfile_in(parent)?;
    let mut file = fs::File::from_std(temp.reopen()?);
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    temp.persist(target)?;
    info!(
        "Model downloaded: {:.2} MB",
        written as f64 / (1024.0 * 1024.0)
    );
    Ok(())
}
