//! Single item download.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::download::outcome::DownloadOutcome;
use crate::error::{Error, Result};
use crate::fs::sanitize_filename;
use crate::provider::ProviderItem;

/// Download one item into `output_dir`, making exactly one attempt.
pub async fn download_item(
    client: &Client,
    item: &ProviderItem,
    output_dir: &Path,
    cancel: &CancellationToken,
) -> DownloadOutcome {
    match fetch_to_file(client, item, output_dir, cancel).await {
        Ok(path) => DownloadOutcome::Success {
            link: item.link.clone(),
            path,
        },
        Err(cause) => DownloadOutcome::Failure {
            item: item.clone(),
            cause,
        },
    }
}

async fn fetch_to_file(
    client: &Client,
    item: &ProviderItem,
    output_dir: &Path,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    let filename = sanitize_filename(&item.filename).map_err(|e| Error::Persist(e.to_string()))?;
    let output_path = output_dir.join(filename);

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        result = client.get(&item.link).send() => {
            result.map_err(|e| Error::Fetch(format!("GET {}: {}", item.link, e)))?
        }
    };

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Fetch(format!("GET {} returned HTTP {}", item.link, status)));
    }

    // Only create the file once there is a body to write into it
    let mut file = File::create(&output_path).await.map_err(|e| {
        Error::Persist(format!("Failed to create {}: {}", output_path.display(), e))
    })?;

    match stream_body(response, &mut file, &output_path, cancel).await {
        Ok(written) => {
            tracing::debug!("Wrote {} bytes to {}", written, output_path.display());
            Ok(output_path)
        }
        Err(e) => {
            drop(file);
            if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                tracing::debug!(
                    "Could not remove partial file {}: {}",
                    output_path.display(),
                    remove_err
                );
            }
            Err(e)
        }
    }
}

/// Stream the response body into `file`, returning the byte count.
async fn stream_body(
    response: Response,
    file: &mut File,
    output_path: &Path,
    cancel: &CancellationToken,
) -> Result<u64> {
    let persist = |e: std::io::Error| {
        Error::Persist(format!("Failed to write {}: {}", output_path.display(), e))
    };

    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            chunk = stream.next() => chunk,
        };
        let Some(chunk) = chunk else {
            break;
        };
        let chunk = chunk.map_err(|e| Error::Fetch(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await.map_err(persist)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(persist)?;
    Ok(written)
}
