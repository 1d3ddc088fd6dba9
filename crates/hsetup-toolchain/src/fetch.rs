//! Downloads and archive extraction.

use async_trait::async_trait;
use flate2::read::GzDecoder;
use futures_util::StreamExt;
use hsetup_core::{Error, Result};
use hsetup_ui::{Printer, Progress};
use reqwest::Client;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;
use std::time::Duration;
use tar::Archive;
use tracing::debug;

/// Seam between the installer and the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download `url` to the file `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Fetcher backed by `reqwest`, streaming to disk with a progress bar.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    printer: Printer,
}

impl HttpFetcher {
    pub fn new(printer: Printer) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hsetup/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, printer })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("Downloading {} to {}", url, dest.display());

        let download_error = |message: String| Error::Download {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())));
        }

        let total = response.content_length().unwrap_or(0);
        let name = url.rsplit('/').next().unwrap_or(url).to_string();
        let progress = Progress::new(self.printer, total, format!("Downloading {name}"));

        let temp_path = dest.with_extension("part");
        let mut file = File::create(&temp_path)
            .map_err(|e| Error::io("failed to create download file", &temp_path, e))?;

        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_error(format!("download interrupted: {e}")))?;
            file.write_all(&chunk)
                .map_err(|e| Error::io("failed to write download data", &temp_path, e))?;
            downloaded += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        drop(file);

        progress.finish(format!(
            "Downloaded {name} ({:.1} MB)",
            downloaded as f64 / 1_000_000.0
        ));

        fs::rename(&temp_path, dest).map_err(|e| Error::io("failed to finalize download", dest, e))
    }
}

/// Extract a `.tar.gz` archive into `dest_dir`.
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    debug!(
        "Extracting {} to {}",
        archive_path.display(),
        dest_dir.display()
    );

    let file = File::open(archive_path)
        .map_err(|e| Error::io("failed to open archive", archive_path, e))?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
    archive
        .unpack(dest_dir)
        .map_err(|e| Error::io("failed to extract archive", archive_path, e))
}

/// Mark a file as executable. No-op on Windows.
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| Error::io("failed to set executable permissions", path, e))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
