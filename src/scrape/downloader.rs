use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::scrape::links::{kml_url, to_export_url, DEFAULT_EXPORT_BASE_URL, DEFAULT_KML_BASE_URL};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("File not found (404): {0}")]
    NotFound(String),

    #[error("Server error (5xx): {0}")]
    ServerError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected status {status} while downloading {what}")]
    UnexpectedStatus { status: u16, what: String },
}

/// Fetches My Maps KML documents and Sheets `.xlsx` exports
#[derive(Clone)]
pub struct SheetDownloader {
    client: Client,
    kml_base_url: String,
    export_base_url: String,
}

impl SheetDownloader {
    /// Downloader against the public Google endpoints
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        Self::with_base_urls(timeout, DEFAULT_KML_BASE_URL, DEFAULT_EXPORT_BASE_URL)
    }

    pub fn with_base_urls(
        timeout: Duration,
        kml_base_url: impl Into<String>,
        export_base_url: impl Into<String>,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            kml_base_url: kml_base_url.into(),
            export_base_url: export_base_url.into(),
        })
    }

    /// KML text of a map
    #[instrument(skip(self))]
    pub async fn fetch_kml(&self, map_id: &str) -> Result<String, DownloadError> {
        let url = kml_url(&self.kml_base_url, map_id)
            .map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;

        info!("Fetching KML: {}", url);
        let bytes = self.download_file(url.as_str(), "KML").await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// `.xlsx` export of a Sheets link
    pub async fn download_sheet(&self, sheet_url: &str) -> Result<Vec<u8>, DownloadError> {
        let export_url = to_export_url(sheet_url, &self.export_base_url)
            .map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;

        debug!("Downloading sheet export: {}", export_url);
        self.download_file(&export_url, sheet_url).await
    }

    /// Internal helper to download a file from a URL
    async fn download_file(&self, url: &str, what: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            debug!("Downloaded {what} ({} bytes)", bytes.len());
            Ok(bytes.to_vec())
        } else if status.as_u16() == 404 {
            Err(DownloadError::NotFound(format!("{what} not found on server")))
        } else if status.is_server_error() {
            Err(DownloadError::ServerError(format!(
                "Server error {status} while downloading {what}"
            )))
        } else {
            Err(response
                .error_for_status()
                .err()
                .map(DownloadError::HttpError)
                .unwrap_or_else(|| DownloadError::UnexpectedStatus {
                    status: status.as_u16(),
                    what: what.to_string(),
                }))
        }
    }
}
