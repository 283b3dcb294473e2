//! HTTP client for resmush.it-compatible compression services

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Number;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::{CompressError, CompressResult};

use super::traits::{CompressionBackend, UploadAck};

/// Multipart field the backend reads the image from
const FILE_FIELD: &str = "files";

/// Raw upload reply. The backend answers some failures with 200 and an error body.
#[derive(Debug, Deserialize)]
struct UploadReply {
    dest: Option<String>,
    percent: Option<Number>,
    src_size: Option<Number>,
    dest_size: Option<Number>,
    error_long: Option<String>,
}

/// Stateless compression client; one instance serves all requests
#[derive(Debug, Clone)]
pub struct ResmushClient {
    client: Client,
    endpoint: String,
    quality: u8,
}

impl ResmushClient {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            quality: config.quality,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompressionBackend for ResmushClient {
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, filename: &str) -> CompressResult<UploadAck> {
        debug!("Uploading {} bytes as {} ({})", bytes.len(), filename, mime_type);

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| CompressError::UploadFailed(format!("invalid MIME type {:?}: {}", mime_type, e)))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.client.post(&self.endpoint)
            .query(&[("qlty", self.quality)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| CompressError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompressError::UploadFailed(format!("backend returned {}", status)));
        }

        let body = response.bytes()
            .await
            .map_err(|e| CompressError::UploadFailed(format!("failed to read response: {}", e)))?;
        let reply: UploadReply = serde_json::from_slice(&body)
            .map_err(|e| CompressError::UploadFailed(format!("invalid response body: {}", e)))?;

        let dest = reply.dest.ok_or_else(|| {
            CompressError::UploadFailed(
                reply.error_long.unwrap_or_else(|| "response has no dest".to_string()),
            )
        })?;

        debug!("Backend accepted upload: dest={} percent={:?}", dest, reply.percent);

        Ok(UploadAck {
            dest,
            percent: reply.percent,
            src_size: reply.src_size,
            dest_size: reply.dest_size,
        })
    }

    async fn fetch_compressed(&self, dest: &str) -> CompressResult<Vec<u8>> {
        let response = self.client.get(dest)
            .send()
            .await
            .map_err(|e| CompressError::DownloadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompressError::DownloadFailed(format!("{} returned {}", dest, status)));
        }

        let bytes = response.bytes()
            .await
            .map_err(|e| CompressError::DownloadFailed(e.to_string()))?;

        debug!("Downloaded {} compressed bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
