//! Compression Service - Core business logic
//!
//! Runs one request through decode, upload, download and encode.
//! Every step runs once; the first failure ends the run.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::backend::CompressionBackend;
use crate::codec;
use crate::error::{CompressResult, Stage};
use crate::utils::image::upload_mime;

use super::types::*;

/// Filename sent upstream. Always `.png`, whatever the caller's `ext` says.
pub const UPLOAD_FILENAME: &str = "placeholder.png";

/// Image compression service
pub struct CompressionService<B: CompressionBackend> {
    backend: Arc<B>,
}

impl<B: CompressionBackend> CompressionService<B> {
    /// Create a new compression service
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Get a reference to the backend
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Compress the image inside `raw_data_url`
    pub async fn run(&self, raw_data_url: &str, filename_hint: &str) -> CompressionOutcome {
        let start = Instant::now();

        debug!(stage = Stage::Decoding.as_str(), "Decoding data URL ({} chars)", raw_data_url.len());
        let image = codec::decode(raw_data_url)?;
        let original_size = image.bytes.len();

        let result = self.compress(image.bytes, &image.mime_type, filename_hint).await?;

        debug!(stage = Stage::Encoding.as_str(), "Encoding {} bytes", result.compressed_bytes.len());
        let data_url = codec::encode(&result.compressed_bytes, &image.mime_type);

        info!(
            "Compressed {} -> {} bytes (percent={:?}) in {}ms",
            original_size,
            result.compressed_bytes.len(),
            result.percent,
            start.elapsed().as_millis()
        );

        Ok(CompressedImage {
            data_url,
            percent: result.percent,
        })
    }

    /// Upload decoded bytes and download the compressed artifact
    pub async fn compress(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        filename: &str,
    ) -> CompressResult<CompressionResult> {
        let declared = upload_mime(mime_type, &bytes).to_string();
        if declared != mime_type {
            warn!("Data URL MIME type {:?} is not a valid media type, uploading as {}", mime_type, declared);
        }

        debug!(stage = Stage::Uploading.as_str(), "Uploading {} bytes", bytes.len());
        let ack = self.backend.upload(bytes, &declared, filename).await?;
        if let (Some(src), Some(dest)) = (&ack.src_size, &ack.dest_size) {
            debug!("Backend reports {} -> {} bytes", src, dest);
        }

        debug!(stage = Stage::Downloading.as_str(), "Fetching {}", ack.dest);
        let compressed_bytes = self.backend.fetch_compressed(&ack.dest).await?;

        Ok(CompressionResult {
            compressed_bytes,
            percent: ack.percent,
        })
    }
}
