//! Compression backend abstraction
//!
//! Defines the two calls needed to compress one image.
//! Implementations can be swapped between the HTTP client and test doubles.

use async_trait::async_trait;
use serde_json::Number;

use crate::error::CompressResult;

/// Backend reply to an upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadAck {
    /// URL of the compressed artifact
    pub dest: String,
    /// Size reduction as reported by the backend, passed through untouched
    pub percent: Option<Number>,
    /// Sizes reported by the backend, informational only
    pub src_size: Option<Number>,
    pub dest_size: Option<Number>,
}

/// Compression backend trait
/// Implementations must be stateless and safe to share between concurrent requests
#[async_trait]
pub trait CompressionBackend: Send + Sync + 'static {
    /// Upload image bytes for compression
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, filename: &str) -> CompressResult<UploadAck>;

    /// Download the compressed artifact at `dest`
    async fn fetch_compressed(&self, dest: &str) -> CompressResult<Vec<u8>>;
}
