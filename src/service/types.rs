//! Service layer types

use serde_json::Number;

use crate::error::CompressError;

/// Bytes returned by the backend and the percentage it reported
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub compressed_bytes: Vec<u8>,
    pub percent: Option<Number>,
}

/// Successful pipeline output
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    /// `data:<mime>;base64,...` of the compressed bytes
    pub data_url: String,
    pub percent: Option<Number>,
}

/// Result of one compression run. No partial state escapes a failed run.
pub type CompressionOutcome = Result<CompressedImage, CompressError>;
