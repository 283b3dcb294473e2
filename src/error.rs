//! Compression pipeline errors

use thiserror::Error;

/// Pipeline stage a request is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decoding,
    Uploading,
    Downloading,
    Encoding,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Decoding => "decoding",
            Stage::Uploading => "uploading",
            Stage::Downloading => "downloading",
            Stage::Encoding => "encoding",
        }
    }
}

/// Every way a single compression request can fail.
///
/// The `Display` text is what the client sees in the `error` field of a
/// 500 response.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("Invalid data URL format")]
    MalformedDataUrl,

    #[error("Data URL is not base64-encoded")]
    UnsupportedEncoding,

    #[error("Invalid base64 payload: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Failed to compress image: {0}")]
    UploadFailed(String),

    #[error("Failed to download compressed image: {0}")]
    DownloadFailed(String),
}

impl CompressError {
    /// Stable machine-readable code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            CompressError::MalformedDataUrl => "MALFORMED_DATA_URL",
            CompressError::UnsupportedEncoding => "UNSUPPORTED_ENCODING",
            CompressError::Base64Decode(_) => "BASE64_DECODE_ERROR",
            CompressError::UploadFailed(_) => "UPLOAD_FAILED",
            CompressError::DownloadFailed(_) => "DOWNLOAD_FAILED",
        }
    }

    /// Stage that raised this error
    pub fn stage(&self) -> Stage {
        match self {
            CompressError::MalformedDataUrl
            | CompressError::UnsupportedEncoding
            | CompressError::Base64Decode(_) => Stage::Decoding,
            CompressError::UploadFailed(_) => Stage::Uploading,
            CompressError::DownloadFailed(_) => Stage::Downloading,
        }
    }
}

pub type CompressResult<T> = Result<T, CompressError>;
