//! Service layer module

pub mod compression_service;
pub mod types;

pub use compression_service::{CompressionService, UPLOAD_FILENAME};
pub use types::*;
