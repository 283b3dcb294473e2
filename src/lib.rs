//! Image Compressor Library
//!
//! Decodes base64 data URLs, sends the image to a remote compression
//! backend and returns the compressed result as a data URL.

pub mod api;
pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod service;
pub mod utils;

pub use config::Config;
pub use error::{CompressError, CompressResult};
