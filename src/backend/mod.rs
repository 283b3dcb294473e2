//! Compression backend clients
//!
//! The remote service does the actual compression; this module only speaks
//! its upload/download contract.

pub mod traits;
pub mod resmush;

pub use traits::{CompressionBackend, UploadAck};
pub use resmush::ResmushClient;
