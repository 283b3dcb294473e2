//! Data URL codec
//!
//! Pure conversions between `data:` URLs and raw image bytes. No I/O.

pub mod data_url;

pub use data_url::{decode, encode, DataUrl, ImageBytes};
