//! REST API request/response data transfer objects

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Caller fields carried through to the response untouched.
///
/// `None` means the field was absent; an explicit `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompressionRequestMeta {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub ext: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub size: Option<Value>,
}

/// Any value that is present, `null` included
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Compress request (JSON body)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressRequest {
    #[serde(flatten)]
    pub meta: CompressionRequestMeta,
    /// Kept loose so a non-string value is reported as a malformed data URL
    pub data_url: Option<Value>,
}

impl CompressRequest {
    pub fn data_url(&self) -> Option<&str> {
        self.data_url.as_ref().and_then(Value::as_str)
    }
}

/// Compress response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<Number>,
    pub data_url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Reply to methods other than POST and OPTIONS
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
        }
    }
}
