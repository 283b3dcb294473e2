//! Axum REST API handlers

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
    },
    response::Json,
    routing::{post, MethodRouter},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

use crate::backend::CompressionBackend;
use crate::error::CompressError;
use crate::service::{CompressionService, UPLOAD_FILENAME};

use super::dto::*;

/// Header carrying the caller's key; read, never validated
pub const API_KEY_HEADER: &str = "api-key";

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, api-key";

/// Application state shared across handlers
pub struct AppState<B: CompressionBackend> {
    pub service: Arc<CompressionService<B>>,
}

/// Create the REST API router.
///
/// Every path answers the same way: POST compresses, OPTIONS is a preflight,
/// anything else is rejected with 400.
pub fn create_rest_router<B: CompressionBackend>(state: Arc<AppState<B>>, max_body_bytes: usize) -> Router {
    let methods: MethodRouter<Arc<AppState<B>>> = post(compress_handler::<B>)
        .options(preflight_handler)
        .fallback(not_generated_handler);

    Router::new()
        .route("/", methods.clone())
        .route("/*path", methods)
        // Middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors_header(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .layer(cors_header(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .layer(cors_header(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fixed CORS header stamped on every response, including errors and preflights
fn cors_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// Map a pipeline failure to the uniform 500 reply
fn failure(e: &CompressError) -> (StatusCode, Json<ErrorResponse>) {
    error!(code = e.code(), stage = e.stage().as_str(), "Compression failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(&e.to_string())))
}

/// Compress the image carried in the request body
async fn compress_handler<B: CompressionBackend>(
    State(state): State<Arc<AppState<B>>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CompressResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();

    // Oversized or unreadable bodies still get the JSON error shape
    let body = body.map_err(|e| {
        error!(%request_id, "Failed to read request body: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Invalid request body: {}", e.body_text()))),
        )
    })?;

    compress(&state, &headers, &body)
        .instrument(info_span!("compress", %request_id))
        .await
}

async fn compress<B: CompressionBackend>(
    state: &AppState<B>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Json<CompressResponse>, (StatusCode, Json<ErrorResponse>)> {
    debug!("api-key present: {}", headers.contains_key(API_KEY_HEADER));

    let request: CompressRequest = serde_json::from_slice(body).map_err(|e| {
        error!("Invalid request body: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Invalid request body: {}", e))),
        )
    })?;

    debug!(
        "Compress request: name={:?} ext={:?} size={:?}",
        request.meta.name, request.meta.ext, request.meta.size
    );

    let data_url = request.data_url().ok_or_else(|| failure(&CompressError::MalformedDataUrl))?;
    let compressed = state.service.run(data_url, UPLOAD_FILENAME).await.map_err(|e| failure(&e))?;

    let meta = request.meta;
    Ok(Json(CompressResponse {
        id: meta.id,
        name: meta.name,
        ext: meta.ext,
        percent: compressed.percent,
        data_url: compressed.data_url,
    }))
}

/// CORS preflight
async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any method other than POST or OPTIONS
async fn not_generated_handler() -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new("html not generated")))
}
