//! API routes for the upload server

pub mod upload;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Bodies are read raw; size limits are enforced by the collector and decoder
        .route("/upload", post(upload::upload_files))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "upload-extract",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document upload with plain-text extraction",
        "endpoints": {
            "POST /api/upload": "Upload files and receive their extracted text",
            "GET /api/info": "Service information",
            "GET /health": "Liveness check"
        },
        "upload": {
            "field_name": config.upload.field_name,
            "max_upload_size": config.server.max_upload_size,
            "supported_types": state.pipeline().dispatcher().supported_types()
        }
    }))
}
