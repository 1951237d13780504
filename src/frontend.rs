//! Embedded SPA shell and asset fallback.

use axum::body::Body as AxumBody;
use axum::http::{HeaderMap, HeaderValue, Request, header};
use axum::response::{IntoResponse, Response};
use rust_embed::RustEmbed;
use std::path::Path;

use crate::error::ApiError;
use crate::media_type;

/// Built frontend assets, embedded at compile time.
#[derive(RustEmbed)]
#[folder = "frontend/dist"]
pub struct FrontendAssets;

/// Fallback handler: serves the asset at the request path, or the app shell
/// for history-mode routes (paths without an extension).
pub async fn serve_frontend(req: Request<AxumBody>) -> Result<Response, ApiError> {
    let path = req.uri().path().trim_start_matches('/');
    let requested = if path.is_empty() { "index.html" } else { path };
    if let Some(response) = load_embedded_asset(requested) {
        return Ok(response);
    }

    if !requested.contains('.')
        && let Some(response) = load_embedded_asset("index.html")
    {
        return Ok(response);
    }

    Err(ApiError::NotFound)
}

fn load_embedded_asset(path: &str) -> Option<Response> {
    let asset = FrontendAssets::get(path)?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(asset_content_type(path)),
    );
    Some((headers, AxumBody::from(asset.data.into_owned())).into_response())
}

/// Shell assets are build artifacts, so a short fixed table is enough.
fn asset_content_type(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => media_type::OCTET_STREAM,
    }
}
