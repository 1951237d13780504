//! Router assembly, shared by the binary and the integration tests.

use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension, connect_info::ConnectInfo};
use axum::http::Request;
use axum::routing::{any, get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info_span};

use crate::config::ServeOptions;
use crate::storage::MediaRoot;
use crate::{frontend, media, version};

/// Builds the application router: media routes under the configured prefix,
/// a health endpoint, and the SPA fallback for everything else.
pub fn build_router(root: Arc<MediaRoot>, prefix: &str, options: ServeOptions) -> Router {
    let prefix = normalize_prefix(prefix);

    Router::new()
        .route(
            &format!("{prefix}/{{*path}}"),
            // Media uploads exceed the framework's default body limit.
            any(media::media_handler).layer(DefaultBodyLimit::disable()),
        )
        .route("/healthz", get(version::health))
        .fallback(frontend::serve_frontend)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let client_ip = request
                        .extensions()
                        .get::<ConnectInfo<SocketAddr>>()
                        .map(|ConnectInfo(addr)| addr.to_string())
                        .unwrap_or_else(|| "unknown".to_string());

                    info_span!(
                        env!("CARGO_CRATE_NAME"),
                        client_ip,
                        method = ?request.method(),
                        path = ?request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(Extension(root))
        .layer(Extension(options))
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
