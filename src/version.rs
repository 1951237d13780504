//! Health and version endpoint for dev tooling.

use axum::response::Json as JsonResponse;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    name: &'static str,
    version: &'static str,
}

/// Reports liveness plus the crate version.
pub async fn health() -> JsonResponse<HealthInfo> {
    JsonResponse(HealthInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
