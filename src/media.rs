//! GET/HEAD/PUT handlers for media under the data prefix.
//!
//! The dispatch mirrors the routing contract of the dev server: GET and HEAD
//! serve files with byte-range support, PUT streams uploads into the media
//! root, and every other method falls through to the SPA fallback exactly
//! like a URL outside the prefix would.

use axum::Error as AxumError;
use axum::body::Body as AxumBody;
use axum::extract::{Extension, Path as UrlPath};
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures_util::stream::StreamExt;
use http_body_util::BodyExt;
use httpdate::fmt_http_date;
use std::io::SeekFrom;
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::config::ServeOptions;
use crate::error::ApiError;
use crate::frontend;
use crate::media_type;
use crate::range::ByteRange;
use crate::storage::{MediaRoot, StorageError};

/// Entry point for everything under the media prefix.
pub async fn media_handler(
    UrlPath(path): UrlPath<String>,
    Extension(root): Extension<Arc<MediaRoot>>,
    Extension(options): Extension<ServeOptions>,
    request: Request<AxumBody>,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();

    if parts.method == Method::PUT && !options.read_only {
        return write_media(&root, &path, body).await;
    }
    if parts.method == Method::GET || parts.method == Method::HEAD {
        return serve_media(&root, &path, &parts.headers, parts.method == Method::HEAD).await;
    }

    frontend::serve_frontend(Request::from_parts(parts, body)).await
}

/// Serves a file in full or as a single byte range.
async fn serve_media(
    root: &MediaRoot,
    path: &str,
    request_headers: &HeaderMap,
    head_only: bool,
) -> Result<Response, ApiError> {
    let target = root.resolve_checked(path, false).await?;
    let metadata = fs::metadata(&target).await.map_err(StorageError::from)?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound);
    }
    let size = metadata.len();

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(media_type::from_extension(&target)),
    );
    response_headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    if let Ok(modified) = metadata.modified()
        && let Ok(value) = HeaderValue::from_str(&fmt_http_date(modified))
    {
        response_headers.insert(header::LAST_MODIFIED, value);
    }

    let range = ByteRange::parse(
        request_headers
            .get(header::RANGE)
            .and_then(|value| value.to_str().ok()),
    )
    .resolve(size)
    .map_err(|_| ApiError::RangeNotSatisfiable(size))?;

    if let Some((start, end)) = range {
        let length = end - start + 1;
        debug!(path, start, end, length, "serving byte range");
        response_headers.insert(
            header::CONTENT_RANGE,
            HeaderValue::from_str(&format!("bytes {start}-{end}/{size}"))
                .map_err(|err| ApiError::Internal(err.to_string()))?,
        );
        response_headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        if head_only {
            return Ok((StatusCode::PARTIAL_CONTENT, response_headers).into_response());
        }
        let mut file = File::open(&target).await.map_err(StorageError::from)?;
        file.seek(SeekFrom::Start(start))
            .await
            .map_err(StorageError::from)?;
        let stream = ReaderStream::new(file.take(length));
        return Ok((
            StatusCode::PARTIAL_CONTENT,
            response_headers,
            AxumBody::from_stream(stream),
        )
            .into_response());
    }

    response_headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    if head_only {
        return Ok((StatusCode::OK, response_headers).into_response());
    }
    info!(path, size, "serving full file");
    let file = File::open(&target).await.map_err(StorageError::from)?;
    let stream = ReaderStream::new(file);
    Ok((
        StatusCode::OK,
        response_headers,
        AxumBody::from_stream(stream),
    )
        .into_response())
}

/// Streams an upload body to disk, creating parent directories as needed.
/// Uploads are not atomic: a failed stream leaves a truncated file behind.
async fn write_media(root: &MediaRoot, path: &str, body: AxumBody) -> Result<Response, ApiError> {
    let target = root.resolve_checked(path, true).await?;
    info!(path, "upload started");

    if let Some(parent) = target.parent()
        && let Err(err) = fs::create_dir_all(parent).await
    {
        warn!(path, error = %err, "parent directory creation failed");
        return Err(ApiError::Internal("Create folder failed".into()));
    }

    let mut file = match File::create(&target).await {
        Ok(file) => file,
        Err(err) => {
            warn!(path, error = %err, "opening upload target failed");
            return Err(ApiError::Internal("Write failed".into()));
        }
    };

    let write_result: Result<(), String> = async {
        let mut data_stream = BodyExt::into_data_stream(body);
        while let Some(chunk) = data_stream.next().await {
            let chunk = chunk.map_err(|err: AxumError| err.to_string())?;
            if !chunk.is_empty() {
                file.write_all(&chunk).await.map_err(|err| err.to_string())?;
            }
        }
        file.flush().await.map_err(|err| err.to_string())
    }
    .await;

    if let Err(err) = write_result {
        warn!(path, error = err, "upload stream failed");
        return Err(ApiError::Internal("Write failed".into()));
    }

    debug!(path, "upload complete");
    Ok((StatusCode::CREATED, "OK").into_response())
}
