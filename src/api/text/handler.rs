// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use bytes::Bytes;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use super::response::TextResponse;
use super::upload::StagedUpload;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::prepare_image_file;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// An image file pulled out of the multipart body
struct ImageUpload {
    file_name: String,
    bytes: Bytes,
}

/// POST /text - Extract the text inside an uploaded image
///
/// # Request
/// `multipart/form-data` with a file field named `image`.
///
/// # Response
/// - 200 `{"text": "..."}`
/// - 400 `{"error": "No image file provided"}`
/// - 500 `{"error": "No valid content received in response"}`
/// - 500 `{"error": "An error occurred: ..."}`
pub async fn text_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    extract_text(state, multipart)
        .instrument(info_span!("extract_text", %request_id))
        .await
}

async fn extract_text(
    state: AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Request is not a multipart form: {}", e);
        ApiError::MissingImage
    })?;

    let upload = read_image_field(&mut multipart).await?.ok_or_else(|| {
        debug!("No '{}' field in multipart form", IMAGE_FIELD);
        ApiError::MissingImage
    })?;

    debug!(
        "Received upload '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    // Staging, decoding and encoding are blocking work. The staged file is
    // dropped (and deleted) when the closure returns, on every path.
    let settings = state.image_settings;
    let staging_dir = state.staging_dir.clone();
    let prepared = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let staged = StagedUpload::create(&staging_dir, &upload.file_name, &upload.bytes)?;
        Ok(prepare_image_file(
            staged.path(),
            settings.width,
            settings.height,
        )?)
    })
    .await??;

    debug!(
        "Prepared {}x{} {:?} image as {} byte data URL",
        prepared.source.width,
        prepared.source.height,
        prepared.source.color,
        prepared.data_url.len()
    );

    let result = state.extractor.extract_text(&prepared.data_url).await?;

    info!(
        "Text extraction complete: {} chars, {}ms, {} tokens (model: {})",
        result.text.as_deref().map_or(0, str::len),
        result.processing_time_ms,
        result.tokens_used,
        result.model
    );

    Ok(Json(TextResponse { text: result.text }))
}

/// Find the `image` file part, skipping any others
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<ImageUpload>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        // A part without a filename is a plain form value, not a file
        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!("Ignoring '{}' part without a filename", IMAGE_FIELD);
            continue;
        };
        let bytes = field.bytes().await?;
        return Ok(Some(ImageUpload { file_name, bytes }));
    }
    Ok(None)
}
