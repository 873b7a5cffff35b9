// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preparation for vision prompts
//!
//! Uploaded images are normalized to a fixed-size JPEG and embedded as a
//! `data:` URL so they can be sent inline to a chat-completion API.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, ColorType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default width of the prepared image
pub const DEFAULT_RESIZE_WIDTH: u32 = 420;

/// Default height of the prepared image
pub const DEFAULT_RESIZE_HEIGHT: u32 = 280;

const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Custom error types for image preparation
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Error processing image: image data is empty")]
    EmptyData,

    #[error("Error processing image: failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error processing image: failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Error processing image: invalid target size {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("Error processing image: failed to encode JPEG: {0}")]
    EncodeFailed(String),

    #[error("Error processing image: not a base64 data URL")]
    InvalidDataUrl,

    #[error("Error processing image: invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Information about the source image, captured before resizing
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Format guessed from the magic bytes, if recognized
    pub format: Option<ImageFormat>,
    /// Color type of the decoded image
    pub color: ColorType,
    /// Size of the raw upload in bytes
    pub size_bytes: usize,
}

/// A resized JPEG ready to embed in a prompt
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// `data:image/jpeg;base64,...` URL
    pub data_url: String,
    /// Metadata of the image before preparation
    pub source: ImageInfo,
}

/// Read an image file and prepare it with [`prepare_image_bytes`]
pub fn prepare_image_file(
    path: &Path,
    width: u32,
    height: u32,
) -> Result<PreparedImage, ImageError> {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    prepare_image_bytes(&bytes, width, height)
}

/// Resize raw image bytes to exactly `width` x `height` and encode as a JPEG data URL
///
/// The aspect ratio is not preserved. Images carrying an alpha channel are
/// converted straight to RGB: the alpha samples are discarded, not blended
/// against a background.
pub fn prepare_image_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> Result<PreparedImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions(width, height));
    }

    let img =
        image::load_from_memory(bytes).map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let source = ImageInfo {
        width: img.width(),
        height: img.height(),
        format: image::guess_format(bytes).ok(),
        color: img.color(),
        size_bytes: bytes.len(),
    };

    let resized = to_jpeg_compatible(img).resize_exact(width, height, FilterType::CatmullRom);

    let mut buffer = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;

    Ok(PreparedImage {
        data_url: format!("{}{}", JPEG_DATA_URL_PREFIX, STANDARD.encode(&buffer)),
        source,
    })
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URL
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ImageError> {
    let rest = url.strip_prefix("data:").ok_or(ImageError::InvalidDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(ImageError::InvalidDataUrl)?;
    if !meta.ends_with(";base64") {
        return Err(ImageError::InvalidDataUrl);
    }
    Ok(STANDARD.decode(payload)?)
}

/// The JPEG encoder only takes 8-bit gray or RGB; everything else becomes RGB8.
fn to_jpeg_compatible(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}
