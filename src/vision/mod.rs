// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for text extraction
//!
//! This module provides:
//! - Image preparation (resize + JPEG data URL)
//! - A client for the hosted vision-language model that reads the text

pub mod image_utils;
pub mod vlm_client;

pub use image_utils::{
    decode_data_url, prepare_image_bytes, prepare_image_file, ImageError, ImageInfo,
    PreparedImage, DEFAULT_RESIZE_HEIGHT, DEFAULT_RESIZE_WIDTH,
};
pub use vlm_client::{TextExtractor, VlmClient, VlmError, VlmOcrResult, OCR_MAX_TOKENS, OCR_MODEL};
