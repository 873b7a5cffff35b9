// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the image text service

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "jpeg-data-url",
    "hosted-vlm-ocr",
    "per-request-staging",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Image Text Service {}", VERSION_NUMBER)
}
