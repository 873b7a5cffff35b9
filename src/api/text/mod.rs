// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction API endpoint module
//!
//! Provides POST /text for reading the text inside an uploaded image.

pub mod handler;
pub mod response;
pub mod upload;

pub use handler::text_handler;
pub use response::TextResponse;
pub use upload::{sanitize_file_name, StagedUpload, StagingError};
