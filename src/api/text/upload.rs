// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-request staging of uploaded images
//!
//! An upload is written to `temp_<token>_<file name>` in the staging
//! directory, where `<token>` is unique per request. The file is removed when
//! the [`StagedUpload`] is dropped.

use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use uuid::Uuid;

/// Name used when the client sends no usable file name
const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// An upload staged on disk for the lifetime of this value
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Write `bytes` to a fresh staging file in `dir`
    pub fn create(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<Self, StagingError> {
        let prefix = format!("temp_{}_", Uuid::new_v4().simple());
        let suffix = sanitize_file_name(file_name);

        let mut file = Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .rand_bytes(0)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self { file })
    }

    /// Path of the staged file
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Reduce a client-supplied file name to a safe single path component
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}
