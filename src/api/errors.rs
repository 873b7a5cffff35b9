// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::text::StagingError;
use crate::vision::{ImageError, VlmError};

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request carried no `image` part
    MissingImage,
    /// The provider answered but without any usable content
    EmptyResponse,
    /// Anything else that went wrong while handling the upload
    Processing(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage => StatusCode::BAD_REQUEST,
            ApiError::EmptyResponse | ApiError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingImage => write!(f, "No image file provided"),
            ApiError::EmptyResponse => write!(f, "No valid content received in response"),
            ApiError::Processing(msg) => write!(f, "An error occurred: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl From<VlmError> for ApiError {
    fn from(err: VlmError) -> Self {
        match err {
            VlmError::EmptyResponse => {
                warn!("Inference provider returned no choices");
                ApiError::EmptyResponse
            }
            other => {
                warn!("Inference call failed: {}", other);
                ApiError::Processing(other.to_string())
            }
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        warn!("Image preparation failed: {}", err);
        ApiError::Processing(err.to_string())
    }
}

impl From<StagingError> for ApiError {
    fn from(err: StagingError) -> Self {
        warn!("Upload staging failed: {}", err);
        ApiError::Processing(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        warn!("Failed to read multipart body: {}", err);
        ApiError::Processing(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Processing(err.to_string())
    }
}
