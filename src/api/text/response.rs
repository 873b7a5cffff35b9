// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction response types

use serde::{Deserialize, Serialize};

/// Successful response from POST /text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextResponse {
    /// Text the model read from the image, verbatim (`null` if the model
    /// returned no content)
    pub text: Option<String>,
}
