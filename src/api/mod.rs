// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod text;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, ImageSettings, HOME_MESSAGE};
pub use text::{text_handler, TextResponse};
