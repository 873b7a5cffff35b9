// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Startup configuration
//!
//! Every flag falls back to an environment variable, so the service can be
//! configured entirely through the environment (or a `.env` file).

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::vision::{DEFAULT_RESIZE_HEIGHT, DEFAULT_RESIZE_WIDTH};

/// Default body-size cap for uploads (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default inference provider base URL
pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://router.huggingface.co";

/// Image text extraction service
#[derive(Parser, Debug, Clone)]
#[command(name = "image-text-service")]
#[command(about = "HTTP backend that reads the text inside uploaded images", long_about = None)]
pub struct ServiceConfig {
    /// Credential for the inference provider
    #[arg(long, env = "HF_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:5000")]
    pub listen_addr: SocketAddr,

    /// Base URL of the OpenAI-compatible inference provider
    #[arg(long, env = "INFERENCE_ENDPOINT", default_value = DEFAULT_INFERENCE_ENDPOINT)]
    pub inference_endpoint: String,

    /// Width the uploaded image is stretched to
    #[arg(long, env = "RESIZE_WIDTH", default_value_t = DEFAULT_RESIZE_WIDTH)]
    pub resize_width: u32,

    /// Height the uploaded image is stretched to
    #[arg(long, env = "RESIZE_HEIGHT", default_value_t = DEFAULT_RESIZE_HEIGHT)]
    pub resize_height: u32,

    /// Directory uploads are staged in (defaults to the OS temp dir)
    #[arg(long, env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServiceConfig {
    /// Directory uploads are staged in
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
