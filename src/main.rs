// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use image_text_service::{api::start_server, config::ServiceConfig, version};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up HF_API_KEY and friends from a local .env if present
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::parse();
    tracing::info!("Starting {}", version::get_version_string());

    start_server(config).await
}
