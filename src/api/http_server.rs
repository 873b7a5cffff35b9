// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{convert::Infallible, path::PathBuf, sync::Arc};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::text::text_handler;
use crate::config::{ServiceConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::vision::{TextExtractor, VlmClient, DEFAULT_RESIZE_HEIGHT, DEFAULT_RESIZE_WIDTH};

/// Body of `GET /`
pub const HOME_MESSAGE: &str = "Hello! The backend server is running.";

/// Target size of prepared images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_RESIZE_WIDTH,
            height: DEFAULT_RESIZE_HEIGHT,
        }
    }
}

/// State shared by every request handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn TextExtractor>,
    pub image_settings: ImageSettings,
    pub staging_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(extractor: Arc<dyn TextExtractor>, config: &ServiceConfig) -> Self {
        Self {
            extractor,
            image_settings: ImageSettings {
                width: config.resize_width,
                height: config.resize_height,
            },
            staging_dir: config.staging_dir(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// State with default image settings and upload limit
    pub fn with_defaults(extractor: Arc<dyn TextExtractor>, staging_dir: PathBuf) -> Self {
        Self {
            extractor,
            image_settings: ImageSettings::default(),
            staging_dir,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(home_handler))
        .route(
            "/text",
            post(text_handler)
                .layer::<_, Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_upload_bytes)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the inference client from `config`, bind, and serve until Ctrl+C
pub async fn start_server(config: ServiceConfig) -> Result<()> {
    let client = VlmClient::new(&config.inference_endpoint, &config.api_key)?;
    let state = AppState::new(Arc::new(client), &config);
    tracing::info!(
        "Staging uploads in {}, resizing to {}x{}",
        state.staging_dir.display(),
        state.image_settings.width,
        state.image_settings.height
    );

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn home_handler() -> &'static str {
    HOME_MESSAGE
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
