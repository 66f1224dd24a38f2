mod card;
mod config;
mod errors;
mod feed;
mod layout;
mod markup;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::feed::HttpBulletSource;
use crate::layout::default_layout_config;
use crate::render::{SvgCompositor, Theme};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting badge v{}", env!("CARGO_PKG_VERSION"));

    // Feed source (no retries; the hosting request lifecycle bounds total time)
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let source = Arc::new(HttpBulletSource::new(http, config.bullet_src.clone()));
    info!(url = %config.bullet_src, "Feed source configured");

    // Layout constants and markup dialect
    let layout = default_layout_config();
    let grammar = config.markup_grammar.build();
    info!(
        grammar = grammar.name(),
        width = layout.canvas.width,
        height = layout.canvas.height,
        min_font = layout.font_range.min(),
        max_font = layout.font_range.max(),
        "Layout engine configured"
    );

    // Rasterizer (system fonts are loaded once here)
    let compositor = Arc::new(SvgCompositor::new(layout.char_width_factor));

    // Build app state
    let state = AppState {
        source,
        grammar,
        compositor,
        layout,
        theme: Theme::default(),
        emphasis: config.emphasis,
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
