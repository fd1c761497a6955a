use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use quick_translate::{config::Config, logging, routes, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::discover()?;

    logging::init_tracing(&format!(
        "quick_translate={level},tower_http={level}",
        level = config.server.log_level
    ));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    let state = AppState::new(config)?;
    info!(
        "Translation engine: {}, max text length: {}",
        state.translator.name(),
        state.config.translation.max_text_length
    );

    let app = routes::build_app(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
