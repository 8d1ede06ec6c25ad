use poem::listener::TcpListener;
use sticker_engine::core::engine::StickerEngine;
use sticker_engine::settings::get_config;
use sticker_engine::{AppState, init_openapi_route, logging};

use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config()?;
    let _guard = logging::init(&config)?;

    tracing::info!("Initializing Sticker Service...");
    tracing::info!("run with config: {:?}", config);

    let engine = Arc::new(StickerEngine::new(&config));

    // Init App State
    let app_state = Arc::new(AppState { engine });

    let app = init_openapi_route(app_state.clone(), &config);
    tracing::info!("run server on {}:{}", config.host, config.port);
    poem::Server::new(TcpListener::bind(format!(
        "{}:{}",
        config.host, config.port
    )))
    .run(app)
    .await?;

    Ok(())
}
