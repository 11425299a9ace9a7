use std::sync::Arc;
use tokio::signal;
use tracing::info;

use game_core::WordList;
use game_server::{
    config::Config, create_routes, game_manager::GameManager, orchestrator::RoundOrchestrator,
    websocket::ConnectionManager,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Word Rooms server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Loading words from: {}", config.words_file);
    let words = match WordList::from_file(&config.words_file, config.word_length) {
        Ok(words) => {
            info!("Loaded {} words of length {}", words.len(), config.word_length);
            words
        }
        Err(e) => {
            tracing::error!("Failed to load word list '{}': {:#}", config.words_file, e);
            tracing::error!("Set WORDS_FILE to a file with one word per line.");
            std::process::exit(1);
        }
    };

    // Initialize application state
    let connection_manager = Arc::new(ConnectionManager::new());
    let game_manager = Arc::new(GameManager::new(Arc::new(words)));
    let orchestrator = Arc::new(RoundOrchestrator::new(
        game_manager.clone(),
        connection_manager.clone(),
        config.timings,
    ));

    let routes = create_routes(connection_manager, game_manager, orchestrator);

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let (Ok(mut sigint), Ok(mut sigterm)) = (
                signal::unix::signal(signal::unix::SignalKind::interrupt()),
                signal::unix::signal(signal::unix::SignalKind::terminate()),
            ) else {
                tracing::error!("Failed to install signal handlers, waiting for Ctrl+C");
                let _ = signal::ctrl_c().await;
                return;
            };

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, shutting down gracefully...");
            }
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
