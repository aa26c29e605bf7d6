use std::sync::Arc;

use yacht::context::SharedContext;
use yacht::env_config::{init_logging, server_port, table_path};
use yacht::server::create_router;

#[tokio::main]
async fn main() {
    init_logging();
    log::info!("starting yacht API server...");

    let shared = Arc::new(SharedContext::new(table_path()));
    // Refuse to serve until the table has loaded and validated
    if let Err(e) = shared.get().await {
        log::error!("cannot start: {}", e);
        std::process::exit(1);
    }

    let app = create_router(shared);

    let port = server_port();
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };
    log::info!("server is running on port {}. Press Ctrl+C to stop.", port);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("server error: {}", e);
        std::process::exit(1);
    }

    log::info!("stopping server...");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
}
