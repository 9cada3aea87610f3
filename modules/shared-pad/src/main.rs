//! Shared Pad Service: one markdown scratch pad per chat, over HTTP.
//!
//! Storage is picked at startup (memory, local files, or the remote blob
//! store) and responses can optionally carry a frontmatter block.
//!
//! Default: http://0.0.0.0:8000/

mod config;
mod frontmatter;
mod routes;
mod service;
mod store;

use config::Config;
use routes::AppState;
use service::PadService;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match store::build_store(&config.backend) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to initialise {:?} pad store: {}", config.backend, e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Pad backend: {} (default pad at {}), frontmatter {}",
        store.backend_name(),
        store.location(&store::PadKey::default()),
        if config.frontmatter { "on" } else { "off" }
    );

    let state = Arc::new(AppState {
        pads: PadService::new(store, config.frontmatter),
    });
    let app = routes::router(state);

    let addr = config.listen_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    log::info!("Shared Pad Service listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
