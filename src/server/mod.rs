//! HTTP API exposing forward and reverse lookups over a shared resolver.

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use crate::config::Settings;
use crate::location::{PlaceCache, Resolver};

pub fn build_router(settings: &Settings, cache: PlaceCache) -> Router {
    let state = Arc::new(AppState {
        resolver: Mutex::new(Resolver::with_cache(settings, cache)),
    });

    Router::new()
        .route("/api/forward", get(handlers::forward))
        .route("/api/reverse", get(handlers::reverse))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(settings: &Settings, cache: PlaceCache, host: &str, port: u16) {
    let app = build_router(settings, cache);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  geostash server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    });
}
