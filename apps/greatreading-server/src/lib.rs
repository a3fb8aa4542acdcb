//! GreatReading Server Library
//!
//! Distraction-free reading of uploaded PDFs with a countdown timer, page and
//! sentence navigation, and a personal dictionary.
//!
//! # Modules
//!
//! - `reader`: reading-view core (timer, navigator, dictionary, session)
//! - `extract`: PDF page text extraction
//! - `definitions`: dictionary API lookups with an LRU cache
//! - `db`, `routes`, `state`: the persistence backend
//! - `client`: HTTP client for the backend

pub mod client;
pub mod config;
pub mod db;
pub mod definitions;
pub mod error;
pub mod extract;
pub mod reader;
pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use state::AppState;

/// Multipart framing allowance on top of the largest accepted file
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let body_limit = state.config().upload.max_size + MULTIPART_OVERHEAD;
    let cors = cors_layer(state.config());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/books", routes::books::router())
        .nest("/api/v1/dictionary", routes::dictionary::router())
        .nest("/api/v1/definitions", routes::definitions::router())
        .nest("/api/v1/settings", routes::settings::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS restricted to the configured origins
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
