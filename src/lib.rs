// src/lib.rs

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod tree;
pub mod views;

use config::Config;
use db::Stores;

#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<Stores>,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        Self { stores: Arc::new(stores) }
    }
}

pub fn app(config: &Config) -> Router {
    let state = AppState::new(config.stores());

    // Read-only public charts, any origin may fetch
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        // trees
        .route("/tree", get(routes::tree::all_bins))
        .route("/tree/bin/:n", get(routes::tree::similar_bins))
        .route("/tree/bin/entities/:n", get(routes::tree::bin_entities))
        .route("/tree/feature/:n", get(routes::tree::bin_features))
        .route("/tree/entityfeatures", get(routes::tree::entity_features))
        .route("/tree/bin/", get(routes::tree::missing_id))
        .route("/tree/bin/entities/", get(routes::tree::missing_id))
        .route("/tree/feature/", get(routes::tree::missing_id))
        // flat data
        .route("/data", get(routes::data::events))
        .route("/dataRaw", get(routes::data::raw_csv))
        // pages
        .merge(routes::pages::router(&config.template_dir, &config.static_dir))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
