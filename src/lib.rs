//! Ecoleta: API de itens/pontos de coleta e o formulário de cadastro.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

#[cfg(test)]
mod testing;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::{AppState, Settings};

/// Rotas da API, sem as camadas de infraestrutura.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/items", get(handlers::items::list_items))
        .route(
            "/points",
            get(handlers::points::list_points).post(handlers::points::create_point),
        )
        .route("/points/{id}", get(handlers::points::get_point))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(docs::ApiDoc::openapi()) }),
        )
        .with_state(app_state)
}

/// CORS a partir de ALLOWED_ORIGINS; sem a variável, qualquer origem.
pub fn configure_cors(settings: &Settings) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    match &settings.allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors.allow_origin(origins)
        }
        None => cors.allow_origin(Any),
    }
}

/// App completo: rotas + /uploads estático + CORS + logs de requisição.
pub fn create_app(app_state: AppState, settings: &Settings) -> Router {
    routes(app_state)
        .nest_service("/uploads", ServeDir::new(&settings.uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors(settings))
}
