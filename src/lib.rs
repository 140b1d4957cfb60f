// src/lib.rs

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

// Monta o router completo; o main só cuida do listener
pub fn build_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/reports", get(handlers::api::list_reports))
        .route("/reports/{id}", get(handlers::api::get_report));

    Router::new()
        .route("/", get(handlers::views::index))
        .route("/reports/{id}", get(handlers::views::report_page))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::views::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
