// src/handlers/api.rs

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        params::RequestParams,
        report::{ReportResult, ReportSummary},
    },
    services::registry,
};

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reportes",
    responses(
        (status = 200, description = "Reportes disponibles", body = Vec<ReportSummary>)
    )
)]
pub async fn list_reports() -> impl IntoResponse {
    (StatusCode::OK, Json(registry::summaries()))
}

// GET /api/reports/{id}
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    tag = "Reportes",
    params(
        ("id" = u8, Path, description = "Identificador del reporte (1-5)"),
        ("query" = Option<String>, Query, description = "Filtro: ingreso mínimo (1) o categoría (3)"),
        ("page" = Option<u32>, Query, description = "Página (reportes 2 y 4)")
    ),
    responses(
        (status = 200, description = "Filas validadas del reporte", body = ReportResult),
        (status = 404, description = "Reporte inexistente"),
        (status = 500, description = "Error de datos o de la base")
    )
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let report = registry::lookup(&id)?;
    let params = RequestParams::from_raw(&raw);

    let result = app_state.report_service.run(report, &params).await?;

    Ok((StatusCode::OK, Json(result)))
}
