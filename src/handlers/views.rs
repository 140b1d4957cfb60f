// src/handlers/views.rs

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        params::RequestParams,
        report::{AnalisisStock, ClienteVip, EficienciaOrden, PageEnvelope, RankingProducto, VentasCategoria},
    },
    pages,
    services::registry::{self, ReportKind},
};

// Erro das rotas HTML: mesmo AppError, mas respondido como página
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.0.log();
        let status = self.0.status();
        let html = pages::error_page(status, &self.0.public_message());
        (status, Html(html)).into_response()
    }
}

// GET /
pub async fn index() -> Html<String> {
    Html(pages::index_page(registry::all()))
}

// GET /reports/{id}
pub async fn report_page(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Html<String>, PageError> {
    let report = registry::lookup(&id)?;
    let params = RequestParams::from_raw(&raw);
    let service = &app_state.report_service;

    let body = match report.kind {
        ReportKind::VentasPorCategoria => {
            let rows: Vec<VentasCategoria> = service.list(report, &params).await?;
            pages::reports::ventas_por_categoria(&rows, params.numeric_query())
        }
        ReportKind::ClientesVip => {
            let envelope: PageEnvelope<ClienteVip> = service.page(report, &params).await?;
            pages::reports::clientes_vip(&envelope)
        }
        ReportKind::RankingProductos => {
            let rows: Vec<RankingProducto> = service.list(report, &params).await?;
            let categories = service.categories().await?;
            pages::reports::ranking_productos(&rows, &categories, params.text_query())
        }
        ReportKind::AnalisisStock => {
            let envelope: PageEnvelope<AnalisisStock> = service.page(report, &params).await?;
            pages::reports::analisis_stock(&envelope)
        }
        ReportKind::EficienciaOrdenes => {
            let rows: Vec<EficienciaOrden> = service.list(report, &params).await?;
            pages::reports::eficiencia_ordenes(&rows)
        }
    };

    Ok(Html(pages::layout(report.name, &body)))
}

// Qualquer rota desconhecida
pub async fn not_found() -> PageError {
    PageError(AppError::ReportNotFound("rota".to_string()))
}
