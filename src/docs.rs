// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Reportes ---
        handlers::api::list_reports,
        handlers::api::get_report,
    ),
    components(
        schemas(
            models::report::ReportSummary,
            models::report::ReportResult,

            // --- Filas ---
            models::report::VentasCategoria,
            models::report::ClienteVip,
            models::report::RankingProducto,
            models::report::AlertaStock,
            models::report::AnalisisStock,
            models::report::EficienciaOrden,
        )
    ),
    tags(
        (name = "Reportes", description = "Reportes de ventas, clientes e inventario")
    )
)]
pub struct ApiDoc;
