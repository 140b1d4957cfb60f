// src/services/registry.rs

// Os cinco relatórios do sistema. Fixos: não há registro dinâmico.

use crate::{
    common::error::AppError,
    db::report_query::{FilterKind, FilterOp, FilterSpec, QuerySpec, SortDirection, SortKey},
    models::report::ReportSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    VentasPorCategoria,
    ClientesVip,
    RankingProductos,
    AnalisisStock,
    EficienciaOrdenes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDefinition {
    pub id: u8,
    pub kind: ReportKind,
    pub name: &'static str,
    pub description: &'static str,
    pub query: QuerySpec,
    /// Mensagem devolvida quando a view não bate com o esquema.
    pub integrity_message: &'static str,
}

impl ReportDefinition {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            id: self.id,
            name: self.name.to_string(),
            view: self.query.source.to_string(),
            description: self.description.to_string(),
        }
    }
}

pub const ALL_CATEGORIES: &str = "Todas";

pub static REPORTS: [ReportDefinition; 5] = [
    ReportDefinition {
        id: 1,
        kind: ReportKind::VentasPorCategoria,
        name: "Ventas por Categoría",
        description: "Filtro por Ingresos Mínimos",
        query: QuerySpec {
            source: "view_ventas_por_categoria",
            filter: Some(FilterSpec {
                column: "ingresos_totales",
                op: FilterOp::Gte,
                kind: FilterKind::Numeric,
            }),
            sort: &[SortKey {
                column: "ingresos_totales",
                direction: SortDirection::Desc,
            }],
            paginated: false,
        },
        integrity_message: "Error de datos en Reporte de Ventas.",
    },
    ReportDefinition {
        id: 2,
        kind: ReportKind::ClientesVip,
        name: "Clientes VIP",
        description: "Paginado Server-Side",
        query: QuerySpec {
            source: "view_clientes_vip",
            filter: None,
            sort: &[SortKey {
                column: "inversion_total",
                direction: SortDirection::Desc,
            }],
            paginated: true,
        },
        integrity_message: "Error de datos en Reporte Clientes VIP.",
    },
    ReportDefinition {
        id: 3,
        kind: ReportKind::RankingProductos,
        name: "Top Productos",
        description: "Filtro por Categoría",
        query: QuerySpec {
            source: "view_ranking_productos",
            filter: Some(FilterSpec {
                column: "categoria",
                op: FilterOp::Eq,
                kind: FilterKind::Text {
                    match_all: &[ALL_CATEGORIES],
                },
            }),
            sort: &[
                SortKey {
                    column: "categoria",
                    direction: SortDirection::Asc,
                },
                SortKey {
                    column: "ranking_en_categoria",
                    direction: SortDirection::Asc,
                },
            ],
            paginated: false,
        },
        integrity_message: "Error de datos en Ranking Productos.",
    },
    ReportDefinition {
        id: 4,
        kind: ReportKind::AnalisisStock,
        name: "Alertas de Stock",
        description: "Paginado Server-Side",
        query: QuerySpec {
            source: "view_analisis_stock",
            filter: None,
            sort: &[SortKey {
                column: "stock",
                direction: SortDirection::Asc,
            }],
            paginated: true,
        },
        integrity_message: "Error de datos en Análisis Stock.",
    },
    ReportDefinition {
        id: 5,
        kind: ReportKind::EficienciaOrdenes,
        name: "Eficiencia de Órdenes",
        description: "Resumen de Estados",
        query: QuerySpec {
            source: "view_eficiencia_ordenes",
            filter: None,
            sort: &[],
            paginated: false,
        },
        integrity_message: "Error de datos en Eficiencia Órdenes.",
    },
];

// Opções do <select> do relatório 3
pub static CATEGORY_OPTIONS: QuerySpec = QuerySpec {
    source: "categorias",
    filter: None,
    sort: &[SortKey {
        column: "nombre",
        direction: SortDirection::Asc,
    }],
    paginated: false,
};

pub const CATEGORY_INTEGRITY_MESSAGE: &str = "Error de datos en Categorías.";

pub fn all() -> &'static [ReportDefinition] {
    &REPORTS
}

pub fn find(id: u8) -> Option<&'static ReportDefinition> {
    REPORTS.iter().find(|report| report.id == id)
}

/// Resolve o id vindo da rota; qualquer coisa fora de 1..=5 é 404.
pub fn lookup(raw_id: &str) -> Result<&'static ReportDefinition, AppError> {
    raw_id
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(find)
        .ok_or_else(|| AppError::ReportNotFound(raw_id.to_string()))
}

pub fn summaries() -> Vec<ReportSummary> {
    REPORTS.iter().map(ReportDefinition::summary).collect()
}
