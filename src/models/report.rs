// src/models/report.rs

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::common::coerce::{de_decimal, de_integer};

// Uma linha de view. Além do formato (serde), cada tipo pode impor
// regras extras (e-mail válido etc.).
pub trait ReportRow: DeserializeOwned + Send {
    fn check(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

// 1. view_ventas_por_categoria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VentasCategoria {
    pub categoria: String,
    #[serde(deserialize_with = "de_integer")]
    pub total_ventas_unidades: i64,
    #[serde(deserialize_with = "de_decimal")]
    pub ingresos_totales: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub precio_promedio_producto: Decimal,
}

impl ReportRow for VentasCategoria {}

// 2. view_clientes_vip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClienteVip {
    pub cliente: String,
    #[validate(email)]
    pub email: String,
    #[serde(deserialize_with = "de_decimal")]
    pub inversion_total: Decimal,
    #[serde(deserialize_with = "de_integer")]
    pub total_pedidos: i64,
}

impl ReportRow for ClienteVip {
    fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }
}

// 3. view_ranking_productos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankingProducto {
    pub categoria: String,
    pub producto: String,
    #[serde(deserialize_with = "de_integer")]
    pub unidades: i64,
    #[serde(deserialize_with = "de_integer")]
    pub ranking_en_categoria: i64,
}

impl ReportRow for RankingProducto {}

// 4. view_analisis_stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AlertaStock {
    #[serde(rename = "SIN STOCK")]
    SinStock,
    #[serde(rename = "CRÍTICO")]
    Critico,
    #[serde(rename = "NORMAL")]
    Normal,
}

impl AlertaStock {
    pub fn label(self) -> &'static str {
        match self {
            AlertaStock::SinStock => "SIN STOCK",
            AlertaStock::Critico => "CRÍTICO",
            AlertaStock::Normal => "NORMAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalisisStock {
    pub producto: String,
    #[serde(deserialize_with = "de_integer")]
    pub stock: i64,
    pub alerta: AlertaStock,
    #[serde(deserialize_with = "de_integer")]
    pub unidades_vendidas_historicas: i64,
}

impl ReportRow for AnalisisStock {}

// 5. view_eficiencia_ordenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EficienciaOrden {
    pub estado: String,
    #[serde(deserialize_with = "de_integer")]
    pub volumen: i64,
    #[serde(deserialize_with = "de_decimal")]
    pub monto_acumulado: Decimal,
}

impl ReportRow for EficienciaOrden {}

// Opções do filtro de categoria (tabela `categorias`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoriaOption {
    pub nombre: String,
}

impl ReportRow for CategoriaOption {}

/// Página de resultados. `total_pages` é sempre derivado de `total` e `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PageEnvelope<T> {
    pub fn new(mut data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        data.truncate(limit as usize);
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }

    /// Há linhas, mas a página pedida passa da última.
    pub fn is_out_of_range(&self) -> bool {
        self.total > 0 && self.page > self.total_pages
    }
}

pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
}

/// Resultado de qualquer um dos cinco relatórios.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "report", content = "result", rename_all = "snake_case")]
pub enum ReportResult {
    VentasPorCategoria(Vec<VentasCategoria>),
    ClientesVip(PageEnvelope<ClienteVip>),
    RankingProductos(Vec<RankingProducto>),
    AnalisisStock(PageEnvelope<AnalisisStock>),
    EficienciaOrdenes(Vec<EficienciaOrden>),
}

// Metadados exibidos no painel inicial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportSummary {
    pub id: u8,
    pub name: String,
    pub view: String,
    pub description: String,
}
