// src/services/report_service.rs

use std::sync::Arc;

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::{FetchedRows, QuerySpec, RawRow, ReportQuery, ReportSource},
    models::{
        params::RequestParams,
        report::{CategoriaOption, PageEnvelope, ReportResult, ReportRow},
    },
    services::registry::{
        ReportDefinition, ReportKind, CATEGORY_INTEGRITY_MESSAGE, CATEGORY_OPTIONS,
    },
};

// O pipeline dos relatórios: monta a consulta, executa, valida as linhas
// e (quando paginado) monta o envelope.
#[derive(Clone)]
pub struct ReportService {
    source: Arc<dyn ReportSource>,
    page_size: u32,
}

impl ReportService {
    pub fn new(source: Arc<dyn ReportSource>, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn run(
        &self,
        report: &ReportDefinition,
        params: &RequestParams,
    ) -> Result<ReportResult, AppError> {
        let result = match report.kind {
            ReportKind::VentasPorCategoria => {
                ReportResult::VentasPorCategoria(self.list(report, params).await?)
            }
            ReportKind::ClientesVip => ReportResult::ClientesVip(self.page(report, params).await?),
            ReportKind::RankingProductos => {
                ReportResult::RankingProductos(self.list(report, params).await?)
            }
            ReportKind::AnalisisStock => {
                ReportResult::AnalisisStock(self.page(report, params).await?)
            }
            ReportKind::EficienciaOrdenes => {
                ReportResult::EficienciaOrdenes(self.list(report, params).await?)
            }
        };

        Ok(result)
    }

    /// Relatórios sem paginação: lista completa, validada.
    pub async fn list<T: ReportRow>(
        &self,
        report: &ReportDefinition,
        params: &RequestParams,
    ) -> Result<Vec<T>, AppError> {
        let fetched = self.execute(&report.query, params).await?;
        decode_rows(fetched.rows, report.integrity_message)
    }

    /// Relatórios paginados. A página não é limitada a `total_pages`:
    /// uma página além da última volta vazia, com o total real.
    pub async fn page<T: ReportRow>(
        &self,
        report: &ReportDefinition,
        params: &RequestParams,
    ) -> Result<PageEnvelope<T>, AppError> {
        let page = params.page();
        let fetched = self.execute(&report.query, params).await?;

        // Sem linhas, o COUNT(*) OVER() não chega; numa página > 1 isso não
        // significa "zero linhas", então conta à parte.
        let total = match fetched.total {
            Some(total) if total > 0 || page == 1 || !fetched.rows.is_empty() => total,
            _ => {
                let query = ReportQuery::count(&report.query, params);
                tracing::debug!(source = query.source, page, "página vazia, recontando o total");
                self.source.count(&query).await?
            }
        };

        let data = decode_rows(fetched.rows, report.integrity_message)?;
        Ok(PageEnvelope::new(data, total, page, self.page_size))
    }

    /// Nomes das categorias para o filtro do ranking.
    pub async fn categories(&self) -> Result<Vec<String>, AppError> {
        let fetched = self
            .execute(&CATEGORY_OPTIONS, &RequestParams::default())
            .await?;
        let options: Vec<CategoriaOption> =
            decode_rows(fetched.rows, CATEGORY_INTEGRITY_MESSAGE)?;
        Ok(options.into_iter().map(|option| option.nombre).collect())
    }

    async fn execute(
        &self,
        spec: &QuerySpec,
        params: &RequestParams,
    ) -> Result<FetchedRows, AppError> {
        let query = ReportQuery::build(spec, params, self.page_size);
        tracing::debug!(
            source = query.source,
            filtered = query.filter.is_some(),
            offset = query.window.map(|w| w.offset),
            "executando consulta de relatório"
        );
        self.source.fetch(&query).await
    }
}

/// Validação estrita: qualquer linha fora do esquema derruba a resposta inteira.
pub fn decode_rows<T: ReportRow>(
    rows: Vec<RawRow>,
    integrity_message: &str,
) -> Result<Vec<T>, AppError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let row: T = serde_json::from_value(Value::Object(raw)).map_err(|e| {
                tracing::warn!(index, error = %e, "linha fora do esquema");
                AppError::DataIntegrity(integrity_message.to_string())
            })?;
            row.check().map_err(|e| {
                tracing::warn!(index, error = %e, "linha reprovada na validação");
                AppError::DataIntegrity(integrity_message.to_string())
            })?;
            Ok(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryReportRepository;
    use crate::models::report::{AnalisisStock, ClienteVip, EficienciaOrden, VentasCategoria};
    use crate::services::registry::find;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn service(repo: MemoryReportRepository) -> ReportService {
        ReportService::new(Arc::new(repo), 10)
    }

    fn vip_rows(count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|i| {
                    json!({
                        "cliente": format!("Cliente {i:02}"),
                        "email": format!("cliente{i}@tienda.com"),
                        "inversion_total": format!("{}.50", 5000 - i),
                        "total_pedidos": (i % 7 + 1).to_string()
                    })
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn sales_filter_keeps_rows_at_or_above_minimum() {
        let repo = MemoryReportRepository::new().with_json(
            "view_ventas_por_categoria",
            json!([
                {"categoria": "Hogar", "total_ventas_unidades": "4", "ingresos_totales": "400", "precio_promedio_producto": "100"},
                {"categoria": "Tecnología", "total_ventas_unidades": "3", "ingresos_totales": "600", "precio_promedio_producto": "200"}
            ]),
        );

        let rows: Vec<VentasCategoria> = service(repo)
            .list(find(1).unwrap(), &RequestParams::with_query("500"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].categoria, "Tecnología");
        assert_eq!(rows[0].ingresos_totales, Decimal::from(600));
    }

    #[tokio::test]
    async fn huge_minimum_filters_everything_out() {
        let repo = MemoryReportRepository::new().with_json(
            "view_ventas_por_categoria",
            json!([{"categoria": "Hogar", "total_ventas_unidades": 4, "ingresos_totales": 600, "precio_promedio_producto": 150}]),
        );
        let service = service(repo);

        for huge in ["1e40", "Infinity"] {
            let rows: Vec<VentasCategoria> = service
                .list(find(1).unwrap(), &RequestParams::with_query(huge))
                .await
                .unwrap();
            assert!(rows.is_empty(), "query={huge}");
        }
    }

    #[tokio::test]
    async fn sales_are_ordered_by_revenue_desc() {
        let repo = MemoryReportRepository::new().with_json(
            "view_ventas_por_categoria",
            json!([
                {"categoria": "A", "total_ventas_unidades": 1, "ingresos_totales": 50, "precio_promedio_producto": 50},
                {"categoria": "B", "total_ventas_unidades": 1, "ingresos_totales": 1500.5, "precio_promedio_producto": 1500},
                {"categoria": "C", "total_ventas_unidades": 1, "ingresos_totales": 700, "precio_promedio_producto": 700}
            ]),
        );

        let rows: Vec<VentasCategoria> = service(repo)
            .list(find(1).unwrap(), &RequestParams::default())
            .await
            .unwrap();

        let order: Vec<&str> = rows.iter().map(|r| r.categoria.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[tokio::test]
    async fn vip_second_page_reports_three_pages() {
        let repo = MemoryReportRepository::new().with_json("view_clientes_vip", vip_rows(25));

        let envelope: PageEnvelope<ClienteVip> = service(repo)
            .page(find(2).unwrap(), &RequestParams::with_page(2))
            .await
            .unwrap();

        assert_eq!(envelope.total, 25);
        assert_eq!(envelope.total_pages, 3);
        assert_eq!(envelope.page, 2);
        assert_eq!(envelope.limit, 10);
        assert_eq!(envelope.data.len(), 10);
        assert_eq!(envelope.data[0].cliente, "Cliente 10");
    }

    #[tokio::test]
    async fn empty_inventory_is_an_empty_envelope() {
        let repo = MemoryReportRepository::new().with_json("view_analisis_stock", json!([]));

        let result = service(repo)
            .run(find(4).unwrap(), &RequestParams::default())
            .await
            .unwrap();

        let ReportResult::AnalisisStock(envelope) = result else {
            panic!("esperava o relatório de stock");
        };
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.total, 0);
        assert_eq!(envelope.total_pages, 0);
        assert_eq!(envelope.page, 1);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_but_keeps_total() {
        let repo = MemoryReportRepository::new().with_json("view_clientes_vip", vip_rows(25));

        let envelope: PageEnvelope<ClienteVip> = service(repo)
            .page(find(2).unwrap(), &RequestParams::with_page(7))
            .await
            .unwrap();

        assert!(envelope.data.is_empty());
        assert_eq!(envelope.page, 7);
        assert_eq!(envelope.total, 25);
        assert!(envelope.is_out_of_range());
    }

    #[tokio::test]
    async fn ranking_without_category_returns_everything_grouped() {
        let repo = MemoryReportRepository::new().with_json(
            "view_ranking_productos",
            json!([
                {"categoria": "Ropa", "producto": "Camisa", "unidades": "9", "ranking_en_categoria": "2"},
                {"categoria": "Hogar", "producto": "Lámpara", "unidades": "5", "ranking_en_categoria": "1"},
                {"categoria": "Ropa", "producto": "Pantalón", "unidades": "12", "ranking_en_categoria": "1"}
            ]),
        );
        let service = service(repo);

        for params in [RequestParams::default(), RequestParams::with_query("Todas")] {
            let rows: Vec<crate::models::report::RankingProducto> =
                service.list(find(3).unwrap(), &params).await.unwrap();
            let order: Vec<(&str, i64)> = rows
                .iter()
                .map(|r| (r.categoria.as_str(), r.ranking_en_categoria))
                .collect();
            assert_eq!(order, vec![("Hogar", 1), ("Ropa", 1), ("Ropa", 2)]);
        }

        let rows: Vec<crate::models::report::RankingProducto> = service
            .list(find(3).unwrap(), &RequestParams::with_query("Ropa"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);

        let rows: Vec<crate::models::report::RankingProducto> = service
            .list(find(3).unwrap(), &RequestParams::with_query(" "))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn missing_field_fails_the_whole_request() {
        let repo = MemoryReportRepository::new().with_json(
            "view_eficiencia_ordenes",
            json!([
                {"estado": "ENTREGADO", "volumen": "10", "monto_acumulado": "100.00"},
                {"estado": "PENDIENTE", "volumen": "3"}
            ]),
        );

        let err = service(repo)
            .list::<EficienciaOrden>(find(5).unwrap(), &RequestParams::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::DataIntegrity(ref message) if message == "Error de datos en Eficiencia Órdenes."
        ));
    }

    #[tokio::test]
    async fn null_or_blank_numbers_read_as_zero() {
        let repo = MemoryReportRepository::new().with_json(
            "view_eficiencia_ordenes",
            json!([
                {"estado": "CANCELADO", "volumen": "2", "monto_acumulado": null},
                {"estado": "PENDIENTE", "volumen": "", "monto_acumulado": " "}
            ]),
        );

        let rows: Vec<EficienciaOrden> = service(repo)
            .list(find(5).unwrap(), &RequestParams::default())
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].volumen, 2);
        assert_eq!(rows[0].monto_acumulado, Decimal::ZERO);
        assert_eq!(rows[1].volumen, 0);
        assert_eq!(rows[1].monto_acumulado, Decimal::ZERO);
    }

    #[tokio::test]
    async fn non_numeric_text_still_fails() {
        let repo = MemoryReportRepository::new().with_json(
            "view_eficiencia_ordenes",
            json!([{"estado": "PAGADO", "volumen": "abc", "monto_acumulado": "10"}]),
        );

        let err = service(repo)
            .list::<EficienciaOrden>(find(5).unwrap(), &RequestParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
    }

    #[tokio::test]
    async fn invalid_email_fails_the_vip_page() {
        let repo = MemoryReportRepository::new().with_json(
            "view_clientes_vip",
            json!([{"cliente": "Ana", "email": "ana-sin-arroba", "inversion_total": 900, "total_pedidos": 2}]),
        );

        let err = service(repo)
            .run(find(2).unwrap(), &RequestParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
    }

    #[tokio::test]
    async fn valid_row_round_trips_with_numeric_coercion() {
        let repo = MemoryReportRepository::new().with_json(
            "view_analisis_stock",
            json!([{"producto": "Mesa", "stock": "2", "alerta": "CRÍTICO", "unidades_vendidas_historicas": "31"}]),
        );

        let envelope: PageEnvelope<AnalisisStock> = service(repo)
            .page(find(4).unwrap(), &RequestParams::default())
            .await
            .unwrap();

        let row = &envelope.data[0];
        assert_eq!(row.producto, "Mesa");
        assert_eq!(row.stock, 2);
        assert_eq!(row.unidades_vendidas_historicas, 31);
        assert_eq!(row.alerta.label(), "CRÍTICO");
    }

    #[tokio::test]
    async fn data_source_failure_propagates() {
        let err = service(MemoryReportRepository::offline())
            .run(find(5).unwrap(), &RequestParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn categories_come_sorted_by_name() {
        let repo = MemoryReportRepository::new().with_json(
            "categorias",
            json!([{"nombre": "Ropa"}, {"nombre": "Hogar"}, {"nombre": "Deportes"}]),
        );
        let names = service(repo).categories().await.unwrap();
        assert_eq!(names, vec!["Deportes", "Hogar", "Ropa"]);
    }
}
