// src/db/report_repo.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};

use crate::{
    common::error::AppError,
    db::{
        report_query::SortKey, FetchedRows, QueryShape, RawRow, ReportQuery, ReportSource,
        SqlParam,
    },
};

// O repositório dos relatórios, responsável por consultar as views no Postgres
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Traduz a descrição estruturada em SQL; todo valor vai por push_bind
pub(crate) fn sql_builder(query: &ReportQuery) -> QueryBuilder<'static, Postgres> {
    let select = match query.shape {
        QueryShape::Count => "SELECT COUNT(*) AS full_count",
        QueryShape::Rows if query.counts_total() => {
            "SELECT to_jsonb(v) AS row, COUNT(*) OVER() AS full_count"
        }
        QueryShape::Rows => "SELECT to_jsonb(v) AS row",
    };

    let mut builder = QueryBuilder::new(select);
    builder.push(format!(" FROM {} v", query.source));

    if let Some(filter) = &query.filter {
        builder.push(format!(" WHERE v.{} {} ", filter.column, filter.symbol()));
        match &filter.value {
            SqlParam::Decimal(value) => builder.push_bind(*value),
            SqlParam::Text(value) => builder.push_bind(value.clone()),
        };
    }

    if !query.sort.is_empty() {
        let keys: Vec<String> = query.sort.iter().map(SortKey::render).collect();
        builder.push(format!(" ORDER BY {}", keys.join(", ")));
    }

    if let Some(window) = query.window {
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(window.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
    }

    builder
}

fn json_row(row: &PgRow, source: &str) -> Result<RawRow, AppError> {
    match row.try_get::<Value, _>("row")? {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::DataIntegrity(format!(
            "Linha inesperada em {}: {}",
            source, other
        ))),
    }
}

#[async_trait]
impl ReportSource for ReportRepository {
    async fn fetch(&self, query: &ReportQuery) -> Result<FetchedRows, AppError> {
        let mut builder = sql_builder(query);
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await?;

        // O COUNT(*) OVER() vem repetido em todas as linhas; basta a primeira
        let total = if query.counts_total() {
            let count = match rows.first() {
                Some(first) => first.try_get::<i64, _>("full_count")?,
                None => 0,
            };
            Some(u64::try_from(count).unwrap_or(0))
        } else {
            None
        };

        let rows = rows
            .iter()
            .map(|row| json_row(row, query.source))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FetchedRows { rows, total })
    }

    async fn count(&self, query: &ReportQuery) -> Result<u64, AppError> {
        let mut builder = sql_builder(query);
        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::QuerySpec;
    use crate::models::params::RequestParams;
    use crate::services::registry::{self, CATEGORY_OPTIONS};

    fn sql(spec: &QuerySpec, params: &RequestParams) -> String {
        sql_builder(&ReportQuery::build(spec, params, 10)).sql().to_string()
    }

    fn spec(id: u8) -> &'static QuerySpec {
        &registry::find(id).unwrap().query
    }

    #[test]
    fn sales_filter_is_a_placeholder() {
        assert_eq!(
            sql(spec(1), &RequestParams::with_query("500")),
            "SELECT to_jsonb(v) AS row FROM view_ventas_por_categoria v \
             WHERE v.ingresos_totales >= $1 ORDER BY v.ingresos_totales DESC"
        );
    }

    #[test]
    fn paginated_query_binds_limit_and_offset() {
        assert_eq!(
            sql(spec(2), &RequestParams::with_page(2)),
            "SELECT to_jsonb(v) AS row, COUNT(*) OVER() AS full_count FROM view_clientes_vip v \
             ORDER BY v.inversion_total DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn category_value_never_reaches_query_text() {
        let hostile = "x'; DROP TABLE categorias; --";
        let text = sql(spec(3), &RequestParams::with_query(hostile));
        assert!(text.contains("WHERE v.categoria = $1"));
        assert!(!text.contains(hostile));

        let text = sql(spec(3), &RequestParams::with_query("Todas"));
        assert!(!text.contains("WHERE"));
        assert!(text.ends_with("ORDER BY v.categoria ASC, v.ranking_en_categoria ASC"));
    }

    #[test]
    fn plain_and_count_queries() {
        assert_eq!(
            sql(spec(5), &RequestParams::with_page(3)),
            "SELECT to_jsonb(v) AS row FROM view_eficiencia_ordenes v"
        );
        assert_eq!(
            sql(&CATEGORY_OPTIONS, &RequestParams::default()),
            "SELECT to_jsonb(v) AS row FROM categorias v ORDER BY v.nombre ASC"
        );

        let count = ReportQuery::count(spec(4), &RequestParams::with_page(9));
        assert_eq!(
            sql_builder(&count).sql(),
            "SELECT COUNT(*) AS full_count FROM view_analisis_stock v"
        );
    }
}
