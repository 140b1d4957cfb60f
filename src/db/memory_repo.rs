// src/db/memory_repo.rs

// Fonte em memória: interpreta a mesma ReportQuery (filtro, ordenação,
// janela) sobre tabelas fixas. Serve de fixture para testes e demos.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    common::{coerce, error::AppError},
    db::{
        report_query::{BoundFilter, FilterOp, SortDirection, SortKey},
        FetchedRows, RawRow, ReportQuery, ReportSource, SqlParam,
    },
};

#[derive(Debug, Clone, Default)]
pub struct MemoryReportRepository {
    tables: HashMap<String, Vec<RawRow>>,
    offline: bool,
}

impl MemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fonte que falha em toda consulta, como um banco fora do ar.
    pub fn offline() -> Self {
        Self {
            tables: HashMap::new(),
            offline: true,
        }
    }

    pub fn with_table(mut self, source: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.tables.insert(source.into(), rows);
        self
    }

    /// Aceita um array JSON de objetos; o que não for objeto é ignorado.
    pub fn with_json(self, source: impl Into<String>, rows: Value) -> Self {
        let rows = match rows {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(fields) => Some(fields),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        self.with_table(source, rows)
    }

    fn filtered(&self, query: &ReportQuery) -> Result<Vec<&RawRow>, AppError> {
        if self.offline {
            return Err(sqlx::Error::PoolTimedOut.into());
        }

        let table = self.tables.get(query.source).ok_or_else(|| {
            AppError::from(sqlx::Error::Protocol(format!(
                "relation \"{}\" does not exist",
                query.source
            )))
        })?;

        Ok(table
            .iter()
            .filter(|row| match &query.filter {
                Some(filter) => passes_filter(row, filter),
                None => true,
            })
            .collect())
    }
}

fn passes_filter(row: &RawRow, filter: &BoundFilter) -> bool {
    let Some(cell) = row.get(filter.column) else {
        return false;
    };

    let ordering = match &filter.value {
        SqlParam::Decimal(value) => compare_numeric(cell, *value),
        SqlParam::Text(value) => cell.as_str().map(|text| text.cmp(value.as_str())),
    };

    // Como no SQL, valor não comparável (NULL etc.) não passa no filtro
    match (ordering, filter.op) {
        (Some(Ordering::Equal), _) => true,
        (Some(Ordering::Greater), FilterOp::Gte) => true,
        _ => false,
    }
}

fn compare_numeric(cell: &Value, value: Decimal) -> Option<Ordering> {
    coerce::decimal(cell).ok().map(|number| number.cmp(&value))
}

fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        // NULLS LAST no ASC, como o Postgres
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        // Texto ordena como texto ("10" < "9"), igual ao Postgres
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => match (coerce::decimal(a), coerce::decimal(b)) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

fn sort_rows(rows: &mut [&RawRow], keys: &[SortKey]) {
    rows.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = compare_cells(a.get(key.column), b.get(key.column));
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

#[async_trait]
impl ReportSource for MemoryReportRepository {
    async fn fetch(&self, query: &ReportQuery) -> Result<FetchedRows, AppError> {
        let mut rows = self.filtered(query)?;
        sort_rows(&mut rows, query.sort);

        let total = query.counts_total().then_some(rows.len() as u64);

        let rows = match query.window {
            Some(window) => rows
                .into_iter()
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(window.limit as usize)
                .cloned()
                .collect(),
            None => rows.into_iter().cloned().collect(),
        };

        Ok(FetchedRows { rows, total })
    }

    async fn count(&self, query: &ReportQuery) -> Result<u64, AppError> {
        Ok(self.filtered(query)?.len() as u64)
    }
}
