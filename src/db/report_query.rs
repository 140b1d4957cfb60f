// src/db/report_query.rs

// Montagem das consultas de relatório. Identificadores (view, colunas)
// vêm só das definições estáticas; valores do usuário ficam em
// `BoundFilter` e viram parâmetros na hora de executar.

use rust_decimal::Decimal;

use crate::models::params::RequestParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
}

impl FilterOp {
    fn symbol(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Sempre aplicado; `query` inválido ou ausente vale 0.
    Numeric,
    /// Aplicado só quando há valor e ele não está em `match_all`.
    Text { match_all: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: &'static str,
    pub op: FilterOp,
    pub kind: FilterKind,
}

impl FilterSpec {
    fn bind(&self, params: &RequestParams) -> Option<BoundFilter> {
        let value = match self.kind {
            FilterKind::Numeric => SqlParam::Decimal(params.numeric_query()),
            FilterKind::Text { match_all } => {
                let raw = params.text_query()?;
                if match_all.contains(&raw) {
                    return None;
                }
                SqlParam::Text(raw.to_string())
            }
        };

        Some(BoundFilter {
            column: self.column,
            op: self.op,
            value,
        })
    }
}

/// Parte fixa de uma consulta: view, filtro opcional, ordenação e paginação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpec {
    pub source: &'static str,
    pub filter: Option<FilterSpec>,
    pub sort: &'static [SortKey],
    pub paginated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Decimal(Decimal),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundFilter {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: SqlParam,
}

impl BoundFilter {
    pub fn symbol(&self) -> &'static str {
        self.op.symbol()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u32,
    pub offset: u64,
}

impl Window {
    // offset = (page - 1) * limit
    pub fn for_page(page: u32, limit: u32) -> Self {
        let offset = u64::from(page.max(1) - 1) * u64::from(limit);
        Self { limit, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// Linhas como jsonb; com `window`, também o `COUNT(*) OVER()`.
    Rows,
    /// Só a contagem das linhas que passam no filtro.
    Count,
}

/// Descrição estruturada de uma consulta. Cada fonte a executa do seu
/// jeito: o Postgres via `QueryBuilder`, a memória interpretando os campos.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub source: &'static str,
    pub shape: QueryShape,
    pub filter: Option<BoundFilter>,
    pub sort: &'static [SortKey],
    pub window: Option<Window>,
}

impl ReportQuery {
    pub fn build(spec: &QuerySpec, params: &RequestParams, limit: u32) -> Self {
        let window = spec
            .paginated
            .then(|| Window::for_page(params.page(), limit));
        Self {
            source: spec.source,
            shape: QueryShape::Rows,
            filter: spec.filter.and_then(|f| f.bind(params)),
            sort: spec.sort,
            window,
        }
    }

    pub fn count(spec: &QuerySpec, params: &RequestParams) -> Self {
        Self {
            source: spec.source,
            shape: QueryShape::Count,
            filter: spec.filter.and_then(|f| f.bind(params)),
            sort: &[],
            window: None,
        }
    }

    /// A fonte deve devolver o total de linhas (window aggregate) junto.
    pub fn counts_total(&self) -> bool {
        self.shape == QueryShape::Rows && self.window.is_some()
    }
}

impl SortKey {
    pub fn render(&self) -> String {
        format!("v.{} {}", self.column, self.direction.keyword())
    }
}
