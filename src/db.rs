pub mod memory_repo;
pub use memory_repo::MemoryReportRepository;
pub mod report_query;
pub use report_query::{QueryShape, QuerySpec, ReportQuery, SqlParam};
pub mod report_repo;
pub use report_repo::ReportRepository;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::common::error::AppError;

/// Linha crua de uma view, ainda sem validação de esquema.
pub type RawRow = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedRows {
    pub rows: Vec<RawRow>,
    /// Total de linhas que passam no filtro, ignorando LIMIT/OFFSET.
    /// `None` quando a consulta não pediu a contagem.
    pub total: Option<u64>,
}

// A fonte de dados dos relatórios. Só leitura.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch(&self, query: &ReportQuery) -> Result<FetchedRows, AppError>;

    async fn count(&self, query: &ReportQuery) -> Result<u64, AppError>;
}
