// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // A view devolveu linhas fora do esquema. A mensagem já é a do relatório.
    #[error("{0}")]
    DataIntegrity(String),

    #[error("Relatório não encontrado: {0}")]
    ReportNotFound(String),

    // Falhas da fonte de dados sobem sem alteração
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ReportNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DataIntegrity(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem exibida ao usuário (a interface é em espanhol).
    pub fn public_message(&self) -> String {
        match self {
            AppError::DataIntegrity(message) => message.clone(),
            AppError::ReportNotFound(_) => "Reporte no encontrado.".to_string(),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Ocurrió un error inesperado.".to_string()
            }
        }
    }

    pub(crate) fn log(&self) {
        match self {
            AppError::ReportNotFound(id) => tracing::debug!("Relatório inexistente: {}", id),
            AppError::DataIntegrity(message) => {
                tracing::error!("Erro de integridade de dados: {}", message)
            }
            AppError::DatabaseError(e) => tracing::error!("Erro de banco de dados: {:?}", e),
            AppError::InternalServerError(e) => tracing::error!("Erro Interno do Servidor: {:?}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}
