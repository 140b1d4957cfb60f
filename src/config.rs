// src/config.rs

use std::{collections::HashMap, env, net::SocketAddr, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::{
    db::{ReportRepository, ReportSource},
    services::ReportService,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} deve ser definida")]
    Missing(&'static str),

    #[error("{key} inválida: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub page_size: u32,
}

impl AppConfig {
    // Lê o .env (se existir) e depois o ambiente
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_kv(&vars)
    }

    pub fn from_kv(kv: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = get(kv, "DATABASE_URL")
            .ok_or(ConfigError::Missing("DATABASE_URL"))?
            .to_string();

        let bind_addr = parse_or(kv, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;
        let db_max_connections =
            parse_or(kv, "DB_MAX_CONNECTIONS", Some(DEFAULT_MAX_CONNECTIONS))?;
        let acquire_secs =
            parse_or(kv, "DB_ACQUIRE_TIMEOUT_SECS", Some(DEFAULT_ACQUIRE_TIMEOUT_SECS))?;
        let page_size: u32 = parse_or(kv, "REPORT_PAGE_SIZE", Some(DEFAULT_PAGE_SIZE))?;

        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "REPORT_PAGE_SIZE",
                value: "0".to_string(),
            });
        }
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(acquire_secs),
            page_size,
        })
    }
}

fn get<'a>(kv: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    kv.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(
    kv: &HashMap<String, String>,
    key: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match get(kv, key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(key)),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let report_repo = ReportRepository::new(db_pool);
        Ok(Self::with_source(Arc::new(report_repo), config.page_size))
    }

    /// Monta o estado sobre qualquer fonte de dados (Postgres ou memória).
    pub fn with_source(source: Arc<dyn ReportSource>, page_size: u32) -> Self {
        Self {
            report_service: ReportService::new(source, page_size),
        }
    }
}
