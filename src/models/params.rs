// src/models/params.rs

use std::collections::HashMap;

use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde_json::Value;

use crate::common::coerce;

pub const QUERY_KEY: &str = "query";
pub const PAGE_KEY: &str = "page";
pub const DEFAULT_PAGE: u32 = 1;

/// Parâmetros da URL já validados.
///
/// A validação nunca falha: valores malformados viram `None` e os
/// acessores aplicam os defaults (página 1, filtro numérico 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pub query: Option<String>,
    pub page: Option<u32>,
}

impl RequestParams {
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let query = raw
            .get(QUERY_KEY)
            .filter(|value| !value.is_empty())
            .cloned();

        let page = raw
            .get(PAGE_KEY)
            .and_then(|value| coerce::integer(&Value::String(value.clone())).ok())
            .and_then(|page| u32::try_from(page).ok())
            .filter(|page| *page >= DEFAULT_PAGE);

        Self { query, page }
    }

    pub fn with_page(page: u32) -> Self {
        Self { query: None, page: Some(page) }
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self { query: Some(query.into()), page: None }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    // Filtro numérico coagido no ponto de uso; texto inválido vale 0
    pub fn numeric_query(&self) -> Decimal {
        self.query
            .as_deref()
            .and_then(|q| {
                coerce::decimal(&Value::String(q.to_string()))
                    .ok()
                    .or_else(|| beyond_decimal(q))
            })
            .unwrap_or(Decimal::ZERO)
    }

    pub fn text_query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

// Número válido fora da faixa do Decimal ("1e40", "Infinity") satura
// no limite em vez de sumir com o filtro.
fn beyond_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let number: f64 = trimmed.parse().ok()?;
    if number.is_nan() {
        return None;
    }
    if number.is_infinite() && trimmed.trim_start_matches(['+', '-']) != "Infinity" {
        return None;
    }

    Decimal::from_f64(number).or(Some(if number.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}
