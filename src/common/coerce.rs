// src/common/coerce.rs

// Coerção de valores "numéricos" que o Postgres devolve como texto
// (BIGINT, NUMERIC). As mesmas funções servem aos dois caminhos:
// parâmetros da URL (tolerante, cai no default) e linhas das views
// (estrito, erro de integridade).

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("valor ausente")]
    Missing,

    #[error("'{0}' não é numérico")]
    NotNumeric(String),

    #[error("'{0}' não é um inteiro")]
    NotInteger(String),

    #[error("tipo inesperado: {0}")]
    UnexpectedType(&'static str),
}

/// Converte um número JSON ou um texto numérico em `Decimal`.
pub fn decimal(value: &Value) -> Result<Decimal, CoercionError> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        Value::Null => Err(CoercionError::Missing),
        Value::Bool(_) => Err(CoercionError::UnexpectedType("boolean")),
        Value::Array(_) => Err(CoercionError::UnexpectedType("array")),
        Value::Object(_) => Err(CoercionError::UnexpectedType("object")),
    }
}

/// Como `decimal`, mas exige parte fracionária zero ("12.00" vira 12).
pub fn integer(value: &Value) -> Result<i64, CoercionError> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }

    let number = decimal(value)?;
    if !number.fract().is_zero() {
        return Err(CoercionError::NotInteger(number.to_string()));
    }
    number
        .to_i64()
        .ok_or_else(|| CoercionError::NotInteger(number.to_string()))
}

fn parse_decimal(raw: &str) -> Result<Decimal, CoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoercionError::Missing);
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CoercionError::NotNumeric(trimmed.to_string()))
}

// --- Adaptadores para #[serde(deserialize_with = ...)] ---
//
// Coluna presente com NULL ou texto vazio vale 0 (agregados sem linhas,
// LEFT JOIN). Coluna ausente continua erro: o serde acusa o campo faltando.

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn de_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(Decimal::ZERO);
    }
    decimal(&value).map_err(serde::de::Error::custom)
}

pub fn de_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(0);
    }
    integer(&value).map_err(serde::de::Error::custom)
}
