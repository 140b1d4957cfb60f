//! Páginas HTML renderizadas no servidor.
//!
//! Tudo é montado com `format!`; todo texto vindo do banco ou da URL passa
//! por [`escape`] antes de entrar no HTML.

pub mod reports;

use axum::http::StatusCode;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::services::registry::ReportDefinition;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `1234.5` -> `$1,234.50`
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Moldura comum de todas as páginas.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Sistema de Reportes</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = escape(title),
        css = CSS,
        body = body,
    )
}

/// Painel inicial com um cartão por relatório.
pub fn index_page(reports: &[ReportDefinition]) -> String {
    let mut cards = String::new();

    for report in reports {
        cards.push_str(&format!(
            r#"
        <a class="card report-card" href="/reports/{id}">
            <span class="report-id">{id}</span>
            <h2>{name}</h2>
            <p>{description}</p>
            <span class="card-link">Ver reporte &rarr;</span>
        </a>"#,
            id = report.id,
            name = escape(report.name),
            description = escape(report.description),
        ));
    }

    let body = format!(
        r#"
    <h1 class="center">Sistema de Reportes</h1>
    <p class="subtitle center">Panel de control de operaciones comerciales</p>
    <div class="grid">{cards}
    </div>"#
    );

    layout("Inicio", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"
    <div class="header">
        <a class="back" href="/">&larr; Volver</a>
        <h1>Error {code}</h1>
    </div>
    <div class="card error">
        <p>{message}</p>
    </div>"#,
        code = status.as_u16(),
        message = escape(message),
    );

    layout("Error", &body)
}

const CSS: &str = r#"
* { box-sizing: border-box; }
body { font-family: system-ui, -apple-system, sans-serif; background: #f9fafb; color: #1f2937; margin: 0; padding: 32px; }
.container { max-width: 1100px; margin: 0 auto; }
h1 { font-size: 1.9em; margin: 0; }
.center { text-align: center; }
.subtitle { color: #6b7280; margin-bottom: 40px; }
.header { display: flex; align-items: center; justify-content: space-between; gap: 16px; margin-bottom: 24px; }
.header .title { display: flex; align-items: center; gap: 16px; }
.back { color: #6b7280; text-decoration: none; }
.back:hover { color: #2563eb; }
.muted { color: #6b7280; font-size: 0.9em; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 24px; }
.kpis { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; margin-bottom: 24px; }
.card { background: #fff; border: 1px solid #e5e7eb; border-radius: 12px; padding: 24px; }
.report-card { position: relative; color: inherit; text-decoration: none; }
.report-card:hover { border-color: #bfdbfe; box-shadow: 0 10px 25px rgba(37, 99, 235, 0.08); }
.report-id { position: absolute; top: 12px; right: 20px; font-size: 3em; font-weight: bold; color: #2563eb; opacity: 0.12; }
.card-link { color: #3b82f6; font-size: 0.9em; }
.kpi-label { font-size: 0.85em; color: #6b7280; margin: 0; }
.kpi-value { font-size: 1.6em; font-weight: bold; margin-top: 8px; }
.accent { color: #2563eb; }
.table-card { padding: 0; overflow: hidden; }
table { width: 100%; border-collapse: collapse; font-size: 0.9em; }
thead { background: #f9fafb; color: #6b7280; text-transform: uppercase; }
th, td { padding: 14px 24px; text-align: left; border-bottom: 1px solid #f3f4f6; }
.num { text-align: right; }
.mid { text-align: center; }
.empty { text-align: center; color: #6b7280; padding: 32px; }
.badge { display: inline-block; padding: 2px 10px; border-radius: 999px; font-size: 0.8em; font-weight: 600; }
.badge-purple { background: #f3e8ff; color: #6b21a8; }
.badge-red { background: #fef2f2; color: #b91c1c; }
.badge-yellow { background: #fefce8; color: #a16207; }
.badge-green { background: #f0fdf4; color: #15803d; }
.rank { display: inline-flex; width: 26px; height: 26px; align-items: center; justify-content: center; border-radius: 999px; font-size: 0.75em; font-weight: bold; background: #ffedd5; color: #9a3412; }
.rank-1 { background: #fef9c3; color: #854d0e; }
.rank-2 { background: #e5e7eb; color: #374151; }
.group-title { background: #f3f4f6; padding: 14px 24px; margin: 0; font-size: 1.1em; }
.group-list { list-style: none; margin: 0; padding: 0; }
.group-list li { display: flex; justify-content: space-between; align-items: center; padding: 14px 24px; border-bottom: 1px solid #f3f4f6; }
.pagination { display: flex; justify-content: space-between; align-items: center; padding: 16px 24px; background: #f9fafb; }
.pagination a { padding: 8px 16px; border: 1px solid #d1d5db; border-radius: 8px; background: #fff; color: inherit; text-decoration: none; }
.pagination a.disabled { opacity: 0.5; pointer-events: none; }
.notice { background: #fefce8; border: 1px solid #fde68a; color: #92400e; border-radius: 8px; padding: 12px 16px; margin-bottom: 16px; }
form.filter { display: flex; gap: 8px; align-items: center; }
form.filter input, form.filter select { padding: 8px 12px; border: 1px solid #d1d5db; border-radius: 8px; }
form.filter button { background: #2563eb; color: #fff; border: 0; border-radius: 8px; padding: 8px 16px; cursor: pointer; }
.error p { color: #b91c1c; margin: 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::registry;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape("Categoría"), "Categoría");
    }

    #[test]
    fn money_has_two_decimals_and_separators() {
        assert_eq!(format_money(Decimal::new(12345, 1)), "$1,234.50");
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
        assert_eq!(format_money(Decimal::new(1234567891, 3)), "$1,234,567.89");
        assert_eq!(format_money(Decimal::new(-5005, 1)), "-$500.50");
        assert_eq!(format_money(Decimal::new(999, 0)), "$999.00");
    }

    #[test]
    fn counts_get_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(-1234567), "-1,234,567");
    }

    #[test]
    fn index_links_every_report() {
        let html = index_page(registry::all());
        assert!(html.contains("Sistema de Reportes"));
        for id in 1..=5 {
            assert!(html.contains(&format!(r#"href="/reports/{id}""#)));
        }
        assert!(html.contains("Eficiencia de Órdenes"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = error_page(StatusCode::NOT_FOUND, "<b>no</b>");
        assert!(html.contains("Error 404"));
        assert!(html.contains("&lt;b&gt;no&lt;/b&gt;"));
    }
}
