// src/pages/reports.rs

use rust_decimal::Decimal;

use super::{escape, format_count, format_money};
use crate::{
    models::report::{
        AlertaStock, AnalisisStock, ClienteVip, EficienciaOrden, PageEnvelope, RankingProducto,
        VentasCategoria,
    },
    services::{
        aggregate::{group_by_category, PaginationLinks, SalesTotals},
        registry::ALL_CATEGORIES,
    },
};

fn header(title: &str, right: &str) -> String {
    format!(
        r#"
    <div class="header">
        <div class="title">
            <a class="back" href="/">&larr; Volver</a>
            <h1>{title}</h1>
        </div>
        {right}
    </div>"#,
        title = escape(title),
    )
}

fn kpi(label: &str, value: &str, accent: bool) -> String {
    format!(
        r#"
        <div class="card">
            <p class="kpi-label">{label}</p>
            <div class="kpi-value{class}">{value}</div>
        </div>"#,
        label = escape(label),
        class = if accent { " accent" } else { "" },
        value = escape(value),
    )
}

fn empty_row(columns: usize, message: &str) -> String {
    format!(
        r#"<tr><td colspan="{columns}" class="empty">{message}</td></tr>"#,
        message = escape(message),
    )
}

fn pagination(report_id: u8, links: &PaginationLinks) -> String {
    let mut html = String::new();

    if links.out_of_range {
        html.push_str(&format!(
            r#"
        <div class="notice">La página {page} no existe; el reporte tiene {total} página(s).</div>"#,
            page = links.page,
            total = links.total_pages,
        ));
    }

    html.push_str(&format!(
        r#"
        <div class="pagination">
            <a href="/reports/{id}?page={previous}"{prev_class}>Anterior</a>
            <span class="muted">Página {page} de {total}</span>
            <a href="/reports/{id}?page={next}"{next_class}>Siguiente</a>
        </div>"#,
        id = report_id,
        previous = links.previous,
        next = links.next,
        page = links.page,
        total = links.total_pages,
        prev_class = if links.has_previous { "" } else { r#" class="disabled""# },
        next_class = if links.has_next { "" } else { r#" class="disabled""# },
    ));

    html
}

// 1. Ventas por Categoría
pub fn ventas_por_categoria(rows: &[VentasCategoria], min_revenue: Decimal) -> String {
    let totals = SalesTotals::from_rows(rows);

    let filter = format!(
        r#"<form class="filter" method="get">
            <input name="query" type="number" value="{value}" placeholder="Ingreso Mínimo..." title="Filtrar por ingreso mínimo">
            <button type="submit">Filtrar</button>
        </form>"#,
        value = escape(&min_revenue.normalize().to_string()),
    );

    let mut body = String::new();
    for row in rows {
        body.push_str(&format!(
            r#"
                <tr>
                    <td><strong>{categoria}</strong></td>
                    <td class="mid">{unidades}</td>
                    <td class="num">{precio}</td>
                    <td class="num accent"><strong>{ingresos}</strong></td>
                </tr>"#,
            categoria = escape(&row.categoria),
            unidades = format_count(row.total_ventas_unidades),
            precio = format_money(row.precio_promedio_producto),
            ingresos = format_money(row.ingresos_totales),
        ));
    }
    if rows.is_empty() {
        body.push_str(&empty_row(4, "No hay categorías con ese nivel de ingresos."));
    }

    format!(
        r#"{header}
    <div class="kpis">{k1}{k2}{k3}
    </div>
    <div class="card table-card">
        <table>
            <thead>
                <tr><th>Categoría</th><th class="mid">Unidades</th><th class="num">Precio Promedio</th><th class="num">Ingresos</th></tr>
            </thead>
            <tbody>{body}
            </tbody>
        </table>
    </div>"#,
        header = header("Ventas por Categoría", &filter),
        k1 = kpi("Ingresos Totales (Filtrado)", &format_money(totals.ingresos), true),
        k2 = kpi("Unidades Vendidas", &format_count(totals.unidades), false),
        k3 = kpi("Categorías Mostradas", &totals.categorias.to_string(), false),
    )
}

// 2. Clientes VIP
pub fn clientes_vip(envelope: &PageEnvelope<ClienteVip>) -> String {
    let links = PaginationLinks::for_envelope(envelope);
    let total = format!(
        r#"<span class="muted">Total: {} clientes</span>"#,
        envelope.total
    );

    let mut body = String::new();
    for row in &envelope.data {
        body.push_str(&format!(
            r#"
                <tr>
                    <td><strong>{cliente}</strong></td>
                    <td class="muted"><code>{email}</code></td>
                    <td class="mid"><span class="badge badge-purple">{pedidos} pedidos</span></td>
                    <td class="num"><strong>{inversion}</strong></td>
                </tr>"#,
            cliente = escape(&row.cliente),
            email = escape(&row.email),
            pedidos = format_count(row.total_pedidos),
            inversion = format_money(row.inversion_total),
        ));
    }
    if envelope.data.is_empty() {
        body.push_str(&empty_row(4, "No hay clientes VIP aún."));
    }

    format!(
        r#"{header}
    <p class="muted">Listado de clientes con inversión acumulada superior a 500 unidades monetarias.</p>
    <div class="card table-card">
        <table>
            <thead>
                <tr><th>Cliente</th><th>Email</th><th class="mid">Total Pedidos</th><th class="num">Inversión Total</th></tr>
            </thead>
            <tbody>{body}
            </tbody>
        </table>{pagination}
    </div>"#,
        header = header("Clientes VIP", &total),
        pagination = pagination(2, &links),
    )
}

// 3. Top Productos
pub fn ranking_productos(
    rows: &[RankingProducto],
    categories: &[String],
    selected: Option<&str>,
) -> String {
    let selected = selected.filter(|s| *s != ALL_CATEGORIES);

    let mut options = format!(
        r#"<option value=""{}>{}</option>"#,
        if selected.is_none() { " selected" } else { "" },
        ALL_CATEGORIES
    );
    for category in categories {
        options.push_str(&format!(
            r#"<option value="{value}"{sel}>{value}</option>"#,
            value = escape(category),
            sel = if selected == Some(category.as_str()) { " selected" } else { "" },
        ));
    }

    // Sem JS: o <select> envia o formulário pelo botão
    let filter = format!(
        r#"<form class="filter" method="get">
            <label for="category">Categoría:</label>
            <select name="query" id="category">{options}</select>
            <button type="submit">Filtrar</button>
        </form>"#
    );

    let mut groups = String::new();
    for group in group_by_category(rows) {
        let mut items = String::new();
        for item in &group.items {
            let rank_class = match item.ranking_en_categoria {
                1 => " rank-1",
                2 => " rank-2",
                _ => "",
            };
            items.push_str(&format!(
                r#"
                <li>
                    <span><span class="rank{rank_class}">#{rank}</span> {producto}</span>
                    <span class="badge accent">{unidades} u.</span>
                </li>"#,
                rank = item.ranking_en_categoria,
                producto = escape(&item.producto),
                unidades = format_count(item.unidades),
            ));
        }

        groups.push_str(&format!(
            r#"
        <div class="card table-card">
            <h2 class="group-title">{categoria}</h2>
            <ul class="group-list">{items}
            </ul>
        </div>"#,
            categoria = escape(group.categoria),
        ));
    }
    if rows.is_empty() {
        groups.push_str(
            r#"
        <div class="card empty">No hay productos para esta categoría.</div>"#,
        );
    }

    format!(
        r#"{header}
    <div class="grid">{groups}
    </div>"#,
        header = header("Top Productos", &filter),
    )
}

// 4. Análisis de Stock
pub fn analisis_stock(envelope: &PageEnvelope<AnalisisStock>) -> String {
    let links = PaginationLinks::for_envelope(envelope);
    let total = format!(
        r#"<span class="muted">Total: {} productos</span>"#,
        envelope.total
    );

    let mut body = String::new();
    for row in &envelope.data {
        let badge = match row.alerta {
            AlertaStock::SinStock => "badge-red",
            AlertaStock::Critico => "badge-yellow",
            AlertaStock::Normal => "badge-green",
        };
        body.push_str(&format!(
            r#"
                <tr>
                    <td><strong>{producto}</strong></td>
                    <td class="mid"><strong>{stock}</strong></td>
                    <td class="mid"><span class="badge {badge}">{alerta}</span></td>
                    <td class="mid muted">{vendidas} unidades</td>
                </tr>"#,
            producto = escape(&row.producto),
            stock = format_count(row.stock),
            alerta = escape(row.alerta.label()),
            vendidas = format_count(row.unidades_vendidas_historicas),
        ));
    }
    if envelope.data.is_empty() {
        body.push_str(&empty_row(4, "Inventario vacío."));
    }

    format!(
        r#"{header}
    <div class="card table-card">
        <table>
            <thead>
                <tr><th>Producto</th><th class="mid">Stock Actual</th><th class="mid">Estado</th><th class="mid">Histórico Ventas</th></tr>
            </thead>
            <tbody>{body}
            </tbody>
        </table>{pagination}
    </div>"#,
        header = header("Análisis de Stock", &total),
        pagination = pagination(4, &links),
    )
}

// 5. Eficiencia de Órdenes
pub fn eficiencia_ordenes(rows: &[EficienciaOrden]) -> String {
    let mut cards = String::new();
    let mut body = String::new();

    for row in rows {
        cards.push_str(&format!(
            r#"
        <div class="card">
            <p class="kpi-label">{estado}</p>
            <div class="kpi-value">{volumen}</div>
            <p class="muted">Órdenes</p>
            <p><strong>{monto}</strong> <span class="muted">acumulado</span></p>
        </div>"#,
            estado = escape(&row.estado.to_uppercase()),
            volumen = format_count(row.volumen),
            monto = format_money(row.monto_acumulado),
        ));
        body.push_str(&format!(
            r#"
                <tr>
                    <td><strong>{estado}</strong></td>
                    <td class="mid">{volumen}</td>
                    <td class="num">{monto}</td>
                </tr>"#,
            estado = escape(&row.estado),
            volumen = format_count(row.volumen),
            monto = format_money(row.monto_acumulado),
        ));
    }
    if rows.is_empty() {
        body.push_str(&empty_row(3, "No hay órdenes registradas."));
    }

    format!(
        r#"{header}
    <div class="kpis">{cards}
    </div>
    <div class="card table-card">
        <h2 class="group-title">Detalle por Estado</h2>
        <table>
            <thead>
                <tr><th>Estado</th><th class="mid">Volumen de Órdenes</th><th class="num">Monto Total</th></tr>
            </thead>
            <tbody>{body}
            </tbody>
        </table>
    </div>"#,
        header = header("Eficiencia de Órdenes", ""),
    )
}
