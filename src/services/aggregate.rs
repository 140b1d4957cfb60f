// src/services/aggregate.rs

// Agregados só de exibição, calculados sobre as linhas já validadas.

use rust_decimal::Decimal;

use crate::models::report::{PageEnvelope, RankingProducto, VentasCategoria};

// KPIs do relatório de vendas (sobre o que foi filtrado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesTotals {
    pub ingresos: Decimal,
    pub unidades: i64,
    pub categorias: usize,
}

impl SalesTotals {
    pub fn from_rows(rows: &[VentasCategoria]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            ingresos: acc.ingresos + row.ingresos_totales,
            unidades: acc.unidades + row.total_ventas_unidades,
            categorias: acc.categorias + 1,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub categoria: &'a str,
    pub items: Vec<&'a RankingProducto>,
}

/// Agrupa o ranking por categoria, na ordem em que cada uma aparece.
pub fn group_by_category(rows: &[RankingProducto]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();

    for row in rows {
        match groups.iter_mut().find(|g| g.categoria == row.categoria) {
            Some(group) => group.items.push(row),
            None => groups.push(CategoryGroup {
                categoria: &row.categoria,
                items: vec![row],
            }),
        }
    }

    groups
}

/// Links "Anterior"/"Siguiente" de uma página.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLinks {
    pub page: u32,
    pub total_pages: u32,
    pub previous: u32,
    pub next: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub out_of_range: bool,
}

impl PaginationLinks {
    pub fn for_envelope<T>(envelope: &PageEnvelope<T>) -> Self {
        let page = envelope.page.max(1);
        let total_pages = envelope.total_pages;
        let out_of_range = envelope.is_out_of_range();

        let previous = if out_of_range {
            total_pages
        } else {
            page.saturating_sub(1).max(1)
        };
        let next = if page < total_pages {
            page + 1
        } else {
            total_pages.max(1)
        };

        Self {
            page,
            total_pages,
            previous,
            next,
            has_previous: page > 1,
            has_next: page < total_pages,
            out_of_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venta(categoria: &str, unidades: i64, ingresos: i64) -> VentasCategoria {
        VentasCategoria {
            categoria: categoria.to_string(),
            total_ventas_unidades: unidades,
            ingresos_totales: Decimal::from(ingresos),
            precio_promedio_producto: Decimal::ONE,
        }
    }

    fn ranking(categoria: &str, producto: &str, rank: i64) -> RankingProducto {
        RankingProducto {
            categoria: categoria.to_string(),
            producto: producto.to_string(),
            unidades: 1,
            ranking_en_categoria: rank,
        }
    }

    #[test]
    fn sales_totals_sum_the_page() {
        let totals = SalesTotals::from_rows(&[venta("A", 3, 600), venta("B", 2, 150)]);
        assert_eq!(totals.ingresos, Decimal::from(750));
        assert_eq!(totals.unidades, 5);
        assert_eq!(totals.categorias, 2);
    }

    #[test]
    fn sales_totals_of_nothing_are_zero() {
        assert_eq!(SalesTotals::from_rows(&[]), SalesTotals::default());
        assert_eq!(SalesTotals::from_rows(&[]).ingresos, Decimal::ZERO);
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let rows = vec![
            ranking("Ropa", "Camisa", 1),
            ranking("Hogar", "Lámpara", 1),
            ranking("Ropa", "Pantalón", 2),
        ];
        let groups = group_by_category(&rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].categoria, "Ropa");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].categoria, "Hogar");
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn links_in_the_middle() {
        let links = PaginationLinks::for_envelope(&PageEnvelope::<u8>::new(vec![], 25, 2, 10));
        assert_eq!((links.previous, links.next), (1, 3));
        assert!(links.has_previous && links.has_next);
        assert!(!links.out_of_range);
    }

    #[test]
    fn links_at_the_edges() {
        let first = PaginationLinks::for_envelope(&PageEnvelope::<u8>::new(vec![], 25, 1, 10));
        assert_eq!(first.previous, 1);
        assert!(!first.has_previous);

        let last = PaginationLinks::for_envelope(&PageEnvelope::<u8>::new(vec![], 25, 3, 10));
        assert_eq!(last.next, 3);
        assert!(!last.has_next);

        let empty = PaginationLinks::for_envelope(&PageEnvelope::<u8>::new(vec![], 0, 1, 10));
        assert_eq!((empty.previous, empty.next), (1, 1));
        assert!(!empty.has_previous && !empty.has_next);
    }

    #[test]
    fn links_past_the_end_point_back_to_last_page() {
        let links = PaginationLinks::for_envelope(&PageEnvelope::<u8>::new(vec![], 25, 9, 10));
        assert!(links.out_of_range);
        assert_eq!(links.previous, 3);
        assert_eq!(links.next, 3);
        assert!(links.has_previous);
        assert!(!links.has_next);
    }
}
