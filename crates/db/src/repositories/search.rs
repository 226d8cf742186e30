//! Substring search predicate builder.
//!
//! Folds a typed column list and a normalized `SearchTerm` into one SQL
//! condition. Callers name the searchable columns explicitly; there is no
//! reflection over entity fields.

use comercio_core::catalog::SearchTerm;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, IntoColumnRef};
use sea_orm::Condition;

/// Builds an `ILIKE '%term%'` condition across the given columns.
///
/// The term is escaped so `%`, `_`, and `\` match literally.
pub fn substring_condition<C>(columns: &[C], term: &SearchTerm) -> Condition
where
    C: IntoColumnRef + Copy,
{
    let pattern = format!("%{}%", escape_like(term.as_str()));
    columns.iter().fold(Condition::any(), |cond, col| {
        cond.add(Expr::col(*col).ilike(pattern.clone()))
    })
}

/// Escapes SQL LIKE wildcards in a raw term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::customers;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_condition_is_any_of_columns() {
        let term = SearchTerm::parse("perez").unwrap();
        let cond = substring_condition(
            &[
                (customers::Entity, customers::Column::LastName),
                (customers::Entity, customers::Column::FirstName),
            ],
            &term,
        );
        // Two ILIKE predicates joined with OR
        assert_eq!(format!("{cond:?}").matches("perez").count(), 2);
    }
}
