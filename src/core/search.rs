//! Name filters for the list endpoints.
//!
//! Search terms come straight from the query string, so LIKE wildcards in them are
//! escaped and always match literally.

use sea_orm::{ColumnTrait, sea_query::{LikeExpr, SimpleExpr}};

const ESCAPE: char = '\\';

/// Builds a `%term%` pattern with `%`, `_` and the escape character made literal.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            pattern.push(ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Matches rows whose `column` contains `term` literally, ignoring ASCII case on SQLite.
pub fn name_contains<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    column.like(LikeExpr::new(contains_pattern(term)).escape(ESCAPE))
}

/// The trimmed search term, or `None` when it is absent or blank.
#[must_use]
pub fn search_term(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|term| !term.is_empty())
}
