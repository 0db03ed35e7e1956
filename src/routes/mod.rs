// src/routes/mod.rs

use crate::error::{AppError, AppResult};
use crate::models::Row;
use crate::views::View;
use crate::AppState;

pub mod data;
pub mod health;
pub mod pages;
pub mod tree;

/// Parse the `{n}` path segment. Anything but a plain integer is a 400.
pub fn parse_id(raw: &str) -> AppResult<i64> {
    if raw.is_empty() {
        return Err(AppError::BadRequest("missing bin id".into()));
    }
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("bin id must be an integer, got {raw:?}")))
}

/// Run a view's query against its store, binding `id` if the view takes one.
pub async fn fetch_view(state: &AppState, view: View, id: Option<i64>) -> AppResult<Vec<Row>> {
    let q = view.query();
    let param = if q.binds_id { id } else { None };
    let rows = state.stores.get(q.store).fetch(q.sql, param).await?;
    tracing::debug!(?view, ?id, rows = rows.len(), "view fetched");
    Ok(rows)
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_parse() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-1").unwrap(), -1);
    }

    #[test]
    fn non_integers_are_bad_requests() {
        for raw in ["", "abc", "1.5", "1e3", " 7"] {
            assert!(matches!(parse_id(raw), Err(AppError::BadRequest(_))), "{raw:?}");
        }
    }
}
