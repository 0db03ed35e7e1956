// src/routes/data.rs

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

use super::fetch_view;
use crate::error::AppResult;
use crate::models::{Cell, EventRecord, Row};
use crate::views::View;
use crate::AppState;

/// GET /data
pub async fn events(State(state): State<AppState>) -> AppResult<Json<Vec<EventRecord>>> {
    let rows = fetch_view(&state, View::Events, None).await?;
    Ok(Json(rows.into_iter().map(to_event).collect()))
}

fn to_event(row: Row) -> EventRecord {
    // the query selects exactly these three columns
    let mut cells = row.into_iter();
    let mut next = || cells.next().unwrap_or(Cell::Null);
    EventRecord { category: next(), date: next(), location: next() }
}

/// GET /dataRaw
pub async fn raw_csv(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = fetch_view(&state, View::RawData, None).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], to_csv(&rows)))
}

/// Headerless CSV, CRLF line ends, fields quoted only when they need it.
pub fn to_csv(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        // a bare empty line would read back as a row with no fields
        if let [only] = row.as_slice() {
            let field = only.to_field();
            if field.is_empty() {
                out.push_str("\"\"\r\n");
                continue;
            }
        }
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_field(&mut out, &cell.to_field());
        }
        out.push_str("\r\n");
    }
    out
}

fn push_field(out: &mut String, field: &str) {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
