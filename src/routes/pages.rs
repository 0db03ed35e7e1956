// src/routes/pages.rs
//
// Chart pages are pre-built HTML files; the server only hands them out.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;

/// (route, file under the template dir)
pub const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/treemap", "treemap.html"),
    ("/barchart", "barchart.html"),
    ("/sunburst", "sunburst.html"),
    ("/sunburstO", "sunburstO.html"),
    ("/after/", "after.html"),
];

pub fn router(template_dir: &Path, static_dir: &Path) -> Router<AppState> {
    let router = PAGES.iter().fold(Router::new(), |router, (route, file)| {
        router.route_service(route, ServeFile::new(template_dir.join(file)))
    });
    router.nest_service("/static", ServeDir::new(static_dir))
}
