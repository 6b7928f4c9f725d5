use std::sync::Arc;

use axum::{extract::Extension, Router};

use crate::routes;
use crate::services::AppServices;

/// Assemble the application router with shared services.
pub fn build_app(services: Arc<AppServices>) -> Router {
    routes::router().layer(Extension(services))
}
