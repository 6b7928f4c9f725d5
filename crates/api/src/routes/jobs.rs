use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, routing::post, Json, Router};
use chrono::Utc;

use crate::errors;
use crate::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/certificate-refresh", post(run_certificate_refresh))
}

/// Batch job trigger: invoked daily by the external scheduler, and on
/// demand here. Idempotent either way.
async fn run_certificate_refresh(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.refresh_job.run(Utc::now().date_naive()) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}
