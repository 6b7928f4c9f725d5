use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use chrono::Utc;

use corrpay_invoicing::{attachment_count, build, fx_summary, SAP_LINK_TEMPLATE_KEY};

use crate::dto::{BuildPayloadRequest, BuildPayloadResponse, SapLinkTemplateRequest};
use crate::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(build_payload))
        .route("/sap-link-template", put(set_sap_link_template))
}

/// Build the SAP invoice payload from in-memory decisions and intake items.
/// No IO: never fails over a single unresolved rate.
async fn build_payload(Json(body): Json<BuildPayloadRequest>) -> axum::response::Response {
    let payload = build(&body.decisions, &body.items, Utc::now());
    let response = BuildPayloadResponse {
        attachment_count: attachment_count(&payload),
        fx_summary: fx_summary(&payload),
        payload,
    };
    Json(response).into_response()
}

async fn set_sap_link_template(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<SapLinkTemplateRequest>,
) -> axum::response::Response {
    services.settings.set(SAP_LINK_TEMPLATE_KEY, &body.template);
    StatusCode::NO_CONTENT.into_response()
}
