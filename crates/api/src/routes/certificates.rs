use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use corrpay_compliance::Certificate;
use corrpay_core::{CertificateId, CorrespondentId};

use crate::dto::{CertificateResponse, RegisterCertificateRequest};
use crate::errors;
use crate::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:id/certificates", post(register_certificate))
}

async fn register_certificate(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<RegisterCertificateRequest>,
) -> axum::response::Response {
    let correspondent_id: CorrespondentId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid correspondent id",
            )
        }
    };

    // Status is derived at creation time from the current date.
    let certificate = Certificate::register(
        CertificateId::new(),
        correspondent_id,
        body.country,
        body.expiry_date,
        Utc::now().date_naive(),
    );

    match services.store.insert_certificate(certificate.clone()) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(CertificateResponse::from_entity(&certificate)),
        )
            .into_response(),
        Err(e) => errors::engine_error_to_response(e.into()),
    }
}
