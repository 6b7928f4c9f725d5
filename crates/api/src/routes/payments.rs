use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use corrpay_core::{OperatorId, PaymentRequestId};
use corrpay_invoicing::{build_deep_link, SAP_LINK_TEMPLATE_KEY};
use corrpay_payments::PaymentRequest;

use crate::dto::{CompletePaymentRequest, PaymentRequestResponse, StartPaymentRequest};
use crate::errors;
use crate::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(get_request))
        .route("/:id/start", post(start))
        .route("/:id/complete", post(complete))
        .route("/:id/reject", post(reject))
}

async fn get_request(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PaymentRequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"),
    };
    match services.payments.get(id) {
        Ok(r) => {
            let link = sap_link(&services, &r);
            Json(PaymentRequestResponse::from_entity(&r, link)).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

async fn start(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<StartPaymentRequest>,
) -> axum::response::Response {
    let id: PaymentRequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"),
    };
    let operator: OperatorId = match body.operator_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid operator_id")
        }
    };
    match services.payments.start(id, operator) {
        Ok(r) => Json(PaymentRequestResponse::from_entity(&r, None)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

async fn complete(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<CompletePaymentRequest>,
) -> axum::response::Response {
    let id: PaymentRequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"),
    };
    match services.payments.complete(id, body.note.as_deref()) {
        Ok((request, _liquidation)) => {
            let link = sap_link(&services, &request);
            Json(PaymentRequestResponse::from_entity(&request, link)).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

async fn reject(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PaymentRequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"),
    };
    match services.payments.reject(id) {
        Ok(r) => Json(PaymentRequestResponse::from_entity(&r, None)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

/// Deep link for a paid request's settlement reference, when a template is
/// configured.
fn sap_link(services: &AppServices, request: &PaymentRequest) -> Option<String> {
    let reference = request.notes()?;
    let template = services.settings.get(SAP_LINK_TEMPLATE_KEY);
    build_deep_link(reference, template.as_deref())
}
