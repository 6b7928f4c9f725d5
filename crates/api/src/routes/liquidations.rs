use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use corrpay_core::{CorrespondentId, LiquidationId};
use corrpay_liquidations::Liquidation;

use crate::dto::{self, LiquidationResponse, RegisterLiquidationRequest};
use crate::errors;
use crate::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_liquidation))
        .route("/:id", get(get_liquidation))
        .route("/:id/submit", post(submit))
        .route("/:id/approve", post(approve))
        .route("/:id/reject", post(reject))
        .route("/:id/request-payment", post(request_payment))
}

async fn register_liquidation(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterLiquidationRequest>,
) -> axum::response::Response {
    let correspondent_id: CorrespondentId = match body.correspondent_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid correspondent_id",
            )
        }
    };

    let id = LiquidationId::new();
    let now = Utc::now();

    let result = match body.status.as_deref() {
        // Legacy import: lenient status decode at this boundary only.
        Some(raw) => {
            let status = dto::decode_legacy_status(raw);
            match Liquidation::register(id, correspondent_id, body.amount, &body.currency, now) {
                Ok(liquidation) => services
                    .liquidations
                    .import(liquidation.with_status(status))
                    .and_then(|_| services.liquidations.get(id)),
                Err(e) => Err(e.into()),
            }
        }
        None => services
            .liquidations
            .register(id, correspondent_id, body.amount, &body.currency, now),
    };

    match result {
        Ok(liquidation) => (
            StatusCode::CREATED,
            Json(LiquidationResponse::from_entity(&liquidation)),
        )
            .into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

async fn get_liquidation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: LiquidationId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"),
    };
    match services.liquidations.get(id) {
        Ok(l) => Json(LiquidationResponse::from_entity(&l)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, &id, |s, id| s.liquidations.submit(id))
}

async fn approve(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, &id, |s, id| s.liquidations.approve(id))
}

async fn reject(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    transition(&services, &id, |s, id| s.liquidations.reject(id))
}

async fn request_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let liquidation_id: LiquidationId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"),
    };
    let request_id = corrpay_core::PaymentRequestId::new();
    match services
        .payments
        .request_payment(request_id, liquidation_id, Utc::now())
    {
        Ok(request) => (
            StatusCode::CREATED,
            Json(crate::dto::PaymentRequestResponse::from_entity(&request, None)),
        )
            .into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

fn transition(
    services: &AppServices,
    raw_id: &str,
    op: impl FnOnce(
        &AppServices,
        LiquidationId,
    ) -> corrpay_engine::EngineResult<corrpay_liquidations::Liquidation>,
) -> axum::response::Response {
    let id: LiquidationId = match raw_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"),
    };
    match op(services, id) {
        Ok(l) => Json(LiquidationResponse::from_entity(&l)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}
