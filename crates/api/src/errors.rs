use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use corrpay_core::DomainError;
use corrpay_engine::EngineError;
use corrpay_store::StoreError;

/// Map an engine failure to an HTTP response.
pub fn engine_error_to_response(err: EngineError) -> axum::response::Response {
    match err {
        EngineError::Domain(domain) => match domain {
            DomainError::Validation(msg) => {
                json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
            }
            DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
            DomainError::MissingReference => json_error(
                StatusCode::BAD_REQUEST,
                "missing_reference",
                domain.to_string(),
            ),
            DomainError::InvalidTransition { .. } => json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_transition",
                domain.to_string(),
            ),
            DomainError::CertificateGateBlocked { ref certificate_ids } => {
                let ids: Vec<String> = certificate_ids.iter().map(|id| id.to_string()).collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    axum::Json(json!({
                        "error": "certificate_gate_blocked",
                        "message": domain.to_string(),
                        "certificate_ids": ids,
                    })),
                )
                    .into_response()
            }
            DomainError::MissingExchangeRate { .. } => json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_exchange_rate",
                domain.to_string(),
            ),
            DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
            DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        },
        EngineError::Store(store) => match store {
            StoreError::Concurrency(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
            StoreError::AlreadyExists(msg) => {
                json_error(StatusCode::CONFLICT, "already_exists", msg)
            }
            StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
            StoreError::Unavailable(msg) => {
                json_error(StatusCode::BAD_GATEWAY, "store_unavailable", msg)
            }
        },
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_map_to_409() {
        let resp =
            engine_error_to_response(StoreError::Concurrency("stale read".to_string()).into());
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_transition_maps_to_422() {
        let resp = engine_error_to_response(
            DomainError::invalid_transition("draft", "paid").into(),
        );
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn store_unavailable_maps_to_502() {
        let resp =
            engine_error_to_response(StoreError::Unavailable("down".to_string()).into());
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
