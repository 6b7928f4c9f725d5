use axum::Router;

pub mod certificates;
pub mod invoicing;
pub mod jobs;
pub mod liquidations;
pub mod payments;

pub fn router() -> Router {
    Router::new()
        .nest("/correspondents", certificates::router())
        .nest("/liquidations", liquidations::router())
        .nest("/payment-requests", payments::router())
        .nest("/invoice-payloads", invoicing::router())
        .nest("/jobs", jobs::router())
}
