use std::sync::Arc;

use corrpay_api::app::build_app;
use corrpay_api::services::AppServices;

#[tokio::main]
async fn main() {
    corrpay_observability::init();

    let services = Arc::new(AppServices::in_memory());
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
