//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, endpoints, envelope,
    health::{get_db_test, get_health},
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route accepts cross-origin requests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::DB_TEST, get(get_db_test))
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The body of the root route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ApiInfo {
    pub message: String,
    pub version: String,
}

/// Describe the API.
async fn get_root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Tally Backend API".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

async fn get_404_not_found() -> Response {
    envelope::failure(StatusCode::NOT_FOUND, None, "Route not found", None)
}
