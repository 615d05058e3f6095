//! Host process of the modular monolith.
//!
//! Wires the Users, Inventory, Orders and Payments modules through the
//! service locator and the event bus, and serves their REST endpoints, the
//! contract endpoints used by remote callers, health and Prometheus metrics.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use bootstrap::{AppState, Services, build_event_bus, build_state, build_state_with_bus};
pub use config::{Config, LogFormat};
pub use error::{ApiError, BootstrapError};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/users", get(routes::users::list).post(routes::users::create))
        .route("/users/{id}", get(routes::users::get))
        .route(
            "/inventory",
            get(routes::inventory::list).post(routes::inventory::create),
        )
        .route("/orders", get(routes::orders::list).post(routes::orders::create))
        .route("/orders/{id}", get(routes::orders::get))
        .route(
            "/payments",
            get(routes::payments::list).post(routes::payments::create),
        )
        .route("/payments/{id}", get(routes::payments::get))
        .route(
            "/contracts/{service}/api/{method}",
            post(routes::contracts::call),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
