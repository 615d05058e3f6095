//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics::{Unit, describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusHandle;

/// Registers help text for the metrics the modules emit.
///
/// Call once after the recorder is installed.
pub fn describe() {
    describe_counter!(
        "event_bus_published_total",
        "Domain events published, by topic"
    );
    describe_counter!(
        "event_bus_listener_failures_total",
        "Local listener invocations that returned an error"
    );
    describe_counter!(
        "event_bus_broker_retries_total",
        "Broker sends retried after a failure"
    );
    describe_counter!(
        "locator_resolutions_total",
        "Contract handles built by the service locator, by binding"
    );
    describe_counter!(
        "remote_calls_total",
        "Contract calls made through the network adapter, by outcome"
    );
    describe_histogram!(
        "remote_call_duration_seconds",
        Unit::Seconds,
        "Round-trip time of contract calls made through the network adapter"
    );
    describe_counter!(
        "inventory_reservations_total",
        "Successful stock reservations"
    );
    describe_counter!(
        "inventory_reservation_rejections_total",
        "Reservations rejected for insufficient stock"
    );
    describe_counter!("orders_created_total", "Orders placed");
    describe_counter!("orders_paid_total", "Orders moved from pending to paid");
    describe_counter!("payments_completed_total", "Payments completed");
    describe_counter!("users_created_total", "Users registered");
}

/// GET /metrics — returns Prometheus-formatted metrics.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
