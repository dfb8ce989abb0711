use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use support_intake::intake::{intake_router, Geocoder, IntakeService, ResourceCatalog};

/// Always-on national crisis contacts, shown regardless of assessment output.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct Hotline {
    pub(crate) name: &'static str,
    pub(crate) contact: &'static str,
    pub(crate) availability: &'static str,
}

pub(crate) const NATIONAL_HOTLINES: &[Hotline] = &[
    Hotline {
        name: "National Domestic Violence Hotline",
        contact: "1-800-799-7233 or text START to 88788",
        availability: "24/7",
    },
    Hotline {
        name: "988 Suicide & Crisis Lifeline",
        contact: "call or text 988",
        availability: "24/7",
    },
    Hotline {
        name: "Emergency services",
        contact: "911",
        availability: "immediate danger",
    },
];

pub(crate) fn with_intake_routes<C, G>(service: Arc<IntakeService<C, G>>) -> axum::Router
where
    C: ResourceCatalog + 'static,
    G: Geocoder + 'static,
{
    intake_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/hotlines", axum::routing::get(hotlines_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn hotlines_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "hotlines": NATIONAL_HOTLINES }))
}
