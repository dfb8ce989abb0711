use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::error::AppError;
use crate::intake::domain::IntakeSubmission;
use crate::intake::geocode::FixedGeocoder;
use crate::intake::router::{assess_handler, intake_router};
use crate::intake::service::IntakeService;

fn router() -> axum::Router {
    intake_router(Arc::new(build_service()))
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn assessment_route_returns_estimate_and_resources() {
    let response = router()
        .oneshot(json_post(
            "/api/v1/intake/assessments",
            json!({
                "profile": { "needs_shelter": true },
                "location": "Lower Manhattan"
            }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["estimate"]["total_amount"], 1000);
    assert_eq!(
        body["estimate"]["explanation_trail"][1]["label"],
        "Temporary housing support: $500"
    );
    assert_eq!(body["location"]["status"], "located");
    assert_eq!(body["resources"][0]["category"], "shelter");
    assert_eq!(body["resources"][1]["category"], "legal");
    assert_eq!(
        body["resources"][0]["entries"][0]["resource"]["name"],
        "Safe Haven Shelter"
    );
    assert!(body["notices"].as_array().expect("notices").is_empty());
}

#[tokio::test]
async fn assessment_route_reports_unresolved_location() {
    let response = router()
        .oneshot(json_post(
            "/api/v1/intake/assessments",
            json!({ "profile": {}, "location": "Atlantis" }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["estimate"]["total_amount"], 500);
    assert_eq!(body["location"]["status"], "unresolved");
    assert_eq!(body["location"]["reason"], "not_found");
    assert_eq!(body["notices"][0], "unable_to_locate");
}

#[tokio::test]
async fn assess_handler_returns_service_unavailable_when_catalog_is_down() {
    let service = Arc::new(IntakeService::new(
        Arc::new(UnavailableCatalog),
        Arc::new(FixedGeocoder::new()),
        settings(),
    ));

    let error = assess_handler::<UnavailableCatalog, FixedGeocoder>(
        State(service),
        Ok(axum::Json(IntakeSubmission {
            location: "40.7128, -74.0060".to_string(),
            ..IntakeSubmission::default()
        })),
    )
    .await
    .expect_err("catalog failure surfaces");
    assert!(matches!(error, AppError::Catalog(_)));

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("unavailable"));
}

#[tokio::test]
async fn estimate_route_scores_profile_only() {
    let response = router()
        .oneshot(json_post(
            "/api/v1/intake/estimate",
            json!({
                "needs_financial": true,
                "financial_amount_requested": 2000,
                "unemployed": true
            }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_amount"], 3100);
    assert_eq!(
        body["explanation_trail"]
            .as_array()
            .expect("trail")
            .len(),
        3
    );
}

#[tokio::test]
async fn resources_route_returns_duplicate_groups() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/resources?lat=40.7128&lon=-74.0060&category=legal,legal")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let groups = body["resources"].as_array().expect("resources");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["category"], "legal");
    assert_eq!(groups[1]["category"], "legal");
    assert_eq!(body["origin_valid"], true);
}

#[tokio::test]
async fn resources_route_rejects_unknown_category() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/resources?lat=40.7128&lon=-74.0060&category=spa")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().expect("error").contains("spa"));
}

#[tokio::test]
async fn resources_route_returns_empty_for_out_of_range_origin() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/resources?lat=200&lon=-74.0060")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["origin_valid"], false);
    assert!(body["resources"].as_array().expect("resources").is_empty());
}

#[tokio::test]
async fn estimate_route_coerces_form_text_amount() {
    let response = router()
        .oneshot(json_post(
            "/api/v1/intake/estimate",
            json!({
                "needs_financial": true,
                "financial_amount_requested": "$1,200"
            }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_amount"], 1700);
    assert_eq!(
        body["explanation_trail"][1]["label"],
        "Requested financial assistance: $1200"
    );
}

#[tokio::test]
async fn estimate_route_rejects_malformed_amounts_as_json() {
    for amount in [json!("a lot"), json!(-5)] {
        let response = router()
            .oneshot(json_post(
                "/api/v1/intake/estimate",
                json!({
                    "needs_financial": true,
                    "financial_amount_requested": amount
                }),
            ))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert!(
            body["error"]
                .as_str()
                .expect("error message")
                .contains("not a valid non-negative dollar amount"),
            "got {body}"
        );
    }
}

#[tokio::test]
async fn assessment_route_coerces_form_text_amount() {
    let response = router()
        .oneshot(json_post(
            "/api/v1/intake/assessments",
            json!({
                "profile": { "needs_financial": true, "financial_amount_requested": "800" },
                "location": ""
            }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["estimate"]["total_amount"], 1300);
}

#[tokio::test]
async fn resources_route_reports_malformed_query_as_json() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/resources?lat=abc&lon=-74.0060")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .starts_with("invalid request"));
}
