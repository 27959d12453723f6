//! # Integration Tests for tracking-api
//!
//! Drives the assembled router with `oneshot` requests: health probes,
//! issuance success and validation failures, unique-key conflicts,
//! record lookup, metrics, and OpenAPI generation.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower::ServiceExt;

use tracking_api::state::{AppConfig, AppState};
use tracking_core::{FixedClock, TimestampGenerator, TrackingNumber, TrackingNumberGenerator};

const VALID_QUERY: &str = "origin_country_id=US&destination_country_id=CA&weight=2.500\
&customer_id=de619854-b59b-425e-9db4-943979e1bd49\
&customer_name=RedBox%20Logistics&customer_slug=redbox-logistics";

/// Helper: build the test app with the system clock and an in-memory store.
fn test_app() -> axum::Router {
    tracking_api::app(AppState::new())
}

/// Helper: state with a pinned clock and seeded generator.
fn pinned_state() -> AppState {
    let clock = Arc::new(FixedClock::at_unix(1_700_000_000).unwrap());
    let generator = TimestampGenerator::new(clock.clone(), StdRng::seed_from_u64(42));
    AppState::from_parts(AppConfig::default(), Arc::new(generator), clock, None)
}

/// Always hands out the same number.
struct ConstantGenerator(TrackingNumber);

impl TrackingNumberGenerator for ConstantGenerator {
    fn generate(&self) -> TrackingNumber {
        self.0.clone()
    }
}

/// Helper: GET a URI against a router.
async fn get(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn next_uri(query: &str) -> String {
    format!("/v1/tracking-numbers/next?{query}")
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = get(&test_app(), "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = get(&test_app(), "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Issuance -----------------------------------------------------------------

#[tokio::test]
async fn test_issue_returns_tracking_number_and_timestamp() {
    let app = test_app();
    let response = get(&app, &next_uri(VALID_QUERY)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let number = body["tracking_number"].as_str().unwrap();
    assert!(number.starts_with("TR"));
    assert!(number.len() <= 16);
    assert!(number.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

    let created_at = body["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
    assert!(created_at.ends_with("+00:00"));
}

#[tokio::test]
async fn test_issue_with_pinned_clock_is_deterministic() {
    let app = tracking_api::app(pinned_state());
    let body = body_json(get(&app, &next_uri(VALID_QUERY)).await).await;
    let number = body["tracking_number"].as_str().unwrap();
    assert_eq!(&number[..12], "TR1700000000");
    assert_eq!(number.len(), 16);
    assert_eq!(body["created_at"], "2023-11-14T22:13:20.000000+00:00");
}

#[tokio::test]
async fn test_missing_fields_report_every_failure() {
    let response = get(&test_app(), "/v1/tracking-numbers/next").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let details = body["error"]["details"].as_object().unwrap();
    let mut fields: Vec<_> = details.keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(
        fields,
        vec![
            "customer_name",
            "customer_slug",
            "destination_country_id",
            "origin_country_id",
            "weight"
        ]
    );
    assert_eq!(details["weight"], "Weight must be a valid decimal number.");
    assert_eq!(details["customer_name"], "Customer name cannot be empty.");
}

#[tokio::test]
async fn test_field_examples() {
    let cases: &[(&str, &str, Option<&str>)] = &[
        ("origin_country_id", "us", Some("origin_country_id")),
        ("origin_country_id", "USA", Some("origin_country_id")),
        ("origin_country_id", "US", None),
        ("weight", "-1.000", Some("weight")),
        ("weight", "2.5", Some("weight")),
        ("weight", "abc", Some("weight")),
        ("weight", "2.500", None),
        ("customer_slug", "Customer-Slug", Some("customer_slug")),
        ("customer_slug", "customer--slug", Some("customer_slug")),
        ("customer_slug", "customer-slug-2", None),
    ];

    for (field, value, failing) in cases {
        let mut params: Vec<(String, String)> = vec![
            ("origin_country_id".into(), "US".into()),
            ("destination_country_id".into(), "CA".into()),
            ("weight".into(), "2.500".into()),
            ("customer_name".into(), "RedBox%20Logistics".into()),
            ("customer_slug".into(), "redbox-logistics".into()),
        ];
        for (k, v) in params.iter_mut() {
            if k.as_str() == *field {
                *v = value.to_string();
            }
        }
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let response = get(&test_app(), &next_uri(&query)).await;
        match failing {
            None => assert_eq!(response.status(), StatusCode::OK, "{field}={value}"),
            Some(expected) => {
                assert_eq!(
                    response.status(),
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "{field}={value}"
                );
                let body = body_json(response).await;
                let details = body["error"]["details"].as_object().unwrap();
                assert_eq!(details.len(), 1, "{field}={value}: {details:?}");
                assert!(details.contains_key(*expected));
            }
        }
    }
}

#[tokio::test]
async fn test_weight_messages_distinguish_causes() {
    let app = test_app();
    let abc = body_json(get(&app, &next_uri(&VALID_QUERY.replace("2.500", "abc"))).await).await;
    let short = body_json(get(&app, &next_uri(&VALID_QUERY.replace("2.500", "2.5"))).await).await;
    assert_eq!(
        abc["error"]["details"]["weight"],
        "Weight must be a valid decimal number."
    );
    assert_eq!(
        short["error"]["details"]["weight"],
        "Weight must be a positive decimal number up to three decimal places."
    );
}

#[tokio::test]
async fn test_overflowing_weight_is_internal_error() {
    let app = test_app();
    let response = get(&app, &next_uri(&VALID_QUERY.replace("2.500", "1000.000"))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_weight_rounding_to_zero_is_internal_error() {
    let state = pinned_state();
    let app = tracking_api::app(state.clone());
    let response = get(&app, &next_uri(&VALID_QUERY.replace("2.500", "0.0004"))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(state.tracking_numbers.is_empty());
}

#[tokio::test]
async fn test_exponent_weight_is_not_a_number() {
    let response = get(&test_app(), &next_uri(&VALID_QUERY.replace("2.500", "1.500e3"))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(
        body["error"]["details"]["weight"],
        "Weight must be a valid decimal number."
    );
}

#[tokio::test]
async fn test_duplicate_query_key_is_bad_request() {
    let response = get(
        &test_app(),
        &next_uri(&format!("{VALID_QUERY}&weight=3.000")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Conflicts ----------------------------------------------------------------

#[tokio::test]
async fn test_colliding_number_is_conflict() {
    let clock = Arc::new(FixedClock::at_unix(1_700_000_000).unwrap());
    let fixed = TrackingNumber::parse("TR1700000000AAAA").unwrap();
    let state = AppState::from_parts(
        AppConfig::default(),
        Arc::new(ConstantGenerator(fixed)),
        clock,
        None,
    );
    let app = tracking_api::app(state.clone());

    assert_eq!(get(&app, &next_uri(VALID_QUERY)).await.status(), StatusCode::OK);
    let response = get(&app, &next_uri(VALID_QUERY)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");

    assert_eq!(state.tracking_numbers.len(), 1);
    let snapshot = state.metrics.snapshot();
    assert_eq!(snapshot.issued, 1);
    assert_eq!(snapshot.conflicts, 1);
}

// -- Lookup -------------------------------------------------------------------

#[tokio::test]
async fn test_issued_number_can_be_fetched() {
    let app = tracking_api::app(pinned_state());
    let issued = body_json(get(&app, &next_uri(VALID_QUERY)).await).await;
    let number = issued["tracking_number"].as_str().unwrap();

    let response = get(&app, &format!("/v1/tracking-numbers/{number}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["tracking_number"], number);
    assert_eq!(record["created_at"], issued["created_at"]);
    assert_eq!(record["origin_country_id"], "US");
    assert_eq!(record["destination_country_id"], "CA");
    assert_eq!(record["weight"], "2.500");
    assert_eq!(record["customer_name"], "RedBox Logistics");
    assert_eq!(record["customer_slug"], "redbox-logistics");
    assert_ne!(record["customer_id"], "de619854-b59b-425e-9db4-943979e1bd49");
}

#[tokio::test]
async fn test_unknown_number_is_not_found() {
    let app = test_app();
    let response = get(&app, "/v1/tracking-numbers/TR0000000000ZZZZ").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/v1/tracking-numbers/THIS-IS-FAR-TOO-LONG-TO-BE-ISSUED").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Metrics ------------------------------------------------------------------

#[tokio::test]
async fn test_metrics_count_requests_and_errors() {
    let app = test_app();
    get(&app, &next_uri(VALID_QUERY)).await;
    get(&app, "/v1/tracking-numbers/next").await;

    let snapshot = body_json(get(&app, "/v1/metrics").await).await;
    assert_eq!(snapshot["issued"], 1);
    assert_eq!(snapshot["errors"], 1);
    // The metrics request itself is counted after its response is built.
    assert_eq!(snapshot["requests"], 2);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_served() {
    let response = get(&test_app(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/v1/tracking-numbers/next"]["get"].is_object());
}
