use axum::http::StatusCode;
use vitals::http::healthcheck_router;
use vitals::{DependencySet, Status, Urgency};

use crate::common::fixed_monitor;
use crate::http::{get, get_json};

async fn deps_with(urgency: Urgency, status: Status) -> DependencySet {
    let deps = DependencySet::new();
    deps.register([fixed_monitor(
        "example-daemon-dependency-check",
        urgency,
        status,
        "synthetic condition",
    )]);
    deps.wait_until_initial_run().await;
    deps
}

#[tokio::test]
async fn live_ok() {
    let deps = deps_with(Urgency::Strong, Status::Ok).await;
    let app = healthcheck_router("test_live", deps);

    let (status, body) = get_json(app, "/info/healthcheck/live").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("OK", body["condition"]);
    assert!(body["hostname"].is_string());
    assert!(body["duration"].is_number());
}

#[tokio::test]
async fn background_ok() {
    let deps = deps_with(Urgency::Strong, Status::Ok).await;
    let app = healthcheck_router("test_background", deps);

    let (status, body) = get_json(app, "/info/healthcheck").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("OK", body["condition"]);
}

#[tokio::test]
async fn major_still_returns_200() {
    let deps = deps_with(Urgency::Strong, Status::Major).await;
    let app = healthcheck_router("test_live", deps);

    let (status, body) = get_json(app, "/info/healthcheck/live").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("MAJOR", body["condition"]);
}

#[tokio::test]
async fn strong_outage_is_clamped_and_avoided() {
    // a STRONG dep at OUTAGE folds to MAJOR, which info does not fail on
    let deps = deps_with(Urgency::Strong, Status::Outage).await;
    let app = healthcheck_router("test_live", deps);

    let (status, body) = get_json(app.clone(), "/info/healthcheck/live").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("MAJOR", body["condition"]);

    let (status, body) = get_json(app, "/info/healthcheck").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("MAJOR", body["condition"]);
}

#[tokio::test]
async fn required_outage_fails() {
    let deps = deps_with(Urgency::Required, Status::Outage).await;
    let app = healthcheck_router("test_live", deps);

    let (status, body) = get_json(app.clone(), "/info/healthcheck/live").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    assert_eq!("OUTAGE", body["condition"]);

    let (status, body) = get_json(app, "/info/healthcheck").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    assert_eq!("OUTAGE", body["condition"]);
}

#[tokio::test]
async fn body_is_pretty_printed_text_plain() {
    let deps = deps_with(Urgency::Required, Status::Ok).await;
    let app = healthcheck_router("test_live", deps);

    let response = {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;
        app.oneshot(
            Request::builder()
                .uri("/info/healthcheck")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    };
    assert_eq!(
        response.headers()[axum::http::header::CONTENT_TYPE],
        "text/plain"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    // two-space indentation, one field per line
    assert!(body.starts_with("{\n  \"condition\""), "body was: {body}");
}

#[tokio::test]
async fn empty_dependency_set_is_ok() {
    let app = healthcheck_router("test_empty", DependencySet::new());
    let (status, body) = get_json(app, "/info/healthcheck").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("OK", body["condition"]);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = healthcheck_router("test_404", DependencySet::new());
    let (status, _) = get(app, "/info/healthcheck/liveness").await;
    assert_eq!(StatusCode::NOT_FOUND, status);
}
