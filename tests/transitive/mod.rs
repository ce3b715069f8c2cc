use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use vitals::transitive::transitive_monitor;
use vitals::{CheckContext, DependencySet, Status, Urgency};

/// Serve `router` on an ephemeral port, returning its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn healthy_upstream_reports_ok() {
    let base = serve(Router::new().route("/health", get(|| async { "ok" }))).await;

    let monitor = transitive_monitor(
        format!("{base}/health"),
        "upstream",
        "checks the upstream service",
        "http://example.com/wiki/upstream",
        Urgency::Strong,
        None,
    );

    let health = monitor.check(&CheckContext::default()).await;
    assert_eq!(Status::Ok, health.status);
    assert_eq!(Urgency::Strong, health.urgency);
    assert_eq!("200 OK", health.message);
}

#[tokio::test]
async fn failing_upstream_reports_outage() {
    let base = serve(Router::new().route(
        "/health",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "nope") }),
    ))
    .await;

    let monitor = transitive_monitor(
        format!("{base}/health"),
        "upstream",
        "checks the upstream service",
        "http://example.com/wiki/upstream",
        Urgency::Required,
        None,
    );

    let health = monitor.check(&CheckContext::default()).await;
    assert_eq!(Status::Outage, health.status);
    assert_eq!("503 Service Unavailable", health.message);
}

#[tokio::test]
async fn unreachable_upstream_reports_outage() {
    // nothing listens here
    let monitor = transitive_monitor(
        "http://127.0.0.1:9/health",
        "black-hole",
        "checks an unreachable service",
        "http://example.com/wiki/black-hole",
        Urgency::Required,
        None,
    );

    let health = monitor.check(&CheckContext::default()).await;
    assert_eq!(Status::Outage, health.status);
    assert!(health
        .message
        .starts_with("error checking transitive monitor: "));
}

#[tokio::test]
async fn registers_like_any_other_monitor() {
    let base = serve(Router::new().route("/health", get(|| async { "ok" }))).await;

    let deps = DependencySet::new();
    deps.register([transitive_monitor(
        format!("{base}/health"),
        "upstream",
        "checks the upstream service",
        "http://example.com/wiki/upstream",
        Urgency::Required,
        None,
    )]);
    deps.wait_until_initial_run().await;

    assert_eq!(Status::Ok, deps.background().overall());
}
