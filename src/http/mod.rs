/*!
The healthcheck endpoint surface.

Two handlers each serve two paths distinguished by a `/live` suffix: the
`/live` variants force a fresh fan-out of every probe, the others read the
background cache.

- `/info/healthcheck[/live]` — the terse probe consumed by load balancers.
- `/private/healthcheck[/live]` — the full component breakdown plus process
  metadata, for operators.

The response code asymmetry is deliberate: the private endpoint fails (500)
when the overall post-clamp status is MAJOR or worse, while info fails only
on OUTAGE. Urgency clamping folds a STRONG dependency's outage down to
MAJOR, so a load balancer only ever pulls a host over a REQUIRED-grade
failure.
*/

pub(crate) mod info;
pub(crate) mod private;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};

use crate::core::dependency::DependencySet;
use crate::core::status::Status;
use crate::core::summary::Summary;

/// Path to the info healthcheck, backed by the cache.
pub const INFO_HEALTHCHECK: &str = "/info/healthcheck";
/// Path to the info healthcheck that forces fresh probes.
pub const INFO_HEALTHCHECK_LIVE: &str = "/info/healthcheck/live";
/// Path to the private healthcheck, backed by the cache.
pub const PRIVATE_HEALTHCHECK: &str = "/private/healthcheck";
/// Path to the private healthcheck that forces fresh probes.
pub const PRIVATE_HEALTHCHECK_LIVE: &str = "/private/healthcheck/live";

// Timestamp rendering shared by both endpoints: millisecond precision with
// a signed numeric zone, e.g. "2017-11-14T20:51:33.000+0900".
pub(crate) const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Handler state: the dependency set plus the app identity captured when the
/// router was built.
#[derive(Clone)]
pub(crate) struct HealthState {
    pub deps: DependencySet,
    pub app_name: String,
    pub started: DateTime<Utc>,
}

/// Build a router serving all four healthcheck paths for `deps`. Merge it
/// into the application router; the app start time reported by the private
/// endpoint is captured here.
pub fn healthcheck_router(app_name: impl Into<String>, deps: DependencySet) -> Router {
    let state = HealthState {
        deps,
        app_name: app_name.into(),
        started: Utc::now(),
    };

    Router::new()
        .route(INFO_HEALTHCHECK, get(info::background))
        .route(INFO_HEALTHCHECK_LIVE, get(info::live))
        .route(PRIVATE_HEALTHCHECK, get(private::background))
        .route(PRIVATE_HEALTHCHECK_LIVE, get(private::live))
        .with_state(state)
}

/// Map a summary's overall verdict onto the HTTP code for one endpoint
/// flavor: private fails on MAJOR or worse, info only on OUTAGE.
pub fn compute_status_code(private: bool, summary: &Summary) -> StatusCode {
    let overall = summary.overall();
    let failing = if private {
        overall.same_or_worse_than(Status::Major)
    } else {
        overall.same_as(Status::Outage)
    };
    if failing {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// The machine hostname, or "unknown".
pub(crate) fn hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
