/*!
Liveness and readiness reporting for long-running services.

Register named [`Monitor`]s on a [`DependencySet`]; each one probes a
dependency on its own cadence, bounded by a per-monitor timeout. Results are
cached, clamped by each monitor's [`Urgency`], and served as JSON from two
pairs of HTTP endpoints — a terse one for load balancers and a detailed one
for operators (see [`http::healthcheck_router`]).

The [`count`] and [`gauge`] modules are standalone accumulators that turn
streams of measurements into [`Health`] verdicts through declarative
thresholds; surface them through your own monitors.

```no_run
use std::time::Duration;
use vitals::{check_fn, DependencySet, Health, Monitor, MonitorOptions, Status, Urgency};

# async fn demo() {
let deps = DependencySet::new();
deps.register([Monitor::with_options(
    "postgres",
    "primary database connectivity",
    "https://example.com/runbook/postgres",
    Urgency::Required,
    check_fn(|_ctx| async { Health::new(Status::Ok, "select 1 ok") }),
    MonitorOptions {
        period: Duration::from_secs(15),
        ..MonitorOptions::default()
    },
)]);

let app = axum::Router::new().merge(vitals::http::healthcheck_router("my-app", deps));
# let _ = app;
# }
```
*/

pub mod core;
pub mod count;
pub mod gauge;
pub mod http;

#[cfg(feature = "transitive")]
pub mod transitive;

pub use crate::core::dependency::DependencySet;
pub use crate::core::health::Health;
pub use crate::core::monitor::{
    check_fn, CheckContext, CheckFn, HealthCheck, HealthStatus, Monitor, MonitorOptions,
};
pub use crate::core::status::Status;
pub use crate::core::summary::{CheckResult, Summary};
pub use crate::core::urgency::Urgency;
