/*!
Monitors wrap a user-supplied probe with identity, cadence, and bookkeeping.

A [`Monitor`] owns one [`HealthCheck`] probe plus the metadata the endpoints
report about it: a unique name, a description, a documentation link, an
[`Urgency`], a per-run timeout, and the cadence its background scheduler runs
on. It also tracks running statistics across checks: the previous health, the
last time the probe reported OK, and the consecutive-failure count.

Probes receive a [`CheckContext`] carrying a cancellation token and the
deadline of the current run. A probe that blocks on I/O should select against
`ctx.cancelled()` so that timeouts release resources promptly; the caller's
correctness does not depend on it (an overdue probe is simply abandoned).
*/

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::health::Health;
use crate::core::status::Status;
use crate::core::urgency::Urgency;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_PERIOD: Duration = Duration::from_secs(30);

/// Cancellation and deadline handle handed to every probe run.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CheckContext {
    pub(crate) fn with_deadline(token: CancellationToken, deadline: Instant) -> CheckContext {
        CheckContext {
            token,
            deadline: Some(deadline),
        }
    }

    /// Resolves when the run is cancelled, either because the deadline
    /// expired or because the owning dependency set is shutting down.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Deadline of the current run, when one was set by the scheduler.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// A probe that answers "is this dependency healthy?".
///
/// The returned [`Health`] only needs `status` and `message` populated; the
/// owning monitor stamps time, duration, and urgency.
#[async_trait::async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    async fn check(&self, ctx: &CheckContext) -> Health;
}

/// Adapt an async closure into a [`HealthCheck`].
pub fn check_fn<F, Fut>(f: F) -> CheckFn<F>
where
    F: Fn(CheckContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Health> + Send + 'static,
{
    CheckFn(f)
}

/// See [`check_fn`].
pub struct CheckFn<F>(F);

#[async_trait::async_trait]
impl<F, Fut> HealthCheck for CheckFn<F>
where
    F: Fn(CheckContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Health> + Send + 'static,
{
    async fn check(&self, ctx: &CheckContext) -> Health {
        (self.0)(ctx.clone()).await
    }
}

/// Change notification published on a monitor's status channel after every
/// check. Delivery is best effort: the send never blocks and is dropped when
/// the channel is full.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Name of the monitor that ran.
    pub monitor: String,
    /// Status before this check.
    pub previous: Status,
    /// Health produced by this check.
    pub next: Health,
}

/// Optional monitor configuration. The defaults are a 60 second timeout and
/// a 30 second period; a zero period disables background scheduling entirely
/// (the monitor then only runs on live checks after its initial one-shot).
pub struct MonitorOptions {
    pub timeout: Duration,
    pub period: Duration,
    pub status_tx: Option<mpsc::Sender<HealthStatus>>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        MonitorOptions {
            timeout: DEFAULT_TIMEOUT,
            period: DEFAULT_PERIOD,
            status_tx: None,
        }
    }
}

struct MonitorState {
    previous: Health,
    last_ok: DateTime<Utc>,
    failed: u32,
}

/// The scheduled unit owning one probe and its metadata.
pub struct Monitor {
    name: String,
    timeout: Duration,
    period: Duration,
    description: String,
    doc_url: String,
    urgency: Urgency,
    checker: Box<dyn HealthCheck>,
    status_tx: Option<mpsc::Sender<HealthStatus>>,

    // previous / last_ok / failed, guarded together
    state: Mutex<MonitorState>,
}

impl Monitor {
    /// Create a monitor with default timeout and period.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        doc_url: impl Into<String>,
        urgency: Urgency,
        checker: impl HealthCheck,
    ) -> Arc<Monitor> {
        Monitor::with_options(
            name,
            description,
            doc_url,
            urgency,
            checker,
            MonitorOptions::default(),
        )
    }

    /// Create a monitor, overriding timeout, period, or attaching a status
    /// channel through [`MonitorOptions`].
    pub fn with_options(
        name: impl Into<String>,
        description: impl Into<String>,
        doc_url: impl Into<String>,
        urgency: Urgency,
        checker: impl HealthCheck,
        options: MonitorOptions,
    ) -> Arc<Monitor> {
        Arc::new(Monitor {
            name: name.into(),
            timeout: options.timeout,
            period: options.period,
            description: description.into(),
            doc_url: doc_url.into(),
            urgency,
            checker: Box::new(checker),
            status_tx: options.status_tx,
            state: Mutex::new(MonitorState {
                // urgency stays Unknown until the first real check stamps it
                previous: Health::new(Status::Ok, "starting up"),
                last_ok: DateTime::<Utc>::UNIX_EPOCH,
                failed: 0,
            }),
        })
    }

    /// Run the probe once and record the outcome.
    ///
    /// The returned health carries this monitor's urgency, the start time of
    /// the probe, and the elapsed duration. `last_ok` advances only on an OK
    /// result; any other status increments the consecutive-failure count.
    pub async fn check(&self, ctx: &CheckContext) -> Health {
        let started = Utc::now();
        let clock = Instant::now();

        let mut next = self.checker.check(ctx).await;

        let ended = Utc::now();
        next.urgency = self.urgency;
        next.time = started;
        next.duration = clock.elapsed();

        let previous = {
            let mut state = self.state.lock().expect("monitor state poisoned");
            if next.status.same_as(Status::Ok) {
                state.last_ok = ended;
                state.failed = 0;
            } else {
                state.failed += 1;
            }
            std::mem::replace(&mut state.previous, next.clone())
        };

        self.publish(previous.status, &next);
        next
    }

    // Best-effort notification: try_send and move on. The subscription must
    // never become a back-pressure point for the probe.
    fn publish(&self, previous: Status, next: &Health) {
        let Some(tx) = &self.status_tx else {
            return;
        };
        let _ = tx.try_send(HealthStatus {
            monitor: self.name.clone(),
            previous,
            next: next.clone(),
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// How long a single check may run before it is counted as an outage.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Background cadence; zero means never scheduled.
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn documentation(&self) -> &str {
        &self.doc_url
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// When this monitor last reported OK; the Unix epoch until it has.
    pub fn last_ok(&self) -> DateTime<Utc> {
        self.state.lock().expect("monitor state poisoned").last_ok
    }

    /// Consecutive failures since the last OK; zero while healthy.
    pub fn failed(&self) -> u32 {
        self.state.lock().expect("monitor state poisoned").failed
    }

    /// Health recorded by the most recent check, or the "starting up"
    /// placeholder before the first one.
    pub fn previous(&self) -> Health {
        self.state
            .lock()
            .expect("monitor state poisoned")
            .previous
            .clone()
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("name", &self.name)
            .field("urgency", &self.urgency)
            .field("timeout", &self.timeout)
            .field("period", &self.period)
            .finish()
    }
}
