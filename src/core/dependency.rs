/*!
The dependency scheduler and its result cache.

A [`DependencySet`] owns every registered [`Monitor`] and a cache of the most
recent [`CheckResult`] per monitor. Each periodic monitor runs on its own
background task and pushes results into the cache; readers never wait on a
probe. [`DependencySet::live`] fans out one fresh check per monitor and waits
for all of them, [`DependencySet::background`] snapshots the cache.

Every result is downgraded at ingestion: the cache never holds a raw status,
so live and background readers both observe the urgency-clamped view.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, Notify};
use tokio::time::Instant as TokioInstant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::health::Health;
use crate::core::monitor::{CheckContext, Monitor};
use crate::core::status::Status;
use crate::core::summary::{CheckResult, Summary};

/// Registers monitors, runs each on its own cadence, and produces live or
/// cached snapshots. Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct DependencySet {
    inner: Arc<Inner>,
}

struct Inner {
    // Guards the map structure only, never a monitor's internal state.
    state: RwLock<MonitorMaps>,
    token: CancellationToken,
    initial_run: Latch,
}

#[derive(Default)]
struct MonitorMaps {
    monitors: HashMap<String, Arc<Monitor>>,
    cached: HashMap<String, CheckResult>,
}

impl Default for DependencySet {
    fn default() -> Self {
        DependencySet::new()
    }
}

impl DependencySet {
    /// Create an empty set owning its own root cancellation token.
    pub fn new() -> DependencySet {
        DependencySet::with_token(CancellationToken::new())
    }

    /// Create an empty set whose schedulers stop when `token` is cancelled.
    pub fn with_token(token: CancellationToken) -> DependencySet {
        DependencySet {
            inner: Arc::new(Inner {
                state: RwLock::new(MonitorMaps::default()),
                token,
                initial_run: Latch::new(),
            }),
        }
    }

    /// Register monitors and start their schedulers. Must be called from
    /// within a tokio runtime.
    ///
    /// Each monitor is seeded into the cache with an OUTAGE "healthcheck has
    /// not run yet" sentinel, then checked once immediately on a background
    /// task. Monitors with a non-zero period keep re-running on their own
    /// ticker; a zero-period monitor runs only that once and afterwards
    /// refreshes exclusively through [`DependencySet::live`].
    pub fn register<I>(&self, monitors: I)
    where
        I: IntoIterator<Item = Arc<Monitor>>,
    {
        for monitor in monitors {
            let sentinel = fresh(&monitor);
            self.inner.update(&monitor, sentinel);
            self.inner.initial_run.add(1);
            debug!(monitor = monitor.name(), period_s = monitor.period().as_secs(), "registered healthcheck monitor");

            let inner = Arc::clone(&self.inner);
            let period = monitor.period();
            if period > Duration::ZERO {
                tokio::spawn(async move {
                    run(&inner, &monitor, Utc::now()).await;
                    inner.initial_run.done();

                    let mut ticker =
                        tokio::time::interval_at(TokioInstant::now() + period, period);
                    loop {
                        tokio::select! {
                            _ = inner.token.cancelled() => {
                                debug!(monitor = monitor.name(), "healthcheck scheduler stopped");
                                return;
                            }
                            _ = ticker.tick() => {
                                run(&inner, &monitor, Utc::now()).await;
                            }
                        }
                    }
                });
            } else {
                tokio::spawn(async move {
                    run(&inner, &monitor, Utc::now()).await;
                    inner.initial_run.done();
                });
            }
        }
    }

    /// Resolves once every registered monitor has completed its first check.
    /// Useful for cold-start orchestration: after this, the cache holds a
    /// real result for every monitor that managed to run.
    pub async fn wait_until_initial_run(&self) {
        self.inner.initial_run.wait().await;
    }

    /// Force every monitor to run a fresh check, wait for all of them, update
    /// the cache, and summarize.
    pub async fn live(&self) -> Summary {
        let monitors = self.inner.snapshot_monitors();
        let start = Utc::now();

        let handles: Vec<_> = monitors
            .into_iter()
            .map(|monitor| {
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move { run(&inner, &monitor, start).await })
            })
            .collect();

        let results: Vec<CheckResult> = futures::future::join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| joined.ok())
            .collect();
        Summary::new(Utc::now(), results)
    }

    /// Summarize the cached result of every monitor without running anything.
    pub fn background(&self) -> Summary {
        Summary::new(Utc::now(), self.inner.snapshot_results())
    }

    /// Stop all background schedulers. In-flight probes observe the
    /// cancellation through their check contexts.
    pub fn shutdown(&self) {
        self.inner.token.cancel();
    }

    /// The root token driving scheduler shutdown.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.inner.token
    }
}

impl Inner {
    fn update(&self, monitor: &Arc<Monitor>, result: CheckResult) {
        let mut state = self.state.write().expect("dependency state poisoned");
        state
            .monitors
            .insert(monitor.name().to_string(), Arc::clone(monitor));
        state.cached.insert(monitor.name().to_string(), result);
    }

    fn snapshot_monitors(&self) -> Vec<Arc<Monitor>> {
        let state = self.state.read().expect("dependency state poisoned");
        state.monitors.values().cloned().collect()
    }

    fn snapshot_results(&self) -> Vec<CheckResult> {
        let state = self.state.read().expect("dependency state poisoned");
        state.cached.values().cloned().collect()
    }
}

async fn run(inner: &Arc<Inner>, monitor: &Arc<Monitor>, start: DateTime<Utc>) -> CheckResult {
    let result = perform_check(&inner.token, monitor, start).await;
    inner.update(monitor, result.clone());
    result
}

/// Run one bounded check: the probe races its deadline. On expiry the caller
/// gets a synthetic timeout result immediately; the abandoned probe task is
/// cancelled through its child token but never joined.
async fn perform_check(
    token: &CancellationToken,
    monitor: &Arc<Monitor>,
    start: DateTime<Utc>,
) -> CheckResult {
    let child = token.child_token();
    let deadline = TokioInstant::now() + monitor.timeout();
    let ctx = CheckContext::with_deadline(child.clone(), deadline.into_std());

    let (tx, rx) = oneshot::channel();
    let probe = Arc::clone(monitor);
    tokio::spawn(async move {
        let health = probe.check(&ctx).await;
        let _ = tx.send(health);
    });

    tokio::select! {
        delivered = rx => match delivered {
            Ok(health) => wrap(monitor, health),
            // probe task died without reporting; treat like a timeout
            Err(_) => timeout(monitor, start),
        },
        _ = tokio::time::sleep_until(deadline) => {
            warn!(
                monitor = monitor.name(),
                timeout_ms = monitor.timeout().as_millis() as u64,
                "healthcheck timed out"
            );
            child.cancel();
            timeout(monitor, start)
        }
        _ = token.cancelled() => {
            child.cancel();
            timeout(monitor, start)
        }
    }
}

fn fresh(monitor: &Arc<Monitor>) -> CheckResult {
    let mut health = Health::new(Status::Outage, "healthcheck has not run yet");
    health.urgency = monitor.urgency();
    wrap(monitor, health)
}

fn timeout(monitor: &Arc<Monitor>, start: DateTime<Utc>) -> CheckResult {
    let mut health = Health::new(Status::Outage, "healthcheck timed out");
    health.urgency = monitor.urgency();
    health.time = start;
    wrap(monitor, health)
}

// Cache entries carry the downgraded status only; nobody downstream cares
// about the raw one.
fn wrap(monitor: &Arc<Monitor>, mut health: Health) -> CheckResult {
    health.status = health.urgency.downgrade_with(Status::Ok, health.status);
    CheckResult {
        health,
        doc_url: monitor.documentation().to_string(),
        description: monitor.description().to_string(),
        last_ok: monitor.last_ok(),
        period: monitor.period(),
        name: monitor.name().to_string(),
    }
}

/// Counts outstanding first runs; `wait` resolves when the count reaches
/// zero. Registration can add more entries at any time.
struct Latch {
    remaining: Mutex<usize>,
    notify: Notify,
}

impl Latch {
    fn new() -> Latch {
        Latch {
            remaining: Mutex::new(0),
            notify: Notify::new(),
        }
    }

    fn add(&self, n: usize) {
        *self.remaining.lock().expect("latch poisoned") += n;
    }

    fn done(&self) {
        let mut remaining = self.remaining.lock().expect("latch poisoned");
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.notify.notify_waiters();
        }
    }

    async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if *self.remaining.lock().expect("latch poisoned") == 0 {
                return;
            }
            notified.await;
        }
    }
}
