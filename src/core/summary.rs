// Point-in-time collection of check results and the folds over it

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::core::health::Health;
use crate::core::status::Status;

/// A [`Health`] plus the owning monitor's metadata, cached for reporting.
///
/// Results are always cached post-downgrade: the status stored here has
/// already been clamped by the monitor's urgency, so every reader sees the
/// same urgency-aware view.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub health: Health,
    pub doc_url: String,
    pub description: String,
    pub last_ok: DateTime<Utc>,
    pub period: Duration,
    pub name: String,
}

/// A snapshot of results taken at one moment, reducible to a single overall
/// [`Status`]. Result ordering carries no meaning.
#[derive(Debug, Clone)]
pub struct Summary {
    time: DateTime<Utc>,
    executed: DateTime<Utc>,
    results: Vec<CheckResult>,
}

impl Summary {
    /// Build a summary taken at `time`. The `executed` marker becomes the
    /// minimum result timestamp, i.e. the least recently executed probe.
    pub fn new(time: DateTime<Utc>, results: Vec<CheckResult>) -> Summary {
        let executed = results
            .iter()
            .map(|result| result.health.time)
            .fold(time, |acc, probe_time| acc.min(probe_time));
        Summary {
            time,
            executed,
            results,
        }
    }

    /// Fold every result into one service-wide verdict, clamping each
    /// contribution by its urgency. Cached results are already downgraded
    /// and the clamp is idempotent, so re-applying it here is free for the
    /// scheduler path and keeps hand-built results honest too.
    pub fn overall(&self) -> Status {
        self.results.iter().fold(Status::Ok, |acc, result| {
            result
                .health
                .urgency
                .downgrade_with(acc, result.health.status)
        })
    }

    /// Worst status among the named results; `Ok` when `names` is empty.
    pub fn status(&self, names: &[&str]) -> Status {
        self.named(names)
            .fold(Status::Ok, |acc, result| Status::worst(acc, result.health.status))
    }

    /// Like [`Summary::status`] but re-applies the urgency clamp per result.
    /// Only useful for results that were not already downgraded at ingestion;
    /// kept for API symmetry.
    pub fn status_with_urgency(&self, names: &[&str]) -> Status {
        self.named(names).fold(Status::Ok, |acc, result| {
            result
                .health
                .urgency
                .downgrade_with(acc, result.health.status)
        })
    }

    /// Wall time between the least recent probe start and the snapshot; for
    /// a live summary this is the duration of the whole fan-out.
    pub fn duration(&self) -> Duration {
        (self.time - self.executed).to_std().unwrap_or(Duration::ZERO)
    }

    /// Timestamp of the least recently executed probe.
    pub fn executed(&self) -> DateTime<Utc> {
        self.executed
    }

    /// When this snapshot was taken.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    fn named<'a>(&'a self, names: &'a [&str]) -> impl Iterator<Item = &'a CheckResult> {
        self.results
            .iter()
            .filter(move |result| names.contains(&result.name.as_str()))
    }
}
