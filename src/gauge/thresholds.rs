// Limits over the recent-sample history of a gauge

use std::collections::VecDeque;

use crate::core::status::Status;
use crate::gauge::Sample;

/// A predicate over the recent-sample history (newest first) that yields
/// either a degraded [`Status`] with its description, or `Ok` with `"ok"`.
pub trait Threshold<V: Sample>: Send {
    fn apply(&self, values: &VecDeque<V>) -> (Status, String);
}

/// Violated when samples reach `threshold` — either the newest `last_n`
/// samples all do, or at least `any_n` samples anywhere in the history do.
/// With both counts zero the threshold never fires.
#[derive(Debug, Clone)]
pub struct MaxThreshold<V> {
    pub threshold: V,
    pub last_n: usize,
    pub any_n: usize,
    pub description: String,
    pub severity: Status,
}

/// Violated when samples fall to `threshold`, with the same last-N / any-N
/// shape as [`MaxThreshold`].
#[derive(Debug, Clone)]
pub struct MinThreshold<V> {
    pub threshold: V,
    pub last_n: usize,
    pub any_n: usize,
    pub description: String,
    pub severity: Status,
}

// Walk from the front, where the newest samples live; that prefix is what
// the last-N rule inspects.
fn walk<V: Sample>(
    values: &VecDeque<V>,
    violates: impl Fn(V) -> bool,
    last_n: usize,
    any_n: usize,
) -> bool {
    let mut violations = 0;
    for (i, value) in values.iter().enumerate() {
        if violates(*value) {
            violations += 1;
        }
        if last_n > 0 && i + 1 == last_n && violations == last_n {
            return true;
        }
    }
    any_n > 0 && violations >= any_n
}

impl<V: Sample> Threshold<V> for MaxThreshold<V> {
    fn apply(&self, values: &VecDeque<V>) -> (Status, String) {
        if walk(values, |v| v >= self.threshold, self.last_n, self.any_n) {
            (self.severity, self.description.clone())
        } else {
            (Status::Ok, super::OK_MESSAGE.to_string())
        }
    }
}

impl<V: Sample> Threshold<V> for MinThreshold<V> {
    fn apply(&self, values: &VecDeque<V>) -> (Status, String) {
        if walk(values, |v| v <= self.threshold, self.last_n, self.any_n) {
            (self.severity, self.description.clone())
        } else {
            (Status::Ok, super::OK_MESSAGE.to_string())
        }
    }
}

pub type MaxIntThreshold = MaxThreshold<i64>;
pub type MinIntThreshold = MinThreshold<i64>;
pub type MaxFloatThreshold = MaxThreshold<f64>;
pub type MinFloatThreshold = MinThreshold<f64>;
