// Declarative limits applied over a bucket window

use crate::core::status::Status;
use crate::count::data::{greater_eq, less_eq, Buckets, Value};

/// A predicate over a bucket window that yields either a degraded [`Status`]
/// with its description, or `Ok` with the literal `"ok"`.
///
/// `apply` takes the window mutably because evaluating the most recently
/// completed bucket forces a refresh of the window first.
pub trait Threshold<V: Value>: Send {
    fn apply(&self, buckets: &mut Buckets<V>) -> (Status, String);
}

fn state(violated: bool, severity: Status, description: &str) -> (Status, String) {
    if violated {
        (severity, description.to_string())
    } else {
        (Status::Ok, super::OK_MESSAGE.to_string())
    }
}

/// Violated when the most recently completed bucket reaches `threshold`.
#[derive(Debug, Clone)]
pub struct MaxThreshold<V> {
    pub threshold: V,
    pub description: String,
    pub severity: Status,
}

/// Violated when the most recently completed bucket falls to `threshold`.
#[derive(Debug, Clone)]
pub struct MinThreshold<V> {
    pub threshold: V,
    pub description: String,
    pub severity: Status,
}

/// Violated when the sum over the whole window exceeds `threshold` (strict).
#[derive(Debug, Clone)]
pub struct MaxSumThreshold<V> {
    pub threshold: V,
    pub description: String,
    pub severity: Status,
}

/// Violated when the sum over the whole window drops below `threshold`
/// (strict).
#[derive(Debug, Clone)]
pub struct MinSumThreshold<V> {
    pub threshold: V,
    pub description: String,
    pub severity: Status,
}

impl<V: Value> Threshold<V> for MaxThreshold<V> {
    fn apply(&self, buckets: &mut Buckets<V>) -> (Status, String) {
        let exceeded = buckets.compare(greater_eq, self.threshold);
        state(exceeded, self.severity, &self.description)
    }
}

impl<V: Value> Threshold<V> for MinThreshold<V> {
    fn apply(&self, buckets: &mut Buckets<V>) -> (Status, String) {
        let undercut = buckets.compare(less_eq, self.threshold);
        state(undercut, self.severity, &self.description)
    }
}

impl<V: Value> Threshold<V> for MaxSumThreshold<V> {
    fn apply(&self, buckets: &mut Buckets<V>) -> (Status, String) {
        // refresh so buckets older than the window no longer count
        buckets.increment(V::ZERO);
        let crossed = self.threshold < buckets.sum();
        state(crossed, self.severity, &self.description)
    }
}

impl<V: Value> Threshold<V> for MinSumThreshold<V> {
    fn apply(&self, buckets: &mut Buckets<V>) -> (Status, String) {
        buckets.increment(V::ZERO);
        let crossed = buckets.sum() < self.threshold;
        state(crossed, self.severity, &self.description)
    }
}

pub type MaxIntThreshold = MaxThreshold<i64>;
pub type MinIntThreshold = MinThreshold<i64>;
pub type MaxSumIntThreshold = MaxSumThreshold<i64>;
pub type MinSumIntThreshold = MinSumThreshold<i64>;

pub type MaxFloatThreshold = MaxThreshold<f64>;
pub type MinFloatThreshold = MinThreshold<f64>;
pub type MaxSumFloatThreshold = MaxSumThreshold<f64>;
pub type MinSumFloatThreshold = MinSumThreshold<f64>;
