/*!
Counting things over sliding windows of time.

A counter accumulates increments into fixed-width time buckets and evaluates
declarative [`Threshold`]s over the window to produce a [`Health`]. The
window keeps the last `length - 1` completed buckets plus the one currently
filling; max/min thresholds look only at the most recently completed bucket,
sum thresholds look at the whole window.

```
use vitals::count::{IntCounter, MaxIntThreshold};
use vitals::count::BucketPeriod;
use vitals::Status;

let errors = IntCounter::new("app-upstream-errors", BucketPeriod::one_minute(), 5).unwrap();
errors.set(MaxIntThreshold {
    threshold: 50,
    description: "more than 50 upstream errors in a minute".to_string(),
    severity: Status::Major,
});

errors.increment(1);
let health = errors.health();
# let _ = health;
```
*/

mod data;
mod thresholds;

use std::sync::Mutex;

use crate::core::health::Health;
use crate::core::status::Status;

pub use data::{greater_eq, less_eq, BucketPeriod, Buckets, Value};
pub use thresholds::{
    MaxFloatThreshold, MaxIntThreshold, MaxSumFloatThreshold, MaxSumIntThreshold,
    MaxSumThreshold, MaxThreshold, MinFloatThreshold, MinIntThreshold, MinSumFloatThreshold,
    MinSumIntThreshold, MinSumThreshold, MinThreshold, Threshold,
};

/// Message reported when no threshold is in violation.
pub const OK_MESSAGE: &str = "ok";

/// Counter construction errors.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("a counter must keep track of at least one value, len: {len}")]
    InvalidLength { len: usize },
}

/// A counter over integer deltas.
pub type IntCounter = Counter<i64>;

/// A counter over float deltas.
pub type FloatCounter = Counter<f64>;

struct ContainerState<V: Value> {
    thresholds: Vec<Box<dyn Threshold<V>>>,
    buckets: Buckets<V>,
}

/// Applies thresholds to values accumulating over time, producing a [`Health`]
/// that represents the current state of the thing being counted.
///
/// All operations are threadsafe; the window is guarded by one exclusive
/// lock because even reads refresh it.
pub struct Counter<V: Value> {
    name: String,
    state: Mutex<ContainerState<V>>,
}

impl<V: Value> Counter<V> {
    /// A counter of `length` buckets, each spanning one tick of `period`.
    /// Fails when `length` is zero.
    pub fn new(
        name: impl Into<String>,
        period: BucketPeriod,
        length: usize,
    ) -> Result<Counter<V>, CounterError> {
        if length == 0 {
            return Err(CounterError::InvalidLength { len: length });
        }
        Ok(Counter {
            name: name.into(),
            state: Mutex::new(ContainerState {
                thresholds: Vec::new(),
                buckets: Buckets::new(period, length),
            }),
        })
    }

    /// Add `delta` into the bucket for the current tick.
    pub fn increment(&self, delta: V) {
        let mut state = self.state.lock().expect("counter state poisoned");
        state.buckets.increment(delta);
    }

    /// Attach a threshold. Chainable.
    pub fn set(&self, threshold: impl Threshold<V> + 'static) -> &Self {
        let mut state = self.state.lock().expect("counter state poisoned");
        state.thresholds.push(Box::new(threshold));
        self
    }

    /// Evaluate every threshold over the current window.
    ///
    /// Only the messages of the worst severity are reported, so a MINOR
    /// description never muddies an OUTAGE message. When everything passes
    /// the message is just "ok".
    pub fn health(&self) -> Health {
        let mut guard = self.state.lock().expect("counter state poisoned");
        let state = &mut *guard;

        let mut worst = Status::Ok;
        let mut messages: Vec<String> = Vec::with_capacity(state.thresholds.len());
        for threshold in &state.thresholds {
            let (status, description) = threshold.apply(&mut state.buckets);
            if status.worse_than(worst) {
                worst = status;
                messages = vec![description];
            } else if status.same_as(worst) {
                messages.push(description);
            }
        }

        let message = if worst == Status::Ok {
            OK_MESSAGE.to_string()
        } else {
            messages.join(", ")
        };
        Health::new(worst, message)
    }

    /// Sum across the whole window, including the bucket still accumulating.
    pub fn sum(&self) -> V {
        let mut state = self.state.lock().expect("counter state poisoned");
        // refresh so stale buckets do not linger in the total
        state.buckets.increment(V::ZERO);
        state.buckets.sum()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<V: Value> std::fmt::Debug for Counter<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter").field("name", &self.name).finish()
    }
}
