/*!
Gauging the most recent values of something.

A gauge keeps a bounded history of the most recent samples, newest first,
and applies [`Threshold`]s with "the last N samples all violate" or "at
least N samples anywhere violate" predicates to produce a [`Health`].
Unlike a counter, a gauge has no notion of time; only insertion order.
*/

mod thresholds;

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::health::Health;
use crate::core::status::Status;

pub use thresholds::{
    MaxFloatThreshold, MaxIntThreshold, MaxThreshold, MinFloatThreshold, MinIntThreshold,
    MinThreshold, Threshold,
};

/// Message reported when no threshold is in violation.
pub const OK_MESSAGE: &str = "ok";

/// Numeric capability of a gauge sample. Implemented for exactly `i64` and
/// `f64`, the same two kinds the counter accepts; mixing kinds in one gauge
/// is a type error.
pub trait Sample: Copy + PartialOrd + Send + 'static {}

impl Sample for i64 {}

impl Sample for f64 {}

/// Gauge construction errors.
#[derive(Debug, thiserror::Error)]
pub enum GaugeError {
    #[error("a gauge must keep track of at least one value, len: {len}")]
    InvalidLength { len: usize },
}

/// A gauge over integer samples.
pub type IntGauge = Gauge<i64>;

/// A gauge over float samples.
pub type FloatGauge = Gauge<f64>;

struct GaugeState<V: Sample> {
    thresholds: Vec<Box<dyn Threshold<V>>>,
    values: VecDeque<V>,
}

/// Applies thresholds to recently sampled values, producing a [`Health`]
/// that represents the current state of the thing being gauged.
///
/// All operations are threadsafe.
pub struct Gauge<V: Sample> {
    name: String,
    length: usize,
    state: Mutex<GaugeState<V>>,
}

impl<V: Sample> Gauge<V> {
    /// A gauge retaining the `length` most recent samples. Fails when
    /// `length` is zero.
    pub fn new(name: impl Into<String>, length: usize) -> Result<Gauge<V>, GaugeError> {
        if length == 0 {
            return Err(GaugeError::InvalidLength { len: length });
        }
        Ok(Gauge {
            name: name.into(),
            length,
            state: Mutex::new(GaugeState {
                thresholds: Vec::new(),
                values: VecDeque::with_capacity(length),
            }),
        })
    }

    /// Record a sample; the oldest sample falls off once the history is full.
    pub fn record(&self, value: V) {
        let mut state = self.state.lock().expect("gauge state poisoned");
        state.values.push_front(value);
        state.values.truncate(self.length);
    }

    /// Attach a threshold. Chainable.
    pub fn set(&self, threshold: impl Threshold<V> + 'static) -> &Self {
        let mut state = self.state.lock().expect("gauge state poisoned");
        state.thresholds.push(Box::new(threshold));
        self
    }

    /// Evaluate every threshold over the sample history. Same worst-wins
    /// fold as the counter: equal severities append their descriptions,
    /// a strictly worse one replaces them, all-OK reports just "ok".
    pub fn health(&self) -> Health {
        let state = self.state.lock().expect("gauge state poisoned");

        let mut worst = Status::Ok;
        let mut messages: Vec<String> = Vec::with_capacity(state.thresholds.len());
        for threshold in &state.thresholds {
            let (status, description) = threshold.apply(&state.values);
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

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of samples currently retained.
    pub fn len(&self) -> usize {
        self.state.lock().expect("gauge state poisoned").values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Sample> std::fmt::Debug for Gauge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gauge")
            .field("name", &self.name)
            .field("length", &self.length)
            .finish()
    }
}
