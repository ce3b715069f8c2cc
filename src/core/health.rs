// Immutable snapshot of one component's condition at a moment in time

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::core::status::Status;
use crate::core::urgency::Urgency;

/// The health of a component at a moment in time. Once constructed it should
/// not be modified; the owning [`Monitor`](crate::Monitor) stamps `urgency`,
/// `time`, and `duration` when the probe returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    pub status: Status,
    pub urgency: Urgency,
    pub time: DateTime<Utc>,
    pub message: String,
    pub duration: Duration,
}

impl Health {
    /// Create a Health for the current moment. Probes only need to provide
    /// the status and a message; everything else belongs to the monitor.
    pub fn new(status: Status, message: impl Into<String>) -> Health {
        Health {
            status,
            urgency: Urgency::Unknown,
            time: Utc::now(),
            message: message.into(),
            duration: Duration::ZERO,
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at {}, {}",
            self.status, self.urgency, self.time, self.message
        )
    }
}
