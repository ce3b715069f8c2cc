// Urgency policy: how much the service actually cares about a dependency

use std::fmt;

use crate::core::status::Status;

/// How much of the service is lost when a dependency fails.
///
/// A `Required` dependency takes the whole service down with it. A `Weak`
/// one can fail without much more than a cosmetic blemish. The urgency of a
/// monitor clamps the contribution its raw status makes to the service-wide
/// verdict, see [`Urgency::downgrade_with`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Required,
    Strong,
    Weak,
    None,
    #[default]
    Unknown,
}

impl Urgency {
    /// Parse an urgency name, case insensitive. Malformed strings parse to
    /// `Unknown`, which behaves like `Required`.
    pub fn parse(urgency: &str) -> Urgency {
        match urgency.to_uppercase().as_str() {
            "REQUIRED" => Urgency::Required,
            "STRONG" => Urgency::Strong,
            "WEAK" => Urgency::Weak,
            "NONE" => Urgency::None,
            _ => Urgency::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Required => "REQUIRED",
            Urgency::Strong => "STRONG",
            Urgency::Weak => "WEAK",
            Urgency::None => "NONE",
            Urgency::Unknown => "UNKNOWN",
        }
    }

    /// The long-form phrase reported by the private endpoint. These strings
    /// are part of the JSON contract and must not drift.
    pub fn detail(&self) -> &'static str {
        match self {
            Urgency::Required => {
                "Required: Failure of this dependency would result in complete system outage"
            }
            Urgency::Strong => {
                "Strong: Failure of this dependency would result in major functional degradation"
            }
            Urgency::Weak => {
                "Weak: Failure of this dependency would result in minor functionality loss"
            }
            Urgency::None => {
                "None: Failure of this dependency would result in no loss of functionality"
            }
            Urgency::Unknown => "Unknown",
        }
    }

    /// Fold a dependency's `new` status into the running `system` status,
    /// clamped by this urgency.
    ///
    /// `Required` passes the raw status through; `Strong` caps the damage at
    /// `Major`; `Weak` caps it at `Minor`; `None` contributes nothing.
    /// `Unknown` is treated as `Required` so that an unconfigured urgency
    /// never hides a failure.
    pub fn downgrade_with(&self, system: Status, new: Status) -> Status {
        match self {
            Urgency::Required | Urgency::Unknown => Status::worst(system, new),
            Urgency::Strong => Status::worst(system, Status::best(new, Status::Major)),
            Urgency::Weak => Status::worst(system, Status::best(new, Status::Minor)),
            Urgency::None => system,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
