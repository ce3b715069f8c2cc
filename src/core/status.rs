// Status lattice shared by every other module

use std::fmt;

/// Condition of a single component or of the whole service, worst first.
///
/// The variant order is load-bearing: `Outage < Major < Minor < Ok`, so the
/// derived `Ord` gives "worse than" for free and `min`/`max` pick the less or
/// more cheerful of two states.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The component is down and functionality is lost
    Outage,
    /// Major functional degradation
    Major,
    /// Minor functionality loss
    Minor,
    /// Everything is fine
    #[default]
    Ok,
}

impl Status {
    /// Parse a status name, case insensitive.
    ///
    /// A malformed string parses to `Outage`: an operator typo in a
    /// threshold config must never make a component look healthier.
    pub fn parse(state: &str) -> Status {
        match state.to_uppercase().as_str() {
            "OUTAGE" => Status::Outage,
            "MAJOR" => Status::Major,
            "MINOR" => Status::Minor,
            "OK" => Status::Ok,
            _ => Status::Outage,
        }
    }

    /// The canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Outage => "OUTAGE",
            Status::Major => "MAJOR",
            Status::Minor => "MINOR",
            Status::Ok => "OK",
        }
    }

    pub fn worse_than(&self, level: Status) -> bool {
        *self < level
    }

    pub fn same_or_worse_than(&self, level: Status) -> bool {
        *self <= level
    }

    pub fn same_or_better_than(&self, level: Status) -> bool {
        *self >= level
    }

    pub fn better_than(&self, level: Status) -> bool {
        *self > level
    }

    pub fn same_as(&self, level: Status) -> bool {
        *self == level
    }

    /// The more cheerful of two states.
    pub fn best(left: Status, right: Status) -> Status {
        left.max(right)
    }

    /// The less positive of two states.
    pub fn worst(left: Status, right: Status) -> Status {
        left.min(right)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
