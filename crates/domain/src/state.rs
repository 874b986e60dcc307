//! Element state: the operational state reported by a hardware element.

use serde::{Deserialize, Serialize};

/// Discrete operational state of an element.
///
/// This is the fixed vocabulary of the underlying control system. Groups only
/// interpret four of these values (see
/// [`StateStatistics`](crate::statistics::StateStatistics)); the rest pass
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    On,
    Off,
    Close,
    Open,
    Insert,
    Extract,
    Moving,
    Standby,
    Fault,
    Init,
    Running,
    Alarm,
    Disable,
    #[default]
    Unknown,
}

impl ElementState {
    /// Upper-case name as shown in status messages (`"MOVING"`, `"FAULT"`, …).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Close => "CLOSE",
            Self::Open => "OPEN",
            Self::Insert => "INSERT",
            Self::Extract => "EXTRACT",
            Self::Moving => "MOVING",
            Self::Standby => "STANDBY",
            Self::Fault => "FAULT",
            Self::Init => "INIT",
            Self::Running => "RUNNING",
            Self::Alarm => "ALARM",
            Self::Disable => "DISABLE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
