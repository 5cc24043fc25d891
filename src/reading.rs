//! The selector's per-update output record and its wire format.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete head-tilt selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Selection {
    Left,
    Right,
    #[default]
    Neutral,
}

impl Selection {
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// The other side; `Neutral` stays `Neutral`
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Neutral => Self::Neutral,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stabilized tilt state after one selector update.
///
/// Field precision on the wire: `angle` 1 decimal, `hold_time` and
/// `confidence` 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub selection: Selection,
    /// Window-averaged tilt in degrees
    pub angle: f64,
    /// Seconds the current side has been held
    pub hold_time: f64,
    /// Hold has passed the ready threshold
    pub ready: bool,
    pub confidence: f64,
}

impl Reading {
    /// Reading published when no subject is in frame
    #[must_use]
    pub const fn no_signal() -> Self {
        Self {
            selection: Selection::Neutral,
            angle: 0.0,
            hold_time: 0.0,
            ready: false,
            confidence: 0.0,
        }
    }

    /// A confirmed left or right choice
    pub const fn confirmed_side(&self) -> Option<Selection> {
        if self.ready && !self.selection.is_neutral() {
            Some(self.selection)
        } else {
            None
        }
    }

    /// Encode as a single JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::no_signal()
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
