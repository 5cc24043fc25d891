//! Tilt selector: turns a noisy stream of tilt samples into a debounced,
//! hold-confirmed LEFT / RIGHT / NEUTRAL selection.
//!
//! Each update pushes the raw angle into a short moving-average window and
//! classifies the window mean against a symmetric threshold. A non-neutral
//! side must then be held continuously; once the hold reaches the ready
//! threshold the reading is flagged `ready` and the game may act on it.
//! Any change of side, including a drop to neutral, restarts the hold at 0.

use crate::{
    config::SelectorConfig,
    filters::MovingAverageFilter,
    reading::{round_to, Reading, Selection},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Which side a positive tilt angle selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleSignConvention {
    /// A mean angle above the threshold selects RIGHT
    #[default]
    PositiveIsRight,
    /// A mean angle above the threshold selects LEFT
    PositiveIsLeft,
}

impl AngleSignConvention {
    /// Side selected by a tilt past the threshold in the given direction
    pub const fn side(self, positive: bool) -> Selection {
        match (self, positive) {
            (Self::PositiveIsRight, true) | (Self::PositiveIsLeft, false) => Selection::Right,
            (Self::PositiveIsRight, false) | (Self::PositiveIsLeft, true) => Selection::Left,
        }
    }
}

/// Stateful tilt selector, one per game session
#[derive(Debug, Clone)]
pub struct TiltSelector {
    config: SelectorConfig,
    history: MovingAverageFilter,
    current_selection: Selection,
    selection_start: Option<Instant>,
    hold_time: f64,
}

impl Default for TiltSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl TiltSelector {
    /// # Panics
    ///
    /// Panics if `config.window_size` is zero; [`crate::config::Config::validate`]
    /// rejects such configurations.
    #[must_use]
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            history: MovingAverageFilter::new(config.window_size),
            config,
            current_selection: Selection::Neutral,
            selection_start: None,
            hold_time: 0.0,
        }
    }

    /// Feed one sample taken at `now`.
    ///
    /// Never fails: a confidence outside [0, 1] (or NaN) counts as 0 and a
    /// non-finite angle is left out of the window; both classify as neutral.
    pub fn update(&mut self, angle: f64, confidence: f64, now: Instant) -> Reading {
        let confidence = if (0.0..=1.0).contains(&confidence) {
            confidence
        } else {
            0.0
        };

        let avg_angle = if angle.is_finite() {
            self.history.apply(angle)
        } else {
            self.history.mean().unwrap_or(0.0)
        };

        let selection = if angle.is_finite() {
            self.classify(avg_angle, confidence)
        } else {
            Selection::Neutral
        };

        match self.selection_start {
            Some(start) if selection == self.current_selection && !selection.is_neutral() => {
                let held = now.saturating_duration_since(start).as_secs_f64();
                self.hold_time = self.hold_time.max(held);
            }
            _ => {
                if selection != self.current_selection {
                    debug!(
                        "Selection {} -> {} (avg {:.1}°, conf {:.2})",
                        self.current_selection, selection, avg_angle, confidence
                    );
                }
                self.current_selection = selection;
                self.selection_start = if selection.is_neutral() { None } else { Some(now) };
                self.hold_time = 0.0;
            }
        }

        Reading {
            selection: self.current_selection,
            angle: round_to(avg_angle, 1),
            hold_time: round_to(self.hold_time, 2),
            ready: self.is_ready(),
            confidence: round_to(confidence, 2),
        }
    }

    /// Forget all history and hold state.
    ///
    /// Call at the start of every decision so an earlier hold cannot satisfy
    /// the ready gate for the next one.
    pub fn reset(&mut self) {
        self.history.reset();
        self.current_selection = Selection::Neutral;
        self.selection_start = None;
        self.hold_time = 0.0;
    }

    /// Classify a window mean. Thresholds are strict: a mean of exactly
    /// `angle_threshold` is neutral.
    fn classify(&self, avg_angle: f64, confidence: f64) -> Selection {
        if confidence < self.config.confidence_threshold {
            Selection::Neutral
        } else if avg_angle > self.config.angle_threshold {
            self.config.angle_sign_convention.side(true)
        } else if avg_angle < -self.config.angle_threshold {
            self.config.angle_sign_convention.side(false)
        } else {
            Selection::Neutral
        }
    }

    /// Current hold has reached the ready threshold
    pub fn is_ready(&self) -> bool {
        !self.current_selection.is_neutral() && self.hold_time >= self.config.ready_threshold
    }

    pub const fn current_selection(&self) -> Selection {
        self.current_selection
    }

    /// Unrounded hold time in seconds
    pub const fn hold_time(&self) -> f64 {
        self.hold_time
    }

    pub const fn selection_start(&self) -> Option<Instant> {
        self.selection_start
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Unrounded mean of the angle window
    pub fn average_angle(&self) -> Option<f64> {
        self.history.mean()
    }

    pub const fn config(&self) -> &SelectorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_first_tilt_selects_with_zero_hold() {
        let mut selector = TiltSelector::default();
        let t0 = Instant::now();

        let reading = selector.update(20.0, 1.0, t0);
        assert_eq!(reading.selection, Selection::Right);
        assert_eq!(reading.hold_time, 0.0);
        assert!(!reading.ready);
        assert_eq!(selector.selection_start(), Some(t0));
    }

    #[test]
    fn test_hold_accumulates_until_ready() {
        let mut selector = TiltSelector::default();
        let t0 = Instant::now();

        selector.update(20.0, 1.0, t0);
        let reading = selector.update(20.0, 1.0, at(t0, 500));
        assert_eq!(reading.hold_time, 0.5);
        assert!(!reading.ready);

        let reading = selector.update(20.0, 1.0, at(t0, 700));
        assert_eq!(reading.hold_time, 0.7);
        assert!(reading.ready);
    }

    #[test]
    fn test_sign_convention() {
        assert_eq!(AngleSignConvention::PositiveIsRight.side(true), Selection::Right);
        assert_eq!(AngleSignConvention::PositiveIsRight.side(false), Selection::Left);
        assert_eq!(AngleSignConvention::PositiveIsLeft.side(true), Selection::Left);
        assert_eq!(AngleSignConvention::PositiveIsLeft.side(false), Selection::Right);

        let mut selector = TiltSelector::new(SelectorConfig {
            angle_sign_convention: AngleSignConvention::PositiveIsLeft,
            ..SelectorConfig::default()
        });
        let reading = selector.update(30.0, 1.0, Instant::now());
        assert_eq!(reading.selection, Selection::Left);
    }

    #[test]
    fn test_out_of_range_confidence_is_zero() {
        let mut selector = TiltSelector::default();
        let t0 = Instant::now();

        for confidence in [f64::NAN, 1.5, -0.1] {
            let reading = selector.update(40.0, confidence, t0);
            assert_eq!(reading.selection, Selection::Neutral);
            assert_eq!(reading.confidence, 0.0);
        }
    }

    #[test]
    fn test_non_finite_angle_does_not_poison_window() {
        let mut selector = TiltSelector::default();
        let t0 = Instant::now();

        selector.update(20.0, 1.0, t0);
        let reading = selector.update(f64::NAN, 1.0, at(t0, 30));
        assert_eq!(reading.selection, Selection::Neutral);
        assert_eq!(reading.angle, 20.0);
        assert_eq!(selector.history_len(), 1);

        let reading = selector.update(20.0, 1.0, at(t0, 60));
        assert_eq!(reading.selection, Selection::Right);
        assert_eq!(reading.hold_time, 0.0);
    }

    #[test]
    fn test_clock_going_backwards_keeps_hold() {
        let mut selector = TiltSelector::default();
        let t0 = Instant::now();

        selector.update(20.0, 1.0, t0);
        selector.update(20.0, 1.0, at(t0, 400));
        let reading = selector.update(20.0, 1.0, t0);
        assert_eq!(reading.hold_time, 0.4);
    }

    #[test]
    fn test_zero_ready_threshold_never_readies_neutral() {
        let mut selector = TiltSelector::new(SelectorConfig {
            ready_threshold: 0.0,
            ..SelectorConfig::default()
        });
        let t0 = Instant::now();

        assert!(!selector.update(0.0, 1.0, t0).ready);
        assert!(selector.update(40.0, 1.0, t0).ready);
    }
}
