//! Forward-head posture scoring and an analog head tilt axis.
//!
//! Posture is judged from how far the nose sits sideways of the shoulder
//! midpoint. The offset is mapped linearly onto a 0-100 severity; anything at
//! or above the configured severity is bad posture. The tilt axis turns the
//! ear-line angle into a signed value in [-1, 1] with a dead zone and a
//! quadratic ramp, for consumers that want proportional input rather than a
//! discrete selection.

use crate::{
    config::PostureConfig,
    estimator::TiltEstimator,
    landmarks::{Landmark, PoseFrame},
    Error, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Posture classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostureKind {
    #[default]
    NoPerson,
    PostureOk,
    PostureBad,
}

impl fmt::Display for PostureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoPerson => "NO_PERSON",
            Self::PostureOk => "POSTURE_OK",
            Self::PostureBad => "POSTURE_BAD",
        })
    }
}

/// Posture measured on one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureReading {
    #[serde(rename = "type")]
    pub kind: PostureKind,
    /// Forward-head severity, 0-100
    pub severity: u8,
    /// Landmark confidence in [0, 1]
    pub confidence: f64,
    /// Ear-line angle in degrees, folded into [-90, 90]
    pub head_tilt_angle: f64,
    /// Signed proportional tilt in [-1, 1]
    pub tilt_axis: f64,
}

impl PostureReading {
    /// Reading reported when nobody is in frame
    #[must_use]
    pub const fn no_person() -> Self {
        Self {
            kind: PostureKind::NoPerson,
            severity: 0,
            confidence: 0.0,
            head_tilt_angle: 0.0,
            tilt_axis: 0.0,
        }
    }

    pub const fn is_bad(&self) -> bool {
        matches!(self.kind, PostureKind::PostureBad)
    }
}

impl Default for PostureReading {
    fn default() -> Self {
        Self::no_person()
    }
}

/// Stateless posture estimator
#[derive(Debug, Clone)]
pub struct PostureEstimator {
    config: PostureConfig,
}

impl Default for PostureEstimator {
    fn default() -> Self {
        Self::new(PostureConfig::default())
    }
}

impl PostureEstimator {
    #[must_use]
    pub const fn new(config: PostureConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &PostureConfig {
        &self.config
    }

    /// Assess the first subject of a frame. Frames without a usable subject
    /// report [`PostureKind::NoPerson`].
    pub fn assess(&self, frame: &PoseFrame) -> PostureReading {
        let Some(landmarks) = frame.primary_subject() else {
            return PostureReading::no_person();
        };

        self.estimate(landmarks).unwrap_or_else(|e| {
            debug!("Posture of frame {} unavailable: {e}", frame.timestamp_ms);
            PostureReading::no_person()
        })
    }

    /// Score one subject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if the nose, a shoulder or an ear
    /// index is beyond the landmark set.
    pub fn estimate(&self, landmarks: &[Landmark]) -> Result<PostureReading> {
        let cfg = &self.config;
        let nose = landmark(landmarks, cfg.nose_index, "nose")?;
        let left_shoulder = landmark(landmarks, cfg.left_shoulder_index, "left shoulder")?;
        let right_shoulder = landmark(landmarks, cfg.right_shoulder_index, "right shoulder")?;
        let left_ear = landmark(landmarks, cfg.left_ear_index, "left ear")?;
        let right_ear = landmark(landmarks, cfg.right_ear_index, "right ear")?;

        let shoulder_mid = (left_shoulder.x + right_shoulder.x) / 2.0;
        let severity = self.severity((nose.x - shoulder_mid).abs());

        let visibilities: Vec<f64> = [nose, left_shoulder, right_shoulder]
            .iter()
            .filter_map(|l| l.visibility)
            .collect();
        let confidence = if visibilities.is_empty() {
            cfg.default_confidence
        } else {
            visibilities.iter().sum::<f64>() / visibilities.len() as f64
        };

        let head_tilt_angle = fold(TiltEstimator::tilt_angle(left_ear, right_ear));

        Ok(PostureReading {
            kind: if severity >= cfg.bad_severity {
                PostureKind::PostureBad
            } else {
                PostureKind::PostureOk
            },
            severity,
            confidence: if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) },
            head_tilt_angle,
            tilt_axis: self.tilt_axis(head_tilt_angle),
        })
    }

    /// Map a horizontal nose offset onto 0-100, truncating
    fn severity(&self, head_forward: f64) -> u8 {
        let scaled = (head_forward - self.config.forward_offset) / self.config.forward_range * 100.0;
        if scaled.is_nan() {
            return 0;
        }
        scaled.clamp(0.0, 100.0) as u8
    }

    /// Dead zone below `axis_min_angle`, squared ramp up to `axis_max_angle`
    pub fn tilt_axis(&self, angle: f64) -> f64 {
        let span = self.config.axis_max_angle - self.config.axis_min_angle;
        let strength = ((angle.abs() - self.config.axis_min_angle) / span).clamp(0.0, 1.0);
        if strength.is_nan() {
            return 0.0;
        }
        let sign = if angle >= 0.0 { 1.0 } else { -1.0 };
        strength * strength * sign
    }
}

fn landmark<'a>(landmarks: &'a [Landmark], index: usize, name: &str) -> Result<&'a Landmark> {
    landmarks.get(index).ok_or_else(|| {
        Error::MissingLandmark(format!(
            "{name} (index {index}) not present, subject has {} landmarks",
            landmarks.len()
        ))
    })
}

fn fold(degrees: f64) -> f64 {
    if degrees > 90.0 {
        degrees - 180.0
    } else if degrees < -90.0 {
        degrees + 180.0
    } else {
        degrees
    }
}
