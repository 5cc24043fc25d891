//! Head tilt estimation from a single frame's landmarks.
//!
//! The tilt is the angle of the line joining the two ears. It needs nothing
//! but the current frame, so the estimator holds configuration only.

use crate::{config::EstimatorConfig, landmarks::Landmark, Error, Result};

/// Raw tilt measured on one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSample {
    /// Signed tilt in degrees, in (-180, 180]
    pub angle: f64,
    /// Landmark confidence in [0, 1]
    pub confidence: f64,
}

/// Stateless ear-line tilt estimator
#[derive(Debug, Clone)]
pub struct TiltEstimator {
    config: EstimatorConfig,
}

impl Default for TiltEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl TiltEstimator {
    #[must_use]
    pub const fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the tilt of one subject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if the landmark set does not reach
    /// either reference index.
    pub fn estimate(&self, landmarks: &[Landmark]) -> Result<TiltSample> {
        let left = Self::landmark(landmarks, self.config.left_index, "left ear")?;
        let right = Self::landmark(landmarks, self.config.right_index, "right ear")?;

        let mut angle = Self::tilt_angle(left, right);
        if self.config.fold_half_turn {
            angle = fold_half_turn(angle);
        }

        let confidence = match (left.visibility, right.visibility) {
            (Some(l), Some(r)) => (l + r) / 2.0,
            _ => self.config.default_confidence,
        };

        Ok(TiltSample {
            angle,
            confidence: sanitize_confidence(confidence),
        })
    }

    /// Angle of the left-to-right ear line in degrees.
    ///
    /// The difference is taken as left minus right. The result lies in
    /// (-180, 180].
    pub fn tilt_angle(left: &Landmark, right: &Landmark) -> f64 {
        let dy = left.y - right.y;
        let dx = left.x - right.x;
        normalize_angle(dy.atan2(dx).to_degrees())
    }

    fn landmark<'a>(landmarks: &'a [Landmark], index: usize, name: &str) -> Result<&'a Landmark> {
        landmarks.get(index).ok_or_else(|| {
            Error::MissingLandmark(format!(
                "{name} (index {index}) not present, subject has {} landmarks",
                landmarks.len()
            ))
        })
    }
}

/// Map an angle in [-180, 180] onto (-180, 180]
fn normalize_angle(degrees: f64) -> f64 {
    if degrees <= -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// Fold angles beyond a quarter turn back into [-90, 90]
fn fold_half_turn(degrees: f64) -> f64 {
    if degrees > 90.0 {
        degrees - 180.0
    } else if degrees < -90.0 {
        degrees + 180.0
    } else {
        degrees
    }
}

/// Out-of-range confidence clamps to [0, 1]; NaN counts as no confidence
fn sanitize_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_POSE_LANDMARKS;

    fn skeleton(left: Landmark, right: Landmark) -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); NUM_POSE_LANDMARKS];
        landmarks[7] = left;
        landmarks[8] = right;
        landmarks
    }

    #[test]
    fn test_level_ears() {
        let estimator = TiltEstimator::default();
        let sample = estimator
            .estimate(&skeleton(Landmark::new(0.6, 0.4), Landmark::new(0.4, 0.4)))
            .unwrap();
        assert!(sample.angle.abs() < 1e-10);
        assert_eq!(sample.confidence, 1.0);
    }

    #[test]
    fn test_positive_tilt() {
        // Left ear lower in the image than the right ear
        let left = Landmark::new(0.6, 0.5);
        let right = Landmark::new(0.4, 0.3);
        let angle = TiltEstimator::tilt_angle(&left, &right);
        assert!((angle - 45.0).abs() < 1e-10);
    }

    #[test]
    fn test_range_excludes_minus_180() {
        // dx < 0 and dy == 0 gives atan2(+0, -x) = 180 and atan2(-0, -x) = -180
        let left = Landmark::new(0.4, 0.5);
        let right = Landmark::new(0.6, 0.5);
        assert_eq!(TiltEstimator::tilt_angle(&left, &right), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
    }

    #[test]
    fn test_fold_half_turn() {
        assert_eq!(fold_half_turn(170.0), -10.0);
        assert_eq!(fold_half_turn(-170.0), 10.0);
        assert_eq!(fold_half_turn(45.0), 45.0);
        assert_eq!(fold_half_turn(180.0), 0.0);
    }

    #[test]
    fn test_confidence_mean_of_visibilities() {
        let estimator = TiltEstimator::default();
        let sample = estimator
            .estimate(&skeleton(
                Landmark::new(0.6, 0.4).with_visibility(0.9),
                Landmark::new(0.4, 0.4).with_visibility(0.5),
            ))
            .unwrap();
        assert!((sample.confidence - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_confidence_default_when_one_visibility_missing() {
        let estimator = TiltEstimator::new(EstimatorConfig {
            default_confidence: 0.8,
            ..EstimatorConfig::default()
        });
        let sample = estimator
            .estimate(&skeleton(
                Landmark::new(0.6, 0.4).with_visibility(0.1),
                Landmark::new(0.4, 0.4),
            ))
            .unwrap();
        assert_eq!(sample.confidence, 0.8);
    }

    #[test]
    fn test_sanitize_confidence() {
        assert_eq!(sanitize_confidence(f64::NAN), 0.0);
        assert_eq!(sanitize_confidence(1.7), 1.0);
        assert_eq!(sanitize_confidence(-0.2), 0.0);
    }

    #[test]
    fn test_missing_landmark() {
        let estimator = TiltEstimator::default();
        let result = estimator.estimate(&[Landmark::new(0.5, 0.5); 3]);
        match result {
            Err(Error::MissingLandmark(msg)) => assert!(msg.contains("left ear")),
            other => panic!("Expected MissingLandmark, got {other:?}"),
        }
    }
}
