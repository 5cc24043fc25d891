//! Configuration management for the head tilt quiz

use crate::{
    constants::{
        DEFAULT_ANGLE_THRESHOLD, DEFAULT_BAD_POSTURE_SEVERITY, DEFAULT_CONFIDENCE_THRESHOLD,
        DEFAULT_FORWARD_HEAD_OFFSET, DEFAULT_FORWARD_HEAD_RANGE, DEFAULT_LANDMARK_CONFIDENCE,
        DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_POSTURE_CONFIDENCE, DEFAULT_READY_THRESHOLD,
        DEFAULT_RESULT_DISPLAY_SECS, DEFAULT_TILT_AXIS_MAX_ANGLE, DEFAULT_TILT_AXIS_MIN_ANGLE,
        DEFAULT_TRANSMIT_INTERVAL_MS, DEFAULT_WINDOW_SIZE, LEFT_EAR, LEFT_SHOULDER, MIN_TRANSMIT_INTERVAL_MS,
        NOSE, RIGHT_EAR, RIGHT_SHOULDER,
    },
    estimator::TiltEstimator,
    posture::PostureEstimator,
    quiz::QuestionBank,
    selector::{AngleSignConvention, TiltSelector},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tilt estimation from landmarks
    pub estimator: EstimatorConfig,

    /// Tilt selection state machine
    pub selector: SelectorConfig,

    /// Forward-head posture and tilt axis
    pub posture: PostureConfig,

    /// Outbound reading rate
    pub transmit: TransmitConfig,

    /// Quiz game behaviour
    pub game: GameConfig,

    /// Frame source robustness
    pub capture: CaptureConfig,
}

/// Tilt estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Landmark index of the left ear
    pub left_index: usize,

    /// Landmark index of the right ear
    pub right_index: usize,

    /// Confidence reported when the model gives no visibility
    pub default_confidence: f64,

    /// Fold angles beyond ±90° back by half a turn
    pub fold_half_turn: bool,
}

/// Tilt selector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Number of raw angles averaged
    pub window_size: usize,

    /// Tilt in degrees the mean must exceed to select a side
    pub angle_threshold: f64,

    /// Samples below this confidence are neutral
    pub confidence_threshold: f64,

    /// Seconds a side must be held before it is ready
    pub ready_threshold: f64,

    /// Which side a positive angle selects
    pub angle_sign_convention: AngleSignConvention,
}

/// Posture estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    pub nose_index: usize,
    pub left_shoulder_index: usize,
    pub right_shoulder_index: usize,
    pub left_ear_index: usize,
    pub right_ear_index: usize,

    /// Nose offset from the shoulder midpoint ignored as noise
    pub forward_offset: f64,

    /// Offset beyond `forward_offset` that reaches severity 100
    pub forward_range: f64,

    /// Severity at or above which posture is bad
    pub bad_severity: u8,

    /// Confidence reported when the model gives no visibility
    pub default_confidence: f64,

    /// Tilt in degrees where the tilt axis leaves zero
    pub axis_min_angle: f64,

    /// Tilt in degrees where the tilt axis reaches ±1
    pub axis_max_angle: f64,
}

/// Reading transmission parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitConfig {
    /// Minimum milliseconds between two transmitted readings
    pub interval_ms: u64,
}

/// Quiz game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds an answer result stays up before the next question
    pub result_display_secs: f64,

    /// Submit as soon as a selection is ready instead of waiting for confirm
    pub auto_confirm: bool,

    /// YAML question bank; the built-in bank is used when absent
    pub questions_file: Option<PathBuf>,

    /// Seed for question order; random when absent
    pub seed: Option<u64>,
}

/// Frame source parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Consecutive unreadable frames tolerated before aborting
    pub max_consecutive_failures: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            left_index: LEFT_EAR,
            right_index: RIGHT_EAR,
            default_confidence: DEFAULT_LANDMARK_CONFIDENCE,
            fold_half_turn: false,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            ready_threshold: DEFAULT_READY_THRESHOLD,
            angle_sign_convention: AngleSignConvention::default(),
        }
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            nose_index: NOSE,
            left_shoulder_index: LEFT_SHOULDER,
            right_shoulder_index: RIGHT_SHOULDER,
            left_ear_index: LEFT_EAR,
            right_ear_index: RIGHT_EAR,
            forward_offset: DEFAULT_FORWARD_HEAD_OFFSET,
            forward_range: DEFAULT_FORWARD_HEAD_RANGE,
            bad_severity: DEFAULT_BAD_POSTURE_SEVERITY,
            default_confidence: DEFAULT_POSTURE_CONFIDENCE,
            axis_min_angle: DEFAULT_TILT_AXIS_MIN_ANGLE,
            axis_max_angle: DEFAULT_TILT_AXIS_MAX_ANGLE,
        }
    }
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_TRANSMIT_INTERVAL_MS,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            result_display_secs: DEFAULT_RESULT_DISPLAY_SECS,
            auto_confirm: false,
            questions_file: None,
            seed: None,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

impl TransmitConfig {
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl GameConfig {
    /// # Panics
    ///
    /// Panics on a negative or non-finite `result_display_secs`; run
    /// [`Config::validate`] first.
    pub fn result_display(&self) -> Duration {
        Duration::from_secs_f64(self.result_display_secs)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create a tilt estimator from configuration
    pub fn create_estimator(&self) -> TiltEstimator {
        TiltEstimator::new(self.estimator.clone())
    }

    /// Create a tilt selector from configuration
    pub fn create_selector(&self) -> TiltSelector {
        TiltSelector::new(self.selector.clone())
    }

    /// Create a posture estimator from configuration
    pub fn create_posture_estimator(&self) -> PostureEstimator {
        PostureEstimator::new(self.posture.clone())
    }

    /// Load the configured question bank
    pub fn create_question_bank(&self) -> Result<QuestionBank> {
        match &self.game.questions_file {
            Some(path) => QuestionBank::from_file(path),
            None => Ok(QuestionBank::builtin()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Estimator
        if self.estimator.left_index == self.estimator.right_index {
            return Err(Error::ConfigError(
                "Left and right landmark indices must differ".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.estimator.default_confidence) {
            return Err(Error::ConfigError(
                "Default confidence must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Selector
        if self.selector.window_size == 0 {
            return Err(Error::ConfigError(
                "Window size must be greater than 0".to_string(),
            ));
        }
        if !self.selector.angle_threshold.is_finite() || self.selector.angle_threshold < 0.0 {
            return Err(Error::ConfigError(
                "Angle threshold must be a non-negative number of degrees".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.selector.confidence_threshold) {
            return Err(Error::ConfigError(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !self.selector.ready_threshold.is_finite() || self.selector.ready_threshold < 0.0 {
            return Err(Error::ConfigError(
                "Ready threshold must be a non-negative number of seconds".to_string(),
            ));
        }

        // Posture
        if self.posture.left_shoulder_index == self.posture.right_shoulder_index {
            return Err(Error::ConfigError(
                "Left and right shoulder indices must differ".to_string(),
            ));
        }
        if !self.posture.forward_offset.is_finite() || self.posture.forward_offset < 0.0 {
            return Err(Error::ConfigError(
                "Forward head offset must be a non-negative number".to_string(),
            ));
        }
        if !self.posture.forward_range.is_finite() || self.posture.forward_range <= 0.0 {
            return Err(Error::ConfigError(
                "Forward head range must be positive".to_string(),
            ));
        }
        if self.posture.bad_severity > 100 {
            return Err(Error::ConfigError(
                "Bad posture severity must be between 0 and 100".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.posture.default_confidence) {
            return Err(Error::ConfigError(
                "Posture default confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(self.posture.axis_min_angle >= 0.0 && self.posture.axis_max_angle > self.posture.axis_min_angle)
            || !self.posture.axis_max_angle.is_finite()
        {
            return Err(Error::ConfigError(
                "Tilt axis angles must satisfy 0 <= min < max".to_string(),
            ));
        }

        // Transmission
        if self.transmit.interval_ms < MIN_TRANSMIT_INTERVAL_MS {
            return Err(Error::ConfigError(format!(
                "Transmit interval must be at least {MIN_TRANSMIT_INTERVAL_MS} ms"
            )));
        }

        // Game
        if !self.game.result_display_secs.is_finite() || self.game.result_display_secs < 0.0 {
            return Err(Error::ConfigError(
                "Result display time must be a non-negative number of seconds".to_string(),
            ));
        }
        if let Some(path) = &self.game.questions_file {
            if !path.exists() {
                return Err(Error::ConfigError(format!(
                    "Questions file not found: {}",
                    path.display()
                )));
            }
        }

        // Capture
        if self.capture.max_consecutive_failures == 0 {
            return Err(Error::ConfigError(
                "Max consecutive failures must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Tilt Quiz Configuration

# Tilt estimation (BlazePose ear landmarks)
estimator:
  left_index: 7
  right_index: 8
  default_confidence: 1.0
  fold_half_turn: false

# Tilt selection
selector:
  window_size: 5
  angle_threshold: 15.0
  confidence_threshold: 0.5
  ready_threshold: 0.7
  angle_sign_convention: positive_is_right

# Forward-head posture and tilt axis
posture:
  nose_index: 0
  left_shoulder_index: 11
  right_shoulder_index: 12
  left_ear_index: 7
  right_ear_index: 8
  forward_offset: 0.03
  forward_range: 0.1
  bad_severity: 50
  default_confidence: 0.7
  axis_min_angle: 10.0
  axis_max_angle: 30.0

# Reading transmission (at most 10 per second)
transmit:
  interval_ms: 100

# Quiz game
game:
  result_display_secs: 2.0
  auto_confirm: false

# Frame source
capture:
  max_consecutive_failures: 30
"#;
