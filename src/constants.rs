//! Constants used throughout the application

/// BlazePose landmark index of the left ear
pub const LEFT_EAR: usize = 7;

/// BlazePose landmark index of the right ear
pub const RIGHT_EAR: usize = 8;

/// Number of landmarks in a full BlazePose skeleton
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Default angle history length
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Default tilt needed to register as left/right, in degrees
pub const DEFAULT_ANGLE_THRESHOLD: f64 = 15.0;

/// Default minimum confidence for a sample to select a side
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Default hold needed before a selection is ready, in seconds
pub const DEFAULT_READY_THRESHOLD: f64 = 0.7;

/// Confidence used when the model exposes no visibility
pub const DEFAULT_LANDMARK_CONFIDENCE: f64 = 1.0;

/// Default interval between outbound readings
pub const DEFAULT_TRANSMIT_INTERVAL_MS: u64 = 100;

/// Readings may not be sent faster than 10 per second
pub const MIN_TRANSMIT_INTERVAL_MS: u64 = 100;

/// How long an answer result stays up before the next question
pub const DEFAULT_RESULT_DISPLAY_SECS: f64 = 2.0;

/// Consecutive unreadable frames tolerated before giving up
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 30;

/// Scoring: points for a correct answer before bonuses
pub const BASE_POINTS: u32 = 100;

/// Scoring: answers faster than this many seconds earn a time bonus
pub const TIME_BONUS_WINDOW_SECS: f64 = 5.0;

/// Scoring: bonus points per second left in the window
pub const TIME_BONUS_PER_SEC: f64 = 10.0;

/// Scoring: multiplier gained per streak step
pub const STREAK_MULTIPLIER_STEP: f64 = 0.1;

/// BlazePose landmark index of the nose
pub const NOSE: usize = 0;

/// BlazePose landmark index of the left shoulder
pub const LEFT_SHOULDER: usize = 11;

/// BlazePose landmark index of the right shoulder
pub const RIGHT_SHOULDER: usize = 12;

/// Posture: horizontal nose offset from the shoulder midpoint ignored as noise
pub const DEFAULT_FORWARD_HEAD_OFFSET: f64 = 0.03;

/// Posture: offset beyond the noise floor that maps to full severity
pub const DEFAULT_FORWARD_HEAD_RANGE: f64 = 0.10;

/// Posture: severity at which posture counts as bad
pub const DEFAULT_BAD_POSTURE_SEVERITY: u8 = 50;

/// Posture: confidence used when no visibility is reported
pub const DEFAULT_POSTURE_CONFIDENCE: f64 = 0.7;

/// Tilt axis: angle in degrees where the axis starts moving
pub const DEFAULT_TILT_AXIS_MIN_ANGLE: f64 = 10.0;

/// Tilt axis: angle in degrees where the axis saturates
pub const DEFAULT_TILT_AXIS_MAX_ANGLE: f64 = 30.0;
