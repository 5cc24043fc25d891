//! Head tilt gesture classification for hands-free two-choice input.
//!
//! A pose model reports body landmarks per frame. This library turns the two
//! ear landmarks into a roll angle, debounces that angle into a LEFT / RIGHT
//! / NEUTRAL selection, and only lets a selection count once it has been held
//! long enough. The resulting readings drive a small quiz game.
//!
//! The pipeline consists of:
//! 1. Tilt estimation from the ear landmarks ([`estimator`])
//! 2. Moving-average smoothing and hold confirmation ([`selector`])
//! 3. Publishing readings to consumers ([`sink`])
//! 4. Turning confirmed selections into quiz answers ([`controller`], [`quiz`])
//!
//! # Examples
//!
//! ## Classifying a tilt
//!
//! ```no_run
//! use head_tilt_quiz::{estimator::TiltEstimator, landmarks::Landmark, selector::TiltSelector};
//! use std::time::Instant;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let estimator = TiltEstimator::default();
//! let mut selector = TiltSelector::default();
//!
//! // 33 BlazePose landmarks; the ears are 7 (left) and 8 (right)
//! let mut landmarks = vec![Landmark::new(0.5, 0.5); 33];
//! landmarks[7] = Landmark::new(0.6, 0.62).with_visibility(0.9);
//! landmarks[8] = Landmark::new(0.4, 0.5).with_visibility(0.8);
//!
//! let sample = estimator.estimate(&landmarks)?;
//! let reading = selector.update(sample.angle, sample.confidence, Instant::now());
//! println!("{} at {:.1}° (held {:.2}s)", reading.selection, reading.angle, reading.hold_time);
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying recorded frames
//!
//! ```no_run
//! use head_tilt_quiz::app::{AppConfig, FrameSource, RunMode, TiltApp};
//! use head_tilt_quiz::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig {
//!     source: FrameSource::File("session.jsonl".into()),
//!     mode: RunMode::Quiz,
//!     settings: Config::from_file("config.yaml")?,
//! };
//! let summary = TiltApp::new(config)?.run()?;
//! println!("{} frames, {} answers", summary.frames_processed, summary.answers);
//! # Ok(())
//! # }
//! ```

/// Landmark and frame types delivered by the pose model
pub mod landmarks;

/// Head roll angle from the ear landmarks
pub mod estimator;

/// Debounced, hold-confirmed side selection
pub mod selector;

/// Forward-head posture and analog tilt axis
pub mod posture;

/// Signal filtering algorithms for smoothing tilt angles
pub mod filters;

/// Selection readings and their wire format
pub mod reading;

/// Reading destinations
pub mod sink;

/// Question bank, scoring and game sessions
pub mod quiz;

/// Per-frame decision cycle driving the quiz
pub mod controller;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
