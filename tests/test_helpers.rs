//! Helper functions and utilities for tests

#![allow(dead_code)]

use head_tilt_quiz::constants::{LEFT_EAR, NUM_POSE_LANDMARKS, RIGHT_EAR};
use head_tilt_quiz::landmarks::{Landmark, PoseFrame};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Full BlazePose skeleton with the ears tilted by `degrees`.
///
/// Positive angles put the left ear below the right one in image space.
pub fn tilted_skeleton(degrees: f64, visibility: Option<f64>) -> Vec<Landmark> {
    let radians = degrees.to_radians();
    let half = 0.1;
    let mut left = Landmark::new(0.5 + half * radians.cos(), 0.4 + half * radians.sin());
    let mut right = Landmark::new(0.5 - half * radians.cos(), 0.4 - half * radians.sin());
    if let Some(v) = visibility {
        left = left.with_visibility(v);
        right = right.with_visibility(v);
    }

    let mut landmarks = vec![Landmark::new(0.5, 0.5); NUM_POSE_LANDMARKS];
    landmarks[LEFT_EAR] = left;
    landmarks[RIGHT_EAR] = right;
    landmarks
}

/// Frame with one subject tilted by `degrees`
pub fn tilted_frame(timestamp_ms: u64, degrees: f64) -> PoseFrame {
    PoseFrame {
        timestamp_ms,
        subjects: vec![tilted_skeleton(degrees, Some(0.9))],
        key: None,
    }
}

/// Frame with nobody in view
pub fn empty_frame(timestamp_ms: u64) -> PoseFrame {
    PoseFrame {
        timestamp_ms,
        subjects: Vec::new(),
        key: None,
    }
}

/// Same frame with a key press attached
pub fn with_key(mut frame: PoseFrame, key: char) -> PoseFrame {
    frame.key = Some(key);
    frame
}

/// Instant `ms` milliseconds after `start`
pub fn at(start: Instant, ms: u64) -> Instant {
    start + Duration::from_millis(ms)
}

/// Serialize frames as JSON lines
pub fn to_json_lines(frames: &[PoseFrame]) -> String {
    frames
        .iter()
        .map(|f| serde_json::to_string(f).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writer whose contents stay readable after it is moved into a sink
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
