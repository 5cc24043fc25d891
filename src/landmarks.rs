//! Pose landmarks as delivered by the external pose model.
//!
//! The model itself is not part of this crate. Each inference is handed over
//! as a [`PoseFrame`]: a timestamp, zero or more detected subjects, and the
//! key pressed while the frame was on screen (if any).

use crate::Result;
use serde::{Deserialize, Serialize};

/// A single body keypoint in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position in [0, 1]
    pub x: f64,
    /// Vertical position in [0, 1], growing downwards
    pub y: f64,
    /// Relative depth, when the model provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Visibility / presence score in [0, 1], when the model provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    /// Create a landmark without depth or visibility
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    /// Attach a visibility score
    #[must_use]
    pub const fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// One frame's worth of pose model output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Capture time in milliseconds since the start of the stream
    pub timestamp_ms: u64,
    /// Landmark sets, one per detected subject
    #[serde(default)]
    pub subjects: Vec<Vec<Landmark>>,
    /// Key pressed during this frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<char>,
}

impl PoseFrame {
    /// Parse a frame from one line of JSON
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Landmarks of the first detected subject.
    ///
    /// Only one subject is ever tracked; any others are ignored.
    pub fn primary_subject(&self) -> Option<&[Landmark]> {
        self.subjects.first().map(Vec::as_slice)
    }

    pub fn has_subject(&self) -> bool {
        !self.subjects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_with_visibility() {
        let line = r#"{"timestamp_ms": 40, "subjects": [[{"x": 0.5, "y": 0.4, "visibility": 0.9}]]}"#;
        let frame = PoseFrame::from_json_line(line).unwrap();

        assert_eq!(frame.timestamp_ms, 40);
        assert!(frame.has_subject());
        let subject = frame.primary_subject().unwrap();
        assert_eq!(subject[0].visibility, Some(0.9));
        assert_eq!(subject[0].z, None);
        assert_eq!(frame.key, None);
    }

    #[test]
    fn test_parse_frame_without_subjects() {
        let frame = PoseFrame::from_json_line(r#"{"timestamp_ms": 0, "key": " "}"#).unwrap();
        assert!(!frame.has_subject());
        assert!(frame.primary_subject().is_none());
        assert_eq!(frame.key, Some(' '));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(PoseFrame::from_json_line("not json").is_err());
    }
}
