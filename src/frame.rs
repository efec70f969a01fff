//! Annotated frame input.
//!
//! An `AnnotatedFrame` is what the detector and pose estimator collaborators hand to
//! the engine for one video frame: frame dimensions, an optional capture timestamp,
//! and every raw candidate detection together with the pose found inside it (if any).
//! No pixels travel with it.
//!
//! Wire format (one JSON object per frame):
//!
//! ```json
//! {"timestamp_s": 2.0, "width": 640, "height": 480,
//!  "detections": [{"bbox": [80, 380, 260, 90], "confidence": 0.91,
//!                  "pose": {"NOSE": {"x": 0.1, "y": 0.5}, "LEFT_HIP": {"x": 0.5, "y": 0.5}}}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::detect::{BoundingBox, Detection, FrameSize, LandmarkSet};

/// One raw candidate plus its pose-estimator result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDetection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    /// `None` when the pose estimator found no subject in the box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<LandmarkSet>,
}

impl AnnotatedDetection {
    pub fn detection(&self) -> Detection {
        Detection {
            bbox: self.bbox,
            confidence: self.confidence,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedFrame {
    /// Sequence number, assigned by the source.
    #[serde(default)]
    pub index: u64,
    /// Capture time in seconds. When absent the caller's clock is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_s: Option<f64>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<AnnotatedDetection>,
}

impl AnnotatedFrame {
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    /// Raw detections as seen by the suppressor.
    pub fn detections(&self) -> Vec<Detection> {
        self.detections.iter().map(|d| d.detection()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BodyPoint;

    #[test]
    fn parses_minimal_frame() {
        let frame: AnnotatedFrame =
            serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
        assert_eq!(frame.size(), FrameSize::new(640, 480));
        assert_eq!(frame.index, 0);
        assert!(frame.timestamp_s.is_none());
        assert!(frame.detections.is_empty());
    }

    #[test]
    fn parses_detection_with_pose() {
        let json = r#"{
            "timestamp_s": 2.5,
            "width": 640,
            "height": 480,
            "detections": [
                {"bbox": [80, 380, 260, 90], "confidence": 0.91,
                 "pose": {"NOSE": {"x": 0.1, "y": 0.5}, "LEFT_HIP": {"x": 0.5, "y": 0.5}}},
                {"bbox": [400, 60, 120, 300], "confidence": 0.4}
            ]
        }"#;
        let frame: AnnotatedFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.timestamp_s, Some(2.5));
        assert_eq!(frame.detections.len(), 2);
        let first = &frame.detections[0];
        assert_eq!(first.bbox, BoundingBox::new(80.0, 380.0, 260.0, 90.0));
        let pose = first.pose.as_ref().expect("pose");
        assert_eq!(pose.get(BodyPoint::LeftHip).map(|lm| lm.y), Some(0.5));
        assert!(frame.detections[1].pose.is_none());
        assert_eq!(frame.detections()[1].confidence, 0.4);
    }

    #[test]
    fn rejects_unknown_body_point() {
        let json = r#"{"width": 10, "height": 10, "detections": [
            {"bbox": [0, 0, 5, 5], "confidence": 0.9, "pose": {"TAIL": {"x": 0.1, "y": 0.1}}}
        ]}"#;
        assert!(serde_json::from_str::<AnnotatedFrame>(json).is_err());
    }
}
