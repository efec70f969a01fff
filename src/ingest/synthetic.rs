// ----------------------------------------------------------------------------
// Synthetic scenario (stub://) for demos and tests
// ----------------------------------------------------------------------------
//
// A scripted 8 second loop in a 640x480 frame:
// - person A stands, falls at 2s, lies on the floor until 5s, then stands up
// - person B stands at the right edge the whole time; its pose is missed on
//   every 45th frame
// - the detector reports a weaker duplicate box for A and a low-confidence
//   spurious box in the corner

use anyhow::{anyhow, Result};

use crate::detect::{BodyPoint, BoundingBox, FrameSize, LandmarkSet};
use crate::frame::{AnnotatedDetection, AnnotatedFrame};

pub const SCENARIO_FRAME_WIDTH: u32 = 640;
pub const SCENARIO_FRAME_HEIGHT: u32 = 480;

/// Scenario names accepted after `stub://`.
pub const SCENARIO_NAMES: &[&str] = &["fall_scenario"];

const CYCLE_SECS: f64 = 8.0;
const FALL_START_SECS: f64 = 2.0;
const FALL_END_SECS: f64 = 5.0;
const POSE_MISS_EVERY: u64 = 45;

pub struct SyntheticScenario {
    name: String,
    fps: u32,
    frame_count: u64,
}

impl SyntheticScenario {
    pub fn new(name: &str, fps: u32) -> Result<Self> {
        if !SCENARIO_NAMES.contains(&name) {
            return Err(anyhow!(
                "unknown synthetic scenario {:?} (available: {})",
                name,
                SCENARIO_NAMES.join(", ")
            ));
        }
        Ok(Self {
            name: name.to_string(),
            fps: fps.max(1),
            frame_count: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reset(&mut self) {
        self.frame_count = 0;
    }

    pub fn next_frame(&mut self) -> AnnotatedFrame {
        let t = self.frame_count as f64 / self.fps as f64;
        let phase = t % CYCLE_SECS;
        let lying = (FALL_START_SECS..FALL_END_SECS).contains(&phase);
        let frame = FrameSize::new(SCENARIO_FRAME_WIDTH, SCENARIO_FRAME_HEIGHT);

        let person_a = if lying {
            BoundingBox::from_normalized_corners(0.125, 0.79, 0.53, 0.98, frame)
        } else {
            BoundingBox::from_normalized_corners(0.16, 0.125, 0.35, 0.75, frame)
        };
        let pose_a = if lying { lying_pose() } else { standing_pose() };
        let duplicate_a = BoundingBox::new(
            person_a.x + 4.0,
            person_a.y + 2.0,
            person_a.width - 4.0,
            person_a.height - 2.0,
        );
        let person_b = BoundingBox::from_normalized_corners(0.66, 0.17, 0.83, 0.77, frame);
        let pose_b = (self.frame_count % POSE_MISS_EVERY != 0).then(standing_pose);

        let detections = vec![
            AnnotatedDetection {
                bbox: duplicate_a,
                confidence: 0.55,
                pose: None,
            },
            AnnotatedDetection {
                bbox: person_b,
                confidence: 0.85,
                pose: pose_b,
            },
            AnnotatedDetection {
                bbox: person_a,
                confidence: 0.92,
                pose: Some(pose_a),
            },
            AnnotatedDetection {
                bbox: BoundingBox::new(0.0, 0.0, 40.0, 40.0),
                confidence: 0.2,
                pose: None,
            },
        ];

        self.frame_count += 1;
        AnnotatedFrame {
            index: 0,
            timestamp_s: Some(t),
            width: SCENARIO_FRAME_WIDTH,
            height: SCENARIO_FRAME_HEIGHT,
            detections,
        }
    }
}

fn standing_pose() -> LandmarkSet {
    LandmarkSet::new()
        .with(BodyPoint::Nose, 0.5, 0.08)
        .with(BodyPoint::LeftShoulder, 0.62, 0.2)
        .with(BodyPoint::RightShoulder, 0.38, 0.2)
        .with(BodyPoint::LeftHip, 0.58, 0.52)
        .with(BodyPoint::RightHip, 0.42, 0.52)
        .with(BodyPoint::LeftAnkle, 0.56, 0.96)
        .with(BodyPoint::RightAnkle, 0.44, 0.96)
}

fn lying_pose() -> LandmarkSet {
    LandmarkSet::new()
        .with(BodyPoint::Nose, 0.08, 0.45)
        .with(BodyPoint::LeftShoulder, 0.22, 0.35)
        .with(BodyPoint::RightShoulder, 0.22, 0.65)
        .with(BodyPoint::LeftHip, 0.55, 0.4)
        .with(BodyPoint::RightHip, 0.55, 0.6)
        .with(BodyPoint::LeftAnkle, 0.94, 0.42)
        .with(BodyPoint::RightAnkle, 0.94, 0.58)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fall::evaluate;

    fn person_a(frame: &AnnotatedFrame) -> &AnnotatedDetection {
        frame
            .detections
            .iter()
            .find(|d| d.confidence > 0.9)
            .expect("person A")
    }

    fn signal_for(frame: &AnnotatedFrame, det: &AnnotatedDetection) -> Option<bool> {
        let region = det.bbox.clip_to(frame.size())?;
        evaluate(&region, det.pose.as_ref(), frame.height as f32)
    }

    #[test]
    fn standing_then_lying_then_standing() {
        let mut scenario = SyntheticScenario::new("fall_scenario", 10).unwrap();
        let frames: Vec<AnnotatedFrame> = (0..80).map(|_| scenario.next_frame()).collect();

        // t=1.0 standing, t=3.0 lying, t=6.0 standing again
        for (idx, expected) in [(10, false), (30, true), (60, false)] {
            let frame = &frames[idx];
            let a = person_a(frame);
            assert_eq!(signal_for(frame, a), Some(expected), "frame {}", idx);
        }
    }

    #[test]
    fn person_b_never_falls_and_misses_pose_periodically() {
        let mut scenario = SyntheticScenario::new("fall_scenario", 15).unwrap();
        for n in 0..(POSE_MISS_EVERY + 1) {
            let frame = scenario.next_frame();
            let b = frame
                .detections
                .iter()
                .find(|d| (d.confidence - 0.85).abs() < 1e-6)
                .expect("person B");
            if n % POSE_MISS_EVERY == 0 {
                assert!(b.pose.is_none());
            } else {
                assert_eq!(signal_for(&frame, b), Some(false));
            }
        }
    }

    #[test]
    fn unknown_scenario_is_rejected() {
        let err = SyntheticScenario::new("hallway", 15).err().expect("unknown name");
        assert!(err.to_string().contains("fall_scenario"));
    }

    #[test]
    fn timestamps_follow_frame_rate() {
        let mut scenario = SyntheticScenario::new("fall_scenario", 4).unwrap();
        let ts: Vec<f64> = (0..3)
            .map(|_| scenario.next_frame().timestamp_s.unwrap())
            .collect();
        assert_eq!(ts, vec![0.0, 0.25, 0.5]);
        scenario.reset();
        assert_eq!(scenario.next_frame().timestamp_s, Some(0.0));
        assert_eq!(scenario.name(), "fall_scenario");
    }
}
