use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body keypoints reported by the pose estimator.
///
/// The evaluator only relies on `Nose` (head proxy) and `LeftHip` (hip proxy); the
/// remaining points take part in the region validity check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyPoint {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

/// Normalized landmark position relative to the box region, nominally in `[0, 1]`.
///
/// Estimators may report points slightly outside the unit square; those are kept
/// here and filtered by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// Landmarks for one box, keyed by body point.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: BTreeMap<BodyPoint, Landmark>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, point: BodyPoint, x: f32, y: f32) -> Self {
        self.insert(point, x, y);
        self
    }

    pub fn insert(&mut self, point: BodyPoint, x: f32, y: f32) {
        self.points.insert(point, Landmark { x, y });
    }

    pub fn get(&self, point: BodyPoint) -> Option<Landmark> {
        self.points.get(&point).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPoint, Landmark)> + '_ {
        self.points.iter().map(|(point, lm)| (*point, *lm))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(BodyPoint, Landmark)> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = (BodyPoint, Landmark)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_set_uses_point_names_as_keys() {
        let set = LandmarkSet::new()
            .with(BodyPoint::Nose, 0.5, 0.1)
            .with(BodyPoint::LeftHip, 0.45, 0.55);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"{"NOSE":{"x":0.5,"y":0.1},"LEFT_HIP":{"x":0.45,"y":0.55}}"#
        );
        let back: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn insert_overwrites_point() {
        let mut set = LandmarkSet::new();
        set.insert(BodyPoint::Nose, 0.1, 0.1);
        set.insert(BodyPoint::Nose, 0.2, 0.9);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(BodyPoint::Nose), Some(Landmark { x: 0.2, y: 0.9 }));
        assert_eq!(set.get(BodyPoint::LeftHip), None);
    }
}
