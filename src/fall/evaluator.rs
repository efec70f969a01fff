//! Floor-proximity fall heuristic.
//!
//! A subject is flagged when the head proxy or the hip proxy lies in the bottom fifth
//! of the frame. This is a single-frame test with no velocity component: a person
//! lying down, crouching low, or standing close to the bottom edge is flagged too.

use crate::detect::{BodyPoint, LandmarkSet, Region};

/// Ratio of frame height above which a proxy point counts as "near the floor".
pub const FLOOR_PROXIMITY_THRESHOLD: f32 = 0.8;

pub const HEAD_PROXY: BodyPoint = BodyPoint::Nose;
pub const HIP_PROXY: BodyPoint = BodyPoint::LeftHip;

/// Evaluates one box.
///
/// Returns `None` when there is no usable pose: landmarks absent, no landmark inside
/// the region, or a degenerate frame height. Otherwise `Some(true)` iff the head or
/// hip proxy ratio is strictly above [`FLOOR_PROXIMITY_THRESHOLD`].
pub fn evaluate(
    region: &Region,
    landmarks: Option<&LandmarkSet>,
    frame_height: f32,
) -> Option<bool> {
    let landmarks = landmarks?;
    if !frame_height.is_finite() || frame_height <= 0.0 {
        return None;
    }
    if validated_points(region, landmarks).is_empty() {
        return None;
    }

    let near_floor = |point: BodyPoint| {
        landmarks
            .get(point)
            .map(|lm| proximity_ratio(region, lm.y, frame_height) > FLOOR_PROXIMITY_THRESHOLD)
            .unwrap_or(false)
    };
    Some(near_floor(HEAD_PROXY) || near_floor(HIP_PROXY))
}

/// Absolute vertical position of a normalized landmark as a fraction of frame height.
pub fn proximity_ratio(region: &Region, normalized_y: f32, frame_height: f32) -> f32 {
    (region.y + normalized_y * region.box_height) / frame_height
}

/// Landmarks that map inside the region, in absolute frame coordinates.
///
/// Positions are truncated to whole pixels before the containment test, so a point a
/// fraction of a pixel past an edge still validates.
pub fn validated_points(
    region: &Region,
    landmarks: &LandmarkSet,
) -> Vec<(BodyPoint, (f32, f32))> {
    landmarks
        .iter()
        .filter_map(|(point, lm)| {
            let (px, py) = region.to_frame(lm.x, lm.y);
            let (px, py) = (px.trunc(), py.trunc());
            region.contains(px, py).then_some((point, (px, py)))
        })
        .collect()
}
