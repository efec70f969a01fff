use anyhow::Result;

use crate::detect::result::{BoundingBox, Detection};
use crate::{ensure_parallel, InputError};

/// Default minimum score for a candidate to enter suppression.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.3;
/// Default IoU above which a lower-scoring box is treated as a duplicate.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.4;

/// Thresholds for non-maximum suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuppressionParams {
    pub score_threshold: f32,
    pub overlap_threshold: f32,
}

impl Default for SuppressionParams {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}

impl SuppressionParams {
    pub fn validate(&self) -> Result<()> {
        if !self.score_threshold.is_finite() {
            return Err(InputError::InvalidParameter {
                name: "score_threshold",
                value: self.score_threshold as f64,
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.overlap_threshold) {
            return Err(InputError::InvalidParameter {
                name: "overlap_threshold",
                value: self.overlap_threshold as f64,
            }
            .into());
        }
        Ok(())
    }
}

/// Greedy non-maximum suppression returning the surviving input indices.
///
/// Candidates scoring below `score_threshold` (and non-finite scores) are dropped
/// first. The rest are visited by descending score, ties broken by lower input
/// index; a candidate is kept unless its IoU with an already kept box exceeds
/// `overlap_threshold`. The returned order is the visit order, which is the order
/// identity indices are assigned in.
pub fn suppress_indices(
    boxes: &[BoundingBox],
    scores: &[f32],
    score_threshold: f32,
    overlap_threshold: f32,
) -> Result<Vec<usize>> {
    ensure_parallel("scores", boxes.len(), scores.len())?;
    SuppressionParams {
        score_threshold,
        overlap_threshold,
    }
    .validate()?;

    let mut order: Vec<usize> = (0..boxes.len())
        .filter(|&i| scores[i].is_finite() && scores[i] >= score_threshold)
        .collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

    let mut kept: Vec<usize> = Vec::with_capacity(order.len());
    'candidates: for idx in order {
        for &k in &kept {
            if boxes[k].iou(&boxes[idx]) > overlap_threshold {
                continue 'candidates;
            }
        }
        kept.push(idx);
    }
    Ok(kept)
}

/// Greedy non-maximum suppression returning the surviving boxes, unmodified.
pub fn suppress(
    boxes: &[BoundingBox],
    scores: &[f32],
    score_threshold: f32,
    overlap_threshold: f32,
) -> Result<Vec<BoundingBox>> {
    let kept = suppress_indices(boxes, scores, score_threshold, overlap_threshold)?;
    Ok(kept.into_iter().map(|i| boxes[i]).collect())
}

/// Detector-boundary filter: keeps candidates strictly above `floor`.
pub fn apply_confidence_floor(detections: &[Detection], floor: f32) -> Vec<usize> {
    detections
        .iter()
        .enumerate()
        .filter(|(_, det)| det.confidence > floor)
        .map(|(i, _)| i)
        .collect()
}
