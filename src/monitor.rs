//! Per-stream pipeline.
//!
//! `Monitor` runs the full per-frame sequence (confidence floor, suppression,
//! aggregation) for one video stream and produces the `FrameReport` handed to the
//! presentation layer. Each stream gets its own `Monitor`, so state never leaks
//! between streams.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::config::MonitorConfig;
use crate::detect::{apply_confidence_floor, suppress_indices, BoundingBox, SuppressionParams};
use crate::fall::{
    FallAggregator, FallAggregatorState, FallPolicy, IdentityAssigner, PersonId,
    PositionalAssigner,
};
use crate::frame::AnnotatedFrame;

/// Time source for frames that carry no timestamp.
pub trait Clock {
    /// Seconds on a monotonic scale.
    fn now_secs(&mut self) -> f64;
}

/// Seconds elapsed since construction.
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_secs(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// One person in a processed frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PersonReport {
    pub id: PersonId,
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub fallen: bool,
    pub registered: bool,
}

/// Everything the presentation layer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: u64,
    pub timestamp_s: f64,
    pub person_count: usize,
    pub persons: Vec<PersonReport>,
    pub frame_has_new_fall: bool,
    pub fall_count: u64,
    pub alert_active: bool,
}

pub struct Monitor<A: IdentityAssigner = PositionalAssigner> {
    confidence_floor: f32,
    suppression: SuppressionParams,
    aggregator: FallAggregator<A>,
    state: FallAggregatorState,
    frames_processed: u64,
}

impl Monitor<PositionalAssigner> {
    pub fn new(cfg: &MonitorConfig) -> Result<Self> {
        Self::with_assigner(cfg, PositionalAssigner)
    }
}

impl<A: IdentityAssigner> Monitor<A> {
    pub fn with_assigner(cfg: &MonitorConfig, assigner: A) -> Result<Self> {
        let suppression = cfg.suppression_params();
        suppression.validate()?;
        let aggregator = FallAggregator::with_assigner(cfg.fall_policy(), assigner)?;
        log::debug!(
            "monitor: floor={} score>={} iou>{} cooldown={}s alert={}s identities={}",
            cfg.detection.confidence_floor,
            suppression.score_threshold,
            suppression.overlap_threshold,
            cfg.fall.cooldown_secs,
            cfg.fall.alert_duration_secs,
            aggregator.assigner_name()
        );
        Ok(Self {
            confidence_floor: cfg.detection.confidence_floor,
            suppression,
            aggregator,
            state: FallAggregatorState::new(cfg.fall.max_tracked_identities),
            frames_processed: 0,
        })
    }

    /// Processes one annotated frame observed at `now` (seconds, monotonic).
    pub fn process(&mut self, frame: &AnnotatedFrame, now: f64) -> Result<FrameReport> {
        let detections = frame.detections();
        let confident = apply_confidence_floor(&detections, self.confidence_floor);

        let boxes: Vec<BoundingBox> = confident.iter().map(|&i| detections[i].bbox).collect();
        let scores: Vec<f32> = confident
            .iter()
            .map(|&i| detections[i].confidence)
            .collect();
        let kept = suppress_indices(
            &boxes,
            &scores,
            self.suppression.score_threshold,
            self.suppression.overlap_threshold,
        )?;

        // map survivors back to the frame's candidate list
        let survivors: Vec<usize> = kept.iter().map(|&k| confident[k]).collect();
        let final_boxes: Vec<BoundingBox> = survivors
            .iter()
            .map(|&i| frame.detections[i].bbox)
            .collect();
        let landmark_sets: Vec<_> = survivors
            .iter()
            .map(|&i| frame.detections[i].pose.clone())
            .collect();

        let outcome = self.aggregator.process_frame(
            &final_boxes,
            &landmark_sets,
            frame.size(),
            now,
            &mut self.state,
        )?;
        self.frames_processed += 1;

        let persons = survivors
            .iter()
            .zip(&outcome.identities)
            .map(|(&i, &id)| PersonReport {
                id,
                bbox: frame.detections[i].bbox,
                confidence: frame.detections[i].confidence,
                fallen: outcome.per_person_fallen.get(&id).copied().unwrap_or(false),
                registered: outcome
                    .per_person_registered
                    .get(&id)
                    .copied()
                    .unwrap_or(false),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "frame {}: {} candidates, {} confident, {} persons, new_falls={}",
            frame.index,
            detections.len(),
            confident.len(),
            persons.len(),
            outcome.new_falls
        );

        Ok(FrameReport {
            frame_index: frame.index,
            timestamp_s: now,
            person_count: persons.len(),
            persons,
            frame_has_new_fall: outcome.frame_has_new_fall,
            fall_count: self.state.fall_count(),
            alert_active: self.aggregator.is_alert_active(&self.state, now),
        })
    }

    /// Alert flag at an arbitrary time, e.g. when redrawing a paused frame.
    pub fn alert_active(&self, now: f64) -> bool {
        self.aggregator.is_alert_active(&self.state, now)
    }

    pub fn state(&self) -> &FallAggregatorState {
        &self.state
    }

    pub fn policy(&self) -> FallPolicy {
        self.aggregator.policy()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
