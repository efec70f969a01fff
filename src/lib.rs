//! Fallwatch
//!
//! This crate implements the fall-decision and debounce engine for annotated video frames.
//!
//! # Architecture
//!
//! Each frame arrives already annotated by two external collaborators: a person detector
//! (candidate boxes with confidences) and a pose estimator (normalized body landmarks per
//! box). The engine never computes either; it only decides.
//!
//! Per frame, in order:
//!
//! 1. **Confidence floor**: weak candidates are dropped at the detector boundary.
//! 2. **Suppression**: greedy non-maximum suppression removes duplicate boxes.
//! 3. **Identity**: surviving boxes get a per-frame positional identity index.
//! 4. **Evaluation**: head/hip floor-proximity heuristic per box.
//! 5. **Cooldown**: a per-identity debounce gate turns signals into counted falls.
//! 6. **Aggregation**: the fall counter and alert timer are updated.
//!
//! # Module Structure
//!
//! - `detect`: geometry, landmarks, non-maximum suppression
//! - `fall`: evaluator, cooldown tracker, identity assignment, aggregator
//! - `frame`: annotated frame input format
//! - `ingest`: annotated frame sources (JSON Lines files, synthetic scenarios)
//! - `monitor`: per-stream pipeline producing `FrameReport`s
//! - `config`: daemon configuration (file + env overrides)

use std::fmt;

pub mod config;
pub mod detect;
pub mod fall;
pub mod frame;
pub mod ingest;
pub mod monitor;
pub mod ui;

pub use detect::{
    suppress, suppress_indices, BodyPoint, BoundingBox, Detection, FrameSize, Landmark,
    LandmarkSet, Region, SuppressionParams,
};
pub use fall::{
    evaluate, AlertState, CooldownTracker, FallAggregator, FallAggregatorState, FallPolicy,
    FrameOutcome, IdentityAssigner, PersonId, PositionalAssigner, FLOOR_PROXIMITY_THRESHOLD,
};
pub use frame::{AnnotatedDetection, AnnotatedFrame};
pub use ingest::{file::FileConfig, FileSource};
pub use monitor::{Clock, FrameReport, MonotonicClock, Monitor, PersonReport};

// -------------------- Input Contract Errors --------------------

/// Contract violations by the caller.
///
/// These fail fast and are never repaired silently (no truncation of mismatched
/// sequences, no reordering of timestamps). Per-box problems such as a degenerate
/// region or a missing pose are NOT errors; they degrade to "not fallen".
#[derive(Clone, Debug, PartialEq)]
pub enum InputError {
    /// Parallel sequences with different lengths.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A frame timestamp earlier than the previous frame's.
    NonMonotonicTimestamp { previous: f64, now: f64 },
    /// Two boxes in the same frame were given the same identity.
    DuplicateIdentity { identity: usize },
    /// A threshold or duration outside its valid range.
    InvalidParameter { name: &'static str, value: f64 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "invalid input: {} has length {}, expected {}",
                what, actual, expected
            ),
            InputError::NonMonotonicTimestamp { previous, now } => write!(
                f,
                "invalid input: timestamp {:.3}s is earlier than previous frame {:.3}s",
                now, previous
            ),
            InputError::DuplicateIdentity { identity } => write!(
                f,
                "invalid input: identity {} assigned to more than one box",
                identity
            ),
            InputError::InvalidParameter { name, value } => {
                write!(f, "invalid input: {} = {} is out of range", name, value)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Ensures two parallel sequences line up.
pub(crate) fn ensure_parallel(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> anyhow::Result<()> {
    if expected != actual {
        return Err(InputError::LengthMismatch {
            what,
            expected,
            actual,
        }
        .into());
    }
    Ok(())
}
