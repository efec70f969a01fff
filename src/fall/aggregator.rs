use std::collections::{BTreeMap, HashSet};

use anyhow::Result;

use crate::detect::{BoundingBox, FrameSize, LandmarkSet};
use crate::fall::cooldown::{
    CooldownTracker, DEFAULT_COOLDOWN_SECS, DEFAULT_MAX_TRACKED_IDENTITIES,
};
use crate::fall::evaluator::evaluate;
use crate::fall::identity::{IdentityAssigner, PersonId, PositionalAssigner};
use crate::{ensure_parallel, InputError};

/// How long the alert stays active after the latest counted fall.
pub const DEFAULT_ALERT_DURATION_SECS: f64 = 2.0;

/// Timing policy for debounce and alerting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallPolicy {
    pub cooldown_secs: f64,
    pub alert_duration_secs: f64,
}

impl Default for FallPolicy {
    fn default() -> Self {
        Self {
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            alert_duration_secs: DEFAULT_ALERT_DURATION_SECS,
        }
    }
}

impl FallPolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.cooldown_secs.is_finite() || self.cooldown_secs < 0.0 {
            return Err(InputError::InvalidParameter {
                name: "cooldown_secs",
                value: self.cooldown_secs,
            }
            .into());
        }
        if !self.alert_duration_secs.is_finite() || self.alert_duration_secs < 0.0 {
            return Err(InputError::InvalidParameter {
                name: "alert_duration_secs",
                value: self.alert_duration_secs,
            }
            .into());
        }
        Ok(())
    }
}

/// Running fall counter and alert timer.
///
/// Only the aggregator mutates this; callers read it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlertState {
    fall_count: u64,
    last_alert_time: Option<f64>,
}

impl AlertState {
    /// Total counted falls. Never decreases.
    pub fn fall_count(&self) -> u64 {
        self.fall_count
    }

    /// Timestamp of the latest counted fall, if any.
    pub fn last_alert_time(&self) -> Option<f64> {
        self.last_alert_time
    }

    /// Derived alert flag: a fall was counted less than `alert_duration_secs` ago.
    pub fn is_alert_active(&self, now: f64, alert_duration_secs: f64) -> bool {
        self.last_alert_time
            .is_some_and(|last| now - last < alert_duration_secs)
    }

    fn record(&mut self, now: f64) {
        self.fall_count += 1;
        self.last_alert_time = Some(now);
    }
}

/// Mutable state for one video stream.
///
/// Owned by the caller and passed into [`FallAggregator::process_frame`]; separate
/// streams keep separate values.
#[derive(Clone, Debug)]
pub struct FallAggregatorState {
    cooldown: CooldownTracker,
    alert: AlertState,
    last_frame_time: Option<f64>,
    max_concurrent_persons: usize,
}

impl FallAggregatorState {
    /// `max_tracked_identities` caps the cooldown map.
    pub fn new(max_tracked_identities: usize) -> Self {
        Self {
            cooldown: CooldownTracker::new(max_tracked_identities),
            alert: AlertState::default(),
            last_frame_time: None,
            max_concurrent_persons: 0,
        }
    }

    pub fn alert(&self) -> &AlertState {
        &self.alert
    }

    pub fn cooldown(&self) -> &CooldownTracker {
        &self.cooldown
    }

    pub fn fall_count(&self) -> u64 {
        self.alert.fall_count
    }

    pub fn last_frame_time(&self) -> Option<f64> {
        self.last_frame_time
    }

    /// Largest number of boxes seen in a single frame so far.
    pub fn max_concurrent_persons(&self) -> usize {
        self.max_concurrent_persons
    }
}

impl Default for FallAggregatorState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRACKED_IDENTITIES)
    }
}

/// Result of one `process_frame` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutcome {
    /// Identities in box order.
    pub identities: Vec<PersonId>,
    /// Heuristic signal per identity. Stays true while a person is down, including
    /// frames inside the cooldown window.
    pub per_person_fallen: BTreeMap<PersonId, bool>,
    /// Whether this frame counted a new fall for the identity.
    pub per_person_registered: BTreeMap<PersonId, bool>,
    pub frame_has_new_fall: bool,
    /// Falls counted in this frame.
    pub new_falls: u64,
}

/// Orchestrates evaluation, cooldown gating and counting across a frame.
pub struct FallAggregator<A: IdentityAssigner = PositionalAssigner> {
    policy: FallPolicy,
    assigner: A,
}

impl FallAggregator<PositionalAssigner> {
    pub fn new(policy: FallPolicy) -> Result<Self> {
        Self::with_assigner(policy, PositionalAssigner)
    }
}

impl<A: IdentityAssigner> FallAggregator<A> {
    pub fn with_assigner(policy: FallPolicy, assigner: A) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy, assigner })
    }

    pub fn policy(&self) -> FallPolicy {
        self.policy
    }

    pub fn assigner_name(&self) -> &'static str {
        self.assigner.name()
    }

    /// Processes one frame's final boxes and their landmark sets (parallel to `boxes`).
    ///
    /// Fails fast on contract violations (length mismatch, timestamp earlier than the
    /// previous frame, bad identity assignment) without touching `state`. A
    /// degenerate box or missing pose only makes that identity "not fallen".
    pub fn process_frame(
        &mut self,
        boxes: &[BoundingBox],
        landmark_sets: &[Option<LandmarkSet>],
        frame: FrameSize,
        now: f64,
        state: &mut FallAggregatorState,
    ) -> Result<FrameOutcome> {
        ensure_parallel("landmark_sets", boxes.len(), landmark_sets.len())?;
        if !now.is_finite() {
            return Err(InputError::InvalidParameter {
                name: "now",
                value: now,
            }
            .into());
        }
        if let Some(previous) = state.last_frame_time {
            if now < previous {
                return Err(InputError::NonMonotonicTimestamp { previous, now }.into());
            }
        }

        let identities = self.assigner.assign(boxes);
        ensure_parallel("identities", boxes.len(), identities.len())?;
        let mut seen = HashSet::with_capacity(identities.len());
        for &id in &identities {
            if !seen.insert(id) {
                return Err(InputError::DuplicateIdentity { identity: id }.into());
            }
        }

        let cooldown_secs = self.policy.cooldown_secs;
        let pruned = state.cooldown.prune(now, cooldown_secs);
        if pruned > 0 {
            log::debug!("pruned {} elapsed cooldown entries", pruned);
        }

        let frame_height = frame.height as f32;
        let mut outcome = FrameOutcome {
            identities: identities.clone(),
            ..FrameOutcome::default()
        };

        for ((bbox, landmarks), &id) in boxes.iter().zip(landmark_sets).zip(&identities) {
            let signal = match bbox.clip_to(frame) {
                Some(region) => evaluate(&region, landmarks.as_ref(), frame_height),
                None => {
                    log::debug!("identity {}: degenerate region {:?}", id, bbox);
                    None
                }
            };

            let fallen = signal.unwrap_or(false);
            let registered = fallen && state.cooldown.should_register(id, now, cooldown_secs);
            if registered {
                state.alert.record(now);
                outcome.new_falls += 1;
                outcome.frame_has_new_fall = true;
                log::warn!(
                    "fall registered: identity={} t={:.3}s total={}",
                    id,
                    now,
                    state.alert.fall_count
                );
            } else if fallen {
                log::debug!("identity {}: down, inside cooldown", id);
            }

            outcome.per_person_fallen.insert(id, fallen);
            outcome.per_person_registered.insert(id, registered);
        }

        state.last_frame_time = Some(now);
        state.max_concurrent_persons = state.max_concurrent_persons.max(boxes.len());
        Ok(outcome)
    }

    /// Alert flag for `now` under this aggregator's policy.
    pub fn is_alert_active(&self, state: &FallAggregatorState, now: f64) -> bool {
        state
            .alert
            .is_alert_active(now, self.policy.alert_duration_secs)
    }
}
