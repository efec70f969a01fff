mod aggregator;
mod cooldown;
mod evaluator;
mod identity;

pub use aggregator::{
    AlertState, FallAggregator, FallAggregatorState, FallPolicy, FrameOutcome,
    DEFAULT_ALERT_DURATION_SECS,
};
pub use cooldown::{CooldownTracker, DEFAULT_COOLDOWN_SECS, DEFAULT_MAX_TRACKED_IDENTITIES};
pub use evaluator::{
    evaluate, proximity_ratio, validated_points, FLOOR_PROXIMITY_THRESHOLD, HEAD_PROXY, HIP_PROXY,
};
pub use identity::{IdentityAssigner, PersonId, PositionalAssigner};
