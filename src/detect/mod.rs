mod landmarks;
mod result;
mod suppress;

pub use landmarks::{BodyPoint, Landmark, LandmarkSet};
pub use result::{BoundingBox, Detection, FrameSize, Region};
pub use suppress::{
    apply_confidence_floor, suppress, suppress_indices, SuppressionParams,
    DEFAULT_OVERLAP_THRESHOLD, DEFAULT_SCORE_THRESHOLD,
};
