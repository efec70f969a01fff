use crate::detect::BoundingBox;

/// Per-frame identity label for a detected person.
///
/// Unique within one frame. Nothing guarantees the same person keeps the same label
/// in the next frame.
pub type PersonId = usize;

/// Assigns identities to the final boxes of a frame.
///
/// Implementations must return exactly one identity per box, with no duplicates.
/// The aggregator checks both and rejects the frame otherwise.
pub trait IdentityAssigner {
    /// Assigner identifier, for logs.
    fn name(&self) -> &'static str;

    fn assign(&mut self, boxes: &[BoundingBox]) -> Vec<PersonId>;
}

/// Identity by enumeration order of the suppressed boxes.
///
/// A person's index shifts whenever other people enter or leave the frame or the
/// suppression order changes; cooldown state follows the index, not the person.
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionalAssigner;

impl IdentityAssigner for PositionalAssigner {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn assign(&mut self, boxes: &[BoundingBox]) -> Vec<PersonId> {
        (0..boxes.len()).collect()
    }
}
