use std::collections::HashMap;

use crate::fall::identity::PersonId;

/// Minimum seconds between two counted falls for the same identity.
pub const DEFAULT_COOLDOWN_SECS: f64 = 1.0;

/// Hard cap on cooldown entries kept at once.
pub const DEFAULT_MAX_TRACKED_IDENTITIES: usize = 64;

/// Per-identity debounce gate.
///
/// Entries are created on the first registered fall of an identity and overwritten on
/// every later one. The map stays bounded two ways:
/// - [`CooldownTracker::prune`] drops entries older than the cooldown window. Such an
///   entry gates exactly like an absent one for any later timestamp, so pruning is
///   not observable through [`CooldownTracker::should_register`].
/// - Inserting a new identity at capacity evicts the oldest entry whose window has
///   elapsed. An entry still inside its window is never evicted, so when every entry
///   is live the map grows past `capacity` instead of losing a debounce.
#[derive(Clone, Debug)]
pub struct CooldownTracker {
    last_fall: HashMap<PersonId, f64>,
    capacity: usize,
}

impl CooldownTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            last_fall: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns true and records `now` iff `identity` has no entry or its last
    /// registered fall is more than `cooldown_secs` ago. Otherwise leaves state untouched.
    pub fn should_register(&mut self, identity: PersonId, now: f64, cooldown_secs: f64) -> bool {
        if let Some(&last) = self.last_fall.get(&identity) {
            if now - last <= cooldown_secs {
                return false;
            }
        } else if self.last_fall.len() >= self.capacity {
            self.evict_oldest_elapsed(now, cooldown_secs);
        }
        self.last_fall.insert(identity, now);
        true
    }

    /// Drops entries whose cooldown has already elapsed at `now`. Returns the number removed.
    pub fn prune(&mut self, now: f64, cooldown_secs: f64) -> usize {
        let before = self.last_fall.len();
        self.last_fall.retain(|_, last| now - *last <= cooldown_secs);
        before - self.last_fall.len()
    }

    pub fn last_fall(&self, identity: PersonId) -> Option<f64> {
        self.last_fall.get(&identity).copied()
    }

    pub fn len(&self) -> usize {
        self.last_fall.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fall.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest_elapsed(&mut self, now: f64, cooldown_secs: f64) {
        let oldest = self
            .last_fall
            .iter()
            .filter(|(_, last)| now - **last > cooldown_secs)
            .min_by(|a, b| a.1.total_cmp(b.1).then(a.0.cmp(b.0)))
            .map(|(id, _)| *id);
        match oldest {
            Some(id) => {
                self.last_fall.remove(&id);
                log::debug!("cooldown tracker at capacity; evicted identity {}", id);
            }
            None => log::debug!(
                "cooldown tracker over capacity ({} live entries, capacity {})",
                self.last_fall.len() + 1,
                self.capacity
            ),
        }
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRACKED_IDENTITIES)
    }
}
