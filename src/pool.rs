//! Fixed-capacity actor pool
//!
//! A small slot map for transient actors (runners, raindrops). Slots are
//! addressed by index, never reallocated, and a full pool rejects spawns
//! instead of growing, so at most `SLOTS` actors are alive at any time.

/// Fixed pool of `SLOTS` optional actors
#[derive(Debug, Clone)]
pub struct SlotPool<T: Copy, const SLOTS: usize> {
    slots: [Option<T>; SLOTS],
}

impl<T: Copy, const SLOTS: usize> Default for SlotPool<T, SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const SLOTS: usize> SlotPool<T, SLOTS> {
    /// Create an empty pool
    pub const fn new() -> Self {
        Self {
            slots: [None; SLOTS],
        }
    }

    pub const fn capacity(&self) -> usize {
        SLOTS
    }

    /// Place an actor in the first free slot
    ///
    /// Returns the actor back if every slot is taken.
    pub fn spawn(&mut self, actor: T) -> Result<usize, T> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(actor);
        };
        self.slots[index] = Some(actor);
        Ok(index)
    }

    /// Number of live actors
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Live actors in slot order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Advance every live actor; actors for which `keep` returns false are retired
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for slot in &mut self.slots {
            if let Some(actor) = slot {
                if !keep(actor) {
                    *slot = None;
                }
            }
        }
    }

    /// Retire every actor
    pub fn clear(&mut self) {
        self.slots = [None; SLOTS];
    }
}

/// Spawn probability (percent) after `frames_since_spawn` idle frames.
///
/// Ramps linearly from 0 to 100 over `interval` frames, so actors arrive
/// roughly once per interval without a fixed cadence.
pub fn spawn_chance(frames_since_spawn: u32, interval: u32) -> u32 {
    (frames_since_spawn.saturating_mul(100) / interval.max(1)).min(100)
}
