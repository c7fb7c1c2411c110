//! Cached per-fan mode and the speed ceiling last sent to firmware.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::fan::{FanIndex, FanMode};

/// Factory ceiling; also what `QMOD 2` restores.
pub const DEFAULT_CEILING: u8 = 255;

/// In-memory record of what this process last told the hardware.
///
/// Each fan slot has its own lock so that the controller can hold it across a
/// firmware round-trip. Both slots exist even on single-fan platforms because
/// the automatic-mode call is global.
pub struct FanStateStore {
    modes: [Mutex<FanMode>; 2],
    ceiling: Mutex<u8>,
}

/// Both fan slots, locked in index order.
pub struct AllFansGuard<'a> {
    guards: [MutexGuard<'a, FanMode>; 2],
}

impl AllFansGuard<'_> {
    pub fn set_all(&mut self, mode: FanMode) {
        for guard in self.guards.iter_mut() {
            **guard = mode;
        }
    }

    pub fn get(&self, fan: FanIndex) -> FanMode {
        *self.guards[fan.as_index()]
    }
}

impl FanStateStore {
    pub fn new() -> Self {
        Self {
            modes: [Mutex::new(FanMode::Automatic), Mutex::new(FanMode::Automatic)],
            ceiling: Mutex::new(DEFAULT_CEILING),
        }
    }

    pub fn get_mode(&self, fan: FanIndex) -> FanMode {
        *self.lock_fan(fan)
    }

    pub fn set_mode(&self, fan: FanIndex, mode: FanMode) {
        *self.lock_fan(fan) = mode;
    }

    pub fn get_ceiling(&self) -> u8 {
        *self.lock_ceiling()
    }

    pub fn set_ceiling(&self, value: u8) {
        *self.lock_ceiling() = value;
    }

    /// Exclusive access to one fan's slot for a read-modify-write sequence.
    pub fn lock_fan(&self, fan: FanIndex) -> MutexGuard<'_, FanMode> {
        self.modes[fan.as_index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to every slot. Always acquired Primary first, so it
    /// cannot deadlock against another `lock_all` or a single `lock_fan`.
    pub fn lock_all(&self) -> AllFansGuard<'_> {
        AllFansGuard {
            guards: [
                self.lock_fan(FanIndex::Primary),
                self.lock_fan(FanIndex::Secondary),
            ],
        }
    }

    pub fn lock_ceiling(&self) -> MutexGuard<'_, u8> {
        self.ceiling.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FanStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_automatic_with_default_ceiling() {
        let store = FanStateStore::new();
        assert_eq!(store.get_mode(FanIndex::Primary), FanMode::Automatic);
        assert_eq!(store.get_mode(FanIndex::Secondary), FanMode::Automatic);
        assert_eq!(store.get_ceiling(), 255);
    }

    #[test]
    fn modes_are_tracked_per_fan() {
        let store = FanStateStore::new();
        store.set_mode(FanIndex::Secondary, FanMode::Manual(77));
        assert_eq!(store.get_mode(FanIndex::Primary), FanMode::Automatic);
        assert_eq!(store.get_mode(FanIndex::Secondary), FanMode::Manual(77));
    }

    #[test]
    fn lock_all_updates_every_slot() {
        let store = FanStateStore::new();
        store.set_mode(FanIndex::Primary, FanMode::Manual(10));
        store.set_mode(FanIndex::Secondary, FanMode::Manual(20));

        {
            let mut all = store.lock_all();
            assert_eq!(all.get(FanIndex::Secondary), FanMode::Manual(20));
            all.set_all(FanMode::Automatic);
        }

        assert_eq!(store.get_mode(FanIndex::Primary), FanMode::Automatic);
        assert_eq!(store.get_mode(FanIndex::Secondary), FanMode::Automatic);
    }

    #[test]
    fn ceiling_round_trips() {
        let store = FanStateStore::new();
        store.set_ceiling(140);
        assert_eq!(store.get_ceiling(), 140);
    }
}
