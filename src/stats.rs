// Per-mode counters (spin attempts, spin rounds, kernel waits), gated
// behind the `stats` feature the teacher's Cargo.toml already defines
// for `concurrent/rwlock_wp.rs`'s `RwLockStats`. Always-on atomics would
// cost a cache line per latch for data most embedders never read; the
// feature flag keeps that cost opt-in.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct ModeStats {
    pub spin_waits: AtomicU64,
    pub spin_rounds: AtomicU64,
    pub os_waits: AtomicU64,
}

impl ModeStats {
    const fn new() -> Self {
        Self {
            spin_waits: AtomicU64::new(0),
            spin_rounds: AtomicU64::new(0),
            os_waits: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_spin_wait(&self) {
        self.spin_waits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_spin_rounds(&self, n: u64) {
        if n > 0 {
            self.spin_rounds.fetch_add(n, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_os_wait(&self) {
        self.os_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ModeStatsSnapshot {
        ModeStatsSnapshot {
            spin_waits: self.spin_waits.load(Ordering::Relaxed),
            spin_rounds: self.spin_rounds.load(Ordering::Relaxed),
            os_waits: self.os_waits.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeStatsSnapshot {
    pub spin_waits: u64,
    pub spin_rounds: u64,
    pub os_waits: u64,
}

/// One counter set per mode, held inline on the latch under the `stats`
/// feature.
pub struct LatchStats {
    pub s: ModeStats,
    pub x: ModeStats,
    pub sx: ModeStats,
}

impl LatchStats {
    pub const fn new() -> Self {
        Self {
            s: ModeStats::new(),
            x: ModeStats::new(),
            sx: ModeStats::new(),
        }
    }
}

impl Default for LatchStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatchStatsSnapshot {
    pub s: ModeStatsSnapshot,
    pub x: ModeStatsSnapshot,
    pub sx: ModeStatsSnapshot,
}

impl LatchStats {
    pub fn snapshot(&self) -> LatchStatsSnapshot {
        LatchStatsSnapshot {
            s: self.s.snapshot(),
            x: self.x.snapshot(),
            sx: self.sx.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = LatchStats::new();
        stats.s.record_spin_wait();
        stats.s.record_spin_rounds(5);
        stats.x.record_os_wait();
        let snap = stats.snapshot();
        assert_eq!(snap.s.spin_waits, 1);
        assert_eq!(snap.s.spin_rounds, 5);
        assert_eq!(snap.x.os_waits, 1);
    }
}
