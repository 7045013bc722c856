// Tunables the spec leaves to an external "knobs" collaborator: spin
// budget and hardware-pause delay. Read without synchronization on the
// hot path, exactly like the teacher's SPIN_COUNT constant, but exposed
// as a settable global so embedders can tune per-workload without
// recompiling.

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process-wide tunables for the spin-then-park loops.
#[derive(Debug, Clone, Copy)]
pub struct Tunables {
    /// Spin iterations attempted before a thread yields or reserves a
    /// wait cell.
    pub n_spin_wait_rounds: u32,
    /// Hardware-pause units executed per spin iteration.
    pub spin_wait_delay: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            n_spin_wait_rounds: 30,
            spin_wait_delay: 6,
        }
    }
}

struct GlobalTunables {
    n_spin_wait_rounds: AtomicU32,
    spin_wait_delay: AtomicU32,
}

static GLOBAL: OnceCell<GlobalTunables> = OnceCell::new();

fn global() -> &'static GlobalTunables {
    GLOBAL.get_or_init(|| {
        let d = Tunables::default();
        GlobalTunables {
            n_spin_wait_rounds: AtomicU32::new(d.n_spin_wait_rounds),
            spin_wait_delay: AtomicU32::new(d.spin_wait_delay),
        }
    })
}

/// Install process-wide tunables. Intended to be called once, early, by
/// the embedding application; later calls still take effect immediately
/// since readers use relaxed loads, but there is no ordering guarantee
/// relative to in-flight acquires.
pub fn set_tunables(t: Tunables) {
    let g = global();
    g.n_spin_wait_rounds.store(t.n_spin_wait_rounds, Ordering::Relaxed);
    g.spin_wait_delay.store(t.spin_wait_delay, Ordering::Relaxed);
}

pub fn n_spin_wait_rounds() -> u32 {
    global().n_spin_wait_rounds.load(Ordering::Relaxed)
}

pub fn spin_wait_delay() -> u32 {
    global().spin_wait_delay.load(Ordering::Relaxed)
}

/// Hardware pause for `spin_wait_delay()` units.
#[inline]
pub fn spin_delay() {
    for _ in 0..spin_wait_delay() {
        std::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let t = Tunables::default();
        assert!(t.n_spin_wait_rounds > 0);
        assert!(t.spin_wait_delay > 0);
    }
}
