// The process-wide set of live latches (spec.md §3 "Global state"),
// mutated only on create/destroy and consulted only by diagnostic dumps.
// Concurrent acquires never touch this (spec.md §9), so a single coarse
// mutex — the teacher's default choice for anything off the hot path,
// e.g. `networking/discovery/registry.rs` — is the right tool; there is
// no contention to engineer around.

use crate::rwlatch::RwLatch;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

struct LatchPtr(*const RwLatch);

// Safety: pointers are only dereferenced while the registry mutex is
// held and only for latches that have not yet called `deregister`, which
// every `RwLatch::free` does before the latch itself may be dropped.
unsafe impl Send for LatchPtr {}

static REGISTRY: Lazy<Mutex<Vec<LatchPtr>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn register(latch: *const RwLatch) {
    REGISTRY.lock().push(LatchPtr(latch));
}

pub fn deregister(latch: *const RwLatch) {
    let mut reg = REGISTRY.lock();
    if let Some(pos) = reg.iter().position(|p| std::ptr::eq(p.0, latch)) {
        reg.remove(pos);
    }
}

/// Runs `f` over every currently-registered latch, holding the registry
/// lock for the duration — matching spec.md §4.10's
/// "locks the global latch registry, iterates all latches".
pub fn for_each<F: FnMut(&RwLatch)>(mut f: F) {
    let reg = REGISTRY.lock();
    for ptr in reg.iter() {
        // Safety: see the `unsafe impl Send` comment above.
        unsafe { f(&*ptr.0) }
    }
}

pub fn len() -> usize {
    REGISTRY.lock().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_deregister_round_trips() {
        let before = len();
        let sentinel: *const RwLatch = std::ptr::null();
        register(sentinel);
        assert_eq!(len(), before + 1);
        deregister(sentinel);
        assert_eq!(len(), before);
    }
}
