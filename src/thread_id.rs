// The thread-identity service the spec treats as an external collaborator
// (`current_id`, `yield`, `eq`), with one constraint the spec bakes in
// directly: `writer_thread` is an *atomic* thread-id field where `0`
// means "no holder" (spec.md §3). `std::thread::ThreadId` has no stable
// numeric representation we can store in an `AtomicU64`, so this module
// hands out its own dense, non-zero, per-thread numeric id the first
// time a thread asks for one, cached in a thread-local for the rest of
// that thread's life.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THIS_THREAD: Cell<u64> = Cell::new(0);
}

/// Sentinel meaning "no holder", matching `writer_thread == 0` in the
/// spec's encoding.
pub const NONE: u64 = 0;

/// Returns this thread's id, assigning one on first call. Never returns
/// `NONE`.
#[inline]
pub fn current_id() -> u64 {
    THIS_THREAD.with(|cell| {
        let id = cell.get();
        if id != NONE {
            return id;
        }
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        cell.set(id);
        id
    })
}

#[inline]
pub fn yield_now() {
    std::thread::yield_now();
}

#[inline]
pub fn eq(a: u64, b: u64) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn none_differs_from_current() {
        assert_ne!(NONE, current_id());
    }

    #[test]
    fn current_is_stable_within_thread() {
        assert_eq!(current_id(), current_id());
    }

    #[test]
    fn distinct_threads_get_distinct_ids() {
        let a = current_id();
        let b = thread::spawn(current_id).join().unwrap();
        assert_ne!(a, b);
    }
}
