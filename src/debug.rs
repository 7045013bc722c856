// Per-acquire debug bookkeeping (spec.md §4.9): one record per live
// acquire, inserted at the head of a per-latch list and removed by the
// matching release. Compiled in for debug builds only — release builds
// pay nothing for it, matching the teacher's `ut_d!`-style gating
// throughout `transaction/locks.rs` and friends (there expressed with
// `#[cfg(debug_assertions)]` instead of a custom macro).

use parking_lot::Mutex;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    S,
    X,
    Sx,
    /// A writer blocked in `drain`, waiting for readers to leave after
    /// already reserving the X slot. Tracked separately from `X` so a
    /// diagnostic dump can tell "holds X" apart from "about to hold X".
    XWait,
}

#[derive(Debug, Clone, Copy)]
pub struct DebugRecord {
    pub thread: u64,
    pub pass: bool,
    pub mode: Mode,
    pub site: &'static str,
}

#[derive(Default)]
pub struct DebugList {
    records: Mutex<Vec<DebugRecord>>,
}

impl DebugList {
    pub const fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, thread: u64, pass: bool, mode: Mode, site: &'static str) {
        let mut records = self.records.lock();
        records.insert(
            0,
            DebugRecord {
                thread,
                pass,
                mode,
                site,
            },
        );
    }

    /// Removes the first record matching `mode` and `pass`; when
    /// `pass == false` the thread must match too, but a `pass == true`
    /// record was deliberately handed to a different thread to release,
    /// so its thread id is not checked on removal.
    pub fn remove(&self, thread: u64, pass: bool, mode: Mode) {
        let mut records = self.records.lock();
        if let Some(pos) = records
            .iter()
            .position(|r| r.mode == mode && r.pass == pass && (pass || r.thread == thread))
        {
            records.remove(pos);
        }
    }

    /// True if the calling thread holds `mode` with `pass == false`, used
    /// by `own()` for the S case (spec.md §4.8), which has no counter in
    /// `lock_word` to consult directly.
    pub fn thread_holds(&self, thread: u64, mode: Mode) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.mode == mode && r.thread == thread && !r.pass)
    }

    pub fn snapshot(&self) -> Vec<DebugRecord> {
        self.records.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

/// Hierarchy level used only for the debug-only latching-order check: a
/// non-recursive acquire must not be taken while the same thread already
/// holds a latch of a strictly higher level number. Recursive X and SX
/// acquires bypass this (spec.md §4.9) since they do not add a new edge
/// to the ordering graph.
pub const LEVEL_UNRANKED: u32 = u32::MAX;

thread_local! {
    static HELD_LEVELS: RefCell<Vec<u32>> = RefCell::new(Vec::new());
}

/// Asserts (debug builds only) that no currently-held level on this
/// thread is numerically greater than `level`, then records `level` as
/// held. Call only for genuinely new (non-recursive) acquires.
pub fn check_and_push_level(level: u32) {
    if level == LEVEL_UNRANKED {
        return;
    }
    HELD_LEVELS.with(|held| {
        let mut held = held.borrow_mut();
        debug_assert!(
            held.iter().all(|&l| l <= level),
            "latch acquired out of hierarchy order: holding level > {level}"
        );
        held.push(level);
    });
}

pub fn pop_level(level: u32) {
    if level == LEVEL_UNRANKED {
        return;
    }
    HELD_LEVELS.with(|held| {
        let mut held = held.borrow_mut();
        if let Some(pos) = held.iter().rposition(|&l| l == level) {
            held.remove(pos);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_round_trips() {
        let list = DebugList::new();
        let me = crate::thread_id::current_id();
        list.add(me, false, Mode::S, "test.rs:1");
        assert!(list.thread_holds(me, Mode::S));
        list.remove(me, false, Mode::S);
        assert!(list.is_empty());
    }

    #[test]
    fn level_order_allows_equal_and_ascending() {
        check_and_push_level(1);
        check_and_push_level(2);
        pop_level(2);
        pop_level(1);
    }
}
