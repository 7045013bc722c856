// Three-mode (S / X / SX) reader-writer latch, state-encoded into a
// single signed atomic counter (`lock_word`). This module is the
// adaptation of `concurrent/rwlock_wp.rs`'s writer-preference lock and
// `buffer/lockfree_latch.rs`'s optimistic latch, generalized from two
// states (reader/writer) to three (S/X/SX) with recursive X/SX and
// ownership transfer, and rebuilt on the single-counter encoding this
// crate exists to carry.
//
// The encoding is InnoDB's: unlocked at `lock_word == D`, readers
// decrement by 1, X reserves by D (or 1 per extra recursive hold), SX
// reserves by D/2. See the module-level table in `doc/encoding.md`-style
// comments below each constant for the exact ranges; there is no
// separate counter for "how many readers" or "how many recursive X
// holds" — it is all one arithmetic progression over `lock_word`.

use crate::config;
use crate::debug::{self, DebugList};
use crate::error::{Result, RwLatchError};
use crate::event::Event;
use crate::registry;
use crate::stats;
use crate::sync_array::{self, WaitMode};
use crate::thread_id;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU64, Ordering};

/// `D`: the reader-count domain. Must exceed the maximum number of
/// threads that could ever hold S concurrently; InnoDB's historical
/// value is reused since nothing in this port needs a smaller one.
pub const X_LOCK_DECR: i32 = 0x2000_0000;
/// `H = D / 2`.
pub const X_LOCK_HALF_DECR: i32 = X_LOCK_DECR / 2;

/// The three latch modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    S,
    X,
    Sx,
}

/// OR-able mask for `own_flagged`.
pub mod flag {
    pub const S: u8 = 0b001;
    pub const X: u8 = 0b010;
    pub const SX: u8 = 0b100;
}

#[inline]
fn decr_if_nonnegative(word: &AtomicI32, delta: i32, threshold: i32) -> Option<i32> {
    let mut current = word.load(Ordering::Relaxed);
    loop {
        if current <= threshold {
            return None;
        }
        match word.compare_exchange_weak(
            current,
            current - delta,
            Ordering::Acquire,
            Ordering::Relaxed,
        ) {
            Ok(prev) => return Some(prev),
            Err(actual) => current = actual,
        }
    }
}

/// Fixed-location, three-mode reader/writer latch. Embed it by value in
/// a larger structure (buffer-pool frame, dictionary entry, index page
/// header) and call [`RwLatch::register`] once it has reached its final
/// address if you want it to show up in [`list_print_info`].
pub struct RwLatch {
    lock_word: AtomicI32,
    /// 0 means "no holder"; see [`thread_id`].
    writer_thread: AtomicU64,
    sx_recursive: AtomicU32,
    /// Strictly 0 or 1 (see [`RwLatch::validate`]).
    waiters: AtomicU32,
    event: Event,
    wait_ex_event: Event,
    count_os_wait: AtomicU64,
    last_x_site: Mutex<Option<&'static str>>,
    created_site: &'static str,
    level: u32,
    name: &'static str,
    debug_list: DebugList,
    #[cfg(feature = "stats")]
    stats: stats::LatchStats,
    registered: AtomicBool,
}

unsafe impl Send for RwLatch {}
unsafe impl Sync for RwLatch {}

impl RwLatch {
    /// Creates a latch in the unlocked state. `level` is the debug-only
    /// hierarchy ordering level (spec.md §4.9); pass
    /// [`debug::LEVEL_UNRANKED`] to opt out of the ordering check.
    /// `site` is a `"file:line"`-style literal identifying the creation
    /// point, kept for diagnostics only.
    pub const fn new(level: u32, site: &'static str) -> Self {
        Self {
            lock_word: AtomicI32::new(X_LOCK_DECR),
            writer_thread: AtomicU64::new(thread_id::NONE),
            sx_recursive: AtomicU32::new(0),
            waiters: AtomicU32::new(0),
            event: Event::create(0),
            wait_ex_event: Event::create(0),
            count_os_wait: AtomicU64::new(0),
            last_x_site: Mutex::new(None),
            created_site: site,
            level,
            name: "rwlatch",
            debug_list: DebugList::new(),
            #[cfg(feature = "stats")]
            stats: stats::LatchStats::new(),
            registered: AtomicBool::new(false),
        }
    }

    pub fn with_name(level: u32, site: &'static str, name: &'static str) -> Self {
        let mut latch = Self::new(level, site);
        latch.name = name;
        latch
    }

    /// Adds this latch to the process-wide diagnostic set consulted by
    /// [`list_print_info`]. Call only once the latch will not move again
    /// (e.g. after placing it in a `Box`/`Arc`, or for a `'static`) —
    /// the registry stores a raw pointer.
    pub fn register(&self) {
        if !self.registered.swap(true, Ordering::AcqRel) {
            registry::register(self as *const RwLatch);
        }
    }

    /// Precondition: the latch is fully unlocked (`lock_word == D`).
    /// Fatal (aborts) if violated, matching spec.md §7. Removes the
    /// latch from the diagnostic registry; the OS-level event resources
    /// are reclaimed when `self` is dropped.
    pub fn free(&self) {
        let word = self.lock_word.load(Ordering::Acquire);
        assert_eq!(word, X_LOCK_DECR, "rwlatch freed while still locked");
        if self.registered.swap(false, Ordering::AcqRel) {
            registry::deregister(self as *const RwLatch);
        }
    }

    // ---------------------------------------------------------------
    // S
    // ---------------------------------------------------------------

    #[inline]
    fn s_lock_low(&self, _pass: bool) -> bool {
        decr_if_nonnegative(&self.lock_word, 1, 0).is_some()
    }

    /// Acquires S (shared) mode, blocking until available.
    /// `pass != false` means the caller intends for another thread to
    /// release this hold.
    pub fn s_lock(&self, pass: bool, site: &'static str) {
        tracing::trace!(site, "s_lock");

        if self.s_lock_low(pass) {
            self.record_acquire(debug::Mode::S, pass, site, false);
            return;
        }

        #[cfg(feature = "stats")]
        self.stats.s.record_spin_wait();

        let mut i = 0u32;
        loop {
            let budget = config::n_spin_wait_rounds();
            while i < budget && self.lock_word.load(Ordering::Acquire) <= 0 {
                config::spin_delay();
                i += 1;
            }
            if i >= budget {
                thread_id::yield_now();
            }

            if self.s_lock_low(pass) {
                #[cfg(feature = "stats")]
                self.stats.s.record_spin_rounds(i as u64);
                self.record_acquire(debug::Mode::S, pass, site, false);
                return;
            }

            if i < budget {
                continue;
            }

            let cell = sync_array::reserve_cell(&self.event, WaitMode::S);
            self.set_waiters();

            if self.s_lock_low(pass) {
                cell.free();
                #[cfg(feature = "stats")]
                self.stats.s.record_spin_rounds(i as u64);
                self.record_acquire(debug::Mode::S, pass, site, false);
                return;
            }

            tracing::debug!(site, "s_lock parking");
            #[cfg(feature = "stats")]
            self.stats.s.record_os_wait();
            self.count_os_wait.fetch_add(1, Ordering::Relaxed);
            cell.wait();
            i = 0;
        }
    }

    /// Attempts S (shared) mode without spinning or parking. Returns
    /// [`RwLatchError::WouldBlock`] instead of blocking if the fast path
    /// does not immediately succeed.
    pub fn try_s_lock(&self, pass: bool, site: &'static str) -> Result<()> {
        tracing::trace!(site, "try_s_lock");
        if self.s_lock_low(pass) {
            self.record_acquire(debug::Mode::S, pass, site, false);
            Ok(())
        } else {
            Err(RwLatchError::WouldBlock)
        }
    }

    /// Releases one S hold. `pass` must match the value the matching
    /// `s_lock` used.
    pub fn s_unlock(&self, pass: bool) {
        tracing::trace!("s_unlock");

        self.record_release(debug::Mode::S, pass);

        let new = self.lock_word.fetch_add(1, Ordering::Release) + 1;
        if new == 0 || new == -X_LOCK_HALF_DECR {
            // A draining writer (threshold 0 or -H) can now proceed.
            self.wait_ex_event.signal();
        }
        self.check_waiters_and_signal();
    }

    // ---------------------------------------------------------------
    // X
    // ---------------------------------------------------------------

    /// Returns `Some(is_recursive)` on success, `None` if the fast/relock
    /// path did not apply and the caller must spin or park.
    fn x_lock_low(&self, pass: bool, site: &'static str) -> Option<bool> {
        if decr_if_nonnegative(&self.lock_word, X_LOCK_DECR, X_LOCK_HALF_DECR).is_some() {
            debug_assert_eq!(
                self.writer_thread.load(Ordering::Relaxed),
                thread_id::NONE,
                "x_lock_low decremented into a slot another writer_thread already claims"
            );
            if !pass {
                self.writer_thread
                    .store(thread_id::current_id(), Ordering::Release);
            }
            self.set_last_x_site(site);
            self.drain(0, pass, site);
            Some(false)
        } else if !pass && self.writer_thread.load(Ordering::Acquire) == thread_id::current_id() {
            if decr_if_nonnegative(&self.lock_word, X_LOCK_DECR, 0).is_some() {
                self.drain(-X_LOCK_HALF_DECR, pass, site);
            } else {
                let word = self.lock_word.load(Ordering::Relaxed);
                let delta = if word == 0 || word == -X_LOCK_HALF_DECR {
                    X_LOCK_DECR
                } else {
                    debug_assert!(word <= -X_LOCK_DECR);
                    1
                };
                self.lock_word.fetch_sub(delta, Ordering::AcqRel);
            }
            self.set_last_x_site(site);
            Some(true)
        } else {
            None
        }
    }

    /// Acquires X (exclusive) mode, blocking until available. Recursive
    /// on the same thread when `pass == false`; never call this while
    /// the same thread already holds S (spec.md §7 — fatal).
    pub fn x_lock(&self, pass: bool, site: &'static str) {
        tracing::trace!(site, "x_lock");
        debug_assert!(
            !self.own(Mode::S),
            "acquiring X while the same thread holds S cannot be encoded"
        );

        if let Some(recursive) = self.x_lock_low(pass, site) {
            self.record_acquire(debug::Mode::X, pass, site, recursive);
            return;
        }

        #[cfg(feature = "stats")]
        self.stats.x.record_spin_wait();

        let mut i = 0u32;
        loop {
            let budget = config::n_spin_wait_rounds();
            while i < budget && self.lock_word.load(Ordering::Acquire) <= X_LOCK_HALF_DECR {
                config::spin_delay();
                i += 1;
            }
            if i >= budget {
                thread_id::yield_now();
            }

            if let Some(recursive) = self.x_lock_low(pass, site) {
                #[cfg(feature = "stats")]
                self.stats.x.record_spin_rounds(i as u64);
                self.record_acquire(debug::Mode::X, pass, site, recursive);
                return;
            }

            if i < budget {
                continue;
            }

            let cell = sync_array::reserve_cell(&self.event, WaitMode::X);
            self.set_waiters();

            if let Some(recursive) = self.x_lock_low(pass, site) {
                cell.free();
                #[cfg(feature = "stats")]
                self.stats.x.record_spin_rounds(i as u64);
                self.record_acquire(debug::Mode::X, pass, site, recursive);
                return;
            }

            tracing::debug!(site, "x_lock parking");
            #[cfg(feature = "stats")]
            self.stats.x.record_os_wait();
            self.count_os_wait.fetch_add(1, Ordering::Relaxed);
            cell.wait();
            i = 0;
        }
    }

    /// Attempts X (exclusive) mode without spinning or parking. Unlike
    /// `x_lock`, a fresh reservation that would otherwise have to drain
    /// existing readers (or a recursive upgrade from SX that would have
    /// to drain existing S-holders) is undone and reported as
    /// [`RwLatchError::WouldBlock`] rather than blocking.
    pub fn try_x_lock(&self, pass: bool, site: &'static str) -> Result<()> {
        tracing::trace!(site, "try_x_lock");
        debug_assert!(
            !self.own(Mode::S),
            "acquiring X while the same thread holds S cannot be encoded"
        );

        if decr_if_nonnegative(&self.lock_word, X_LOCK_DECR, X_LOCK_HALF_DECR).is_some() {
            if self.lock_word.load(Ordering::Acquire) < 0 {
                self.lock_word.fetch_add(X_LOCK_DECR, Ordering::Release);
                self.check_waiters_and_signal();
                return Err(RwLatchError::WouldBlock);
            }
            debug_assert_eq!(
                self.writer_thread.load(Ordering::Relaxed),
                thread_id::NONE
            );
            if !pass {
                self.writer_thread
                    .store(thread_id::current_id(), Ordering::Release);
            }
            self.set_last_x_site(site);
            self.record_acquire(debug::Mode::X, pass, site, false);
            return Ok(());
        }

        if !pass && self.writer_thread.load(Ordering::Acquire) == thread_id::current_id() {
            if decr_if_nonnegative(&self.lock_word, X_LOCK_DECR, 0).is_some() {
                if self.lock_word.load(Ordering::Acquire) < -X_LOCK_HALF_DECR {
                    self.lock_word.fetch_add(X_LOCK_DECR, Ordering::Release);
                    self.check_waiters_and_signal();
                    return Err(RwLatchError::WouldBlock);
                }
            } else {
                let word = self.lock_word.load(Ordering::Relaxed);
                let delta = if word == 0 || word == -X_LOCK_HALF_DECR {
                    X_LOCK_DECR
                } else {
                    debug_assert!(word <= -X_LOCK_DECR);
                    1
                };
                self.lock_word.fetch_sub(delta, Ordering::AcqRel);
            }
            self.set_last_x_site(site);
            self.record_acquire(debug::Mode::X, pass, site, true);
            return Ok(());
        }

        Err(RwLatchError::WouldBlock)
    }

    /// Releases one X hold (the outermost of however many were taken
    /// recursively). `pass` must match the acquiring call.
    pub fn x_unlock(&self, pass: bool) {
        tracing::trace!("x_unlock");

        let word = self.lock_word.load(Ordering::Relaxed);
        let is_last = word == 0 || word == -X_LOCK_HALF_DECR;
        let cost = if is_last || word == -X_LOCK_DECR || word == -(X_LOCK_DECR + X_LOCK_HALF_DECR)
        {
            X_LOCK_DECR
        } else {
            1
        };

        self.record_release(debug::Mode::X, pass);
        let new = self.lock_word.fetch_add(cost, Ordering::Release) + cost;

        if is_last {
            if new == X_LOCK_DECR {
                self.writer_thread.store(thread_id::NONE, Ordering::Release);
            }
            self.check_waiters_and_signal();
        }
    }

    // ---------------------------------------------------------------
    // SX
    // ---------------------------------------------------------------

    fn sx_lock_low(&self, pass: bool) -> Option<bool> {
        if decr_if_nonnegative(&self.lock_word, X_LOCK_HALF_DECR, X_LOCK_HALF_DECR).is_some() {
            debug_assert_eq!(
                self.writer_thread.load(Ordering::Relaxed),
                thread_id::NONE
            );
            if !pass {
                self.writer_thread
                    .store(thread_id::current_id(), Ordering::Release);
            }
            self.sx_recursive.store(1, Ordering::Release);
            Some(false)
        } else if !pass && self.writer_thread.load(Ordering::Acquire) == thread_id::current_id() {
            let prev = self.sx_recursive.fetch_add(1, Ordering::AcqRel);
            if prev == 0 {
                let before = self
                    .lock_word
                    .fetch_sub(X_LOCK_HALF_DECR, Ordering::AcqRel);
                let after = before - X_LOCK_HALF_DECR;
                debug_assert!(
                    after == -X_LOCK_HALF_DECR || after <= -(X_LOCK_DECR + X_LOCK_HALF_DECR),
                    "first SX request while already holding X landed on an unexpected lock_word"
                );
            }
            Some(true)
        } else {
            None
        }
    }

    /// Acquires SX (shared-exclusive) mode, blocking until available.
    /// Compatible with concurrently-held S; incompatible with X and
    /// other SX.
    pub fn sx_lock(&self, pass: bool, site: &'static str) {
        tracing::trace!(site, "sx_lock");

        if let Some(recursive) = self.sx_lock_low(pass) {
            self.set_last_x_site(site);
            self.record_acquire(debug::Mode::Sx, pass, site, recursive);
            return;
        }

        #[cfg(feature = "stats")]
        self.stats.sx.record_spin_wait();

        let mut i = 0u32;
        loop {
            let budget = config::n_spin_wait_rounds();
            while i < budget && self.lock_word.load(Ordering::Acquire) <= X_LOCK_HALF_DECR {
                config::spin_delay();
                i += 1;
            }
            if i >= budget {
                thread_id::yield_now();
            }

            if let Some(recursive) = self.sx_lock_low(pass) {
                #[cfg(feature = "stats")]
                self.stats.sx.record_spin_rounds(i as u64);
                self.set_last_x_site(site);
                self.record_acquire(debug::Mode::Sx, pass, site, recursive);
                return;
            }

            if i < budget {
                continue;
            }

            let cell = sync_array::reserve_cell(&self.event, WaitMode::Sx);
            self.set_waiters();

            if let Some(recursive) = self.sx_lock_low(pass) {
                cell.free();
                #[cfg(feature = "stats")]
                self.stats.sx.record_spin_rounds(i as u64);
                self.set_last_x_site(site);
                self.record_acquire(debug::Mode::Sx, pass, site, recursive);
                return;
            }

            tracing::debug!(site, "sx_lock parking");
            #[cfg(feature = "stats")]
            self.stats.sx.record_os_wait();
            self.count_os_wait.fetch_add(1, Ordering::Relaxed);
            cell.wait();
            i = 0;
        }
    }

    /// Attempts SX (shared-exclusive) mode without spinning or parking.
    /// `sx_lock_low` never needs to drain (SX is always compatible with
    /// already-held S), so this is a direct single attempt at the same
    /// fast/relock path `sx_lock` uses.
    pub fn try_sx_lock(&self, pass: bool, site: &'static str) -> Result<()> {
        tracing::trace!(site, "try_sx_lock");
        if let Some(recursive) = self.sx_lock_low(pass) {
            self.set_last_x_site(site);
            self.record_acquire(debug::Mode::Sx, pass, site, recursive);
            Ok(())
        } else {
            Err(RwLatchError::WouldBlock)
        }
    }

    /// Releases one SX hold.
    pub fn sx_unlock(&self, pass: bool) {
        tracing::trace!("sx_unlock");

        self.record_release(debug::Mode::Sx, pass);

        let depth = self.sx_recursive.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(depth >= 1, "sx_unlock without a matching sx_lock");
        if depth == 1 {
            let new = self
                .lock_word
                .fetch_add(X_LOCK_HALF_DECR, Ordering::Release)
                + X_LOCK_HALF_DECR;
            if new == X_LOCK_DECR {
                self.writer_thread.store(thread_id::NONE, Ordering::Release);
            }
            self.check_waiters_and_signal();
        }
    }

    // ---------------------------------------------------------------
    // Drain — writer waits for already-admitted readers
    // ---------------------------------------------------------------

    /// Waits for `lock_word >= threshold`, i.e. for every reader
    /// admitted before the caller's `X_LOCK_DECR` reservation to leave.
    fn drain(&self, threshold: i32, pass: bool, site: &'static str) {
        tracing::trace!(threshold, "drain");
        debug_assert!(self.lock_word.load(Ordering::Relaxed) <= threshold);

        let mut i = 0u32;
        loop {
            let budget = config::n_spin_wait_rounds();
            while i < budget && self.lock_word.load(Ordering::Acquire) < threshold {
                config::spin_delay();
                i += 1;
            }
            #[cfg(feature = "stats")]
            self.stats.x.record_spin_rounds(i as u64);

            if self.lock_word.load(Ordering::Acquire) >= threshold {
                return;
            }

            let cell = sync_array::reserve_cell(&self.wait_ex_event, WaitMode::XWait);

            if self.lock_word.load(Ordering::Acquire) >= threshold {
                cell.free();
                return;
            }

            tracing::debug!(site, threshold, "drain parking for readers");
            #[cfg(feature = "stats")]
            self.stats.x.record_os_wait();
            self.count_os_wait.fetch_add(1, Ordering::Relaxed);

            // Deadlock detection needs every WAIT_EX parker visible in
            // the debug list, so this one is added even though it is
            // not a held acquire.
            self.debug_list
                .add(thread_id::current_id(), pass, debug::Mode::XWait, site);
            cell.wait();
            self.debug_list
                .remove(thread_id::current_id(), pass, debug::Mode::XWait);

            i = 0;
        }
    }

    // ---------------------------------------------------------------
    // Ownership transfer & queries
    // ---------------------------------------------------------------

    /// Writes `writer_thread = self` unconditionally. The caller must
    /// already hold X (fatal if not, in debug builds) — this includes X
    /// taken with `pass != false`, where `writer_thread` is still `0`
    /// and `own(Mode::X)` would (correctly) say no one owns it yet, so
    /// the precondition checks `lock_word` directly rather than
    /// recorded ownership. Used when one thread acquires X for another
    /// thread's future release.
    pub fn move_ownership(&self) {
        debug_assert!(
            self.is_locked(Mode::X),
            "move_ownership requires the caller to already hold X"
        );
        self.writer_thread
            .store(thread_id::current_id(), Ordering::Release);
    }

    /// True if the calling thread holds `mode` with `pass == false`.
    pub fn own(&self, mode: Mode) -> bool {
        match mode {
            Mode::X => {
                self.writer_thread.load(Ordering::Acquire) == thread_id::current_id()
                    && self.lock_word.load(Ordering::Acquire) <= 0
            }
            Mode::Sx => {
                self.writer_thread.load(Ordering::Acquire) == thread_id::current_id()
                    && self.sx_recursive.load(Ordering::Acquire) > 0
            }
            Mode::S => {
                if cfg!(debug_assertions) {
                    self.debug_list
                        .thread_holds(thread_id::current_id(), debug::Mode::S)
                } else {
                    false
                }
            }
        }
    }

    /// True if the calling thread owns any mode in `flags` (an OR-mask
    /// of [`flag::S`], [`flag::X`], [`flag::SX`]).
    pub fn own_flagged(&self, flags: u8) -> bool {
        (flags & flag::S != 0 && self.own(Mode::S))
            || (flags & flag::X != 0 && self.own(Mode::X))
            || (flags & flag::SX != 0 && self.own(Mode::Sx))
    }

    /// Observational only — not thread-safe relative to concurrent
    /// acquires, per spec.md §6. Follows the encoding table in §3
    /// exactly, including the two draining ranges (`-H < w < 0` and
    /// `-D < w < -H`) where a writer has reserved X but is still
    /// waiting on readers to leave, so X is not yet held.
    pub fn is_locked(&self, mode: Mode) -> bool {
        let w = self.lock_word.load(Ordering::Relaxed);
        match mode {
            Mode::S => {
                w > -X_LOCK_DECR
                    && w < X_LOCK_DECR
                    && w != X_LOCK_HALF_DECR
                    && w != 0
                    && w != -X_LOCK_HALF_DECR
            }
            Mode::X => w == 0 || w == -X_LOCK_HALF_DECR || w <= -X_LOCK_DECR,
            Mode::Sx => {
                (w > 0 && w <= X_LOCK_HALF_DECR)
                    || (w > -X_LOCK_DECR && w <= -X_LOCK_HALF_DECR)
                    || w <= -(X_LOCK_DECR + X_LOCK_HALF_DECR)
            }
        }
    }

    /// Checks invariants 1 and 2 from spec.md §3. Unlike the fatal
    /// asserts used at the point of detection elsewhere, this returns a
    /// descriptive error so callers (e.g. a periodic consistency sweep)
    /// can decide what to do, rather than aborting unconditionally.
    pub fn validate(&self) -> Result<()> {
        let word = self.lock_word.load(Ordering::Relaxed);
        if !(word > -2 * X_LOCK_DECR && word <= X_LOCK_DECR) {
            return Err(RwLatchError::LockWordOutOfRange(word));
        }
        let waiters = self.waiters.load(Ordering::Relaxed);
        if waiters > 1 {
            return Err(RwLatchError::WaitersOutOfRange(waiters as i32));
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    #[inline]
    fn set_waiters(&self) {
        // Acquire-exchange before the caller's post-set re-check of
        // lock_word: this is the parker half of the Dekker-style
        // handshake in spec.md §4.1/§4.6.
        self.waiters.swap(1, Ordering::Acquire);
    }

    #[inline]
    fn check_waiters_and_signal(&self) {
        // Defensive sequentially-consistent fence between the release
        // update of lock_word (already done by the caller) and this
        // read of waiters — the spec leaves the ordering here
        // unspecified (open question) and this is the safe resolution.
        std::sync::atomic::fence(Ordering::SeqCst);
        if self.waiters.swap(0, Ordering::AcqRel) != 0 {
            self.event.signal();
        }
    }

    #[inline]
    fn set_last_x_site(&self, site: &'static str) {
        *self.last_x_site.lock() = Some(site);
    }

    #[cfg(debug_assertions)]
    #[inline]
    fn record_acquire(&self, mode: debug::Mode, pass: bool, site: &'static str, recursive: bool) {
        if !recursive {
            debug::check_and_push_level(self.level);
        }
        self.debug_list
            .add(thread_id::current_id(), pass, mode, site);
    }

    #[cfg(not(debug_assertions))]
    #[inline]
    fn record_acquire(&self, _mode: debug::Mode, _pass: bool, _site: &'static str, _recursive: bool) {
    }

    #[cfg(debug_assertions)]
    #[inline]
    fn record_release(&self, mode: debug::Mode, pass: bool) {
        self.debug_list.remove(thread_id::current_id(), pass, mode);
        debug::pop_level(self.level);
    }

    #[cfg(not(debug_assertions))]
    #[inline]
    fn record_release(&self, _mode: debug::Mode, _pass: bool) {}

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> stats::LatchStatsSnapshot {
        self.stats.snapshot()
    }
}

impl fmt::Display for RwLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rwlatch '{}' created at {} lock_word={} waiters={} writer_thread={} sx_recursive={}",
            self.name,
            self.created_site,
            self.lock_word.load(Ordering::Relaxed),
            self.waiters.load(Ordering::Relaxed),
            self.writer_thread.load(Ordering::Relaxed),
            self.sx_recursive.load(Ordering::Relaxed),
        )
    }
}

impl Drop for RwLatch {
    fn drop(&mut self) {
        if self.registered.swap(false, Ordering::AcqRel) {
            registry::deregister(self as *const RwLatch);
        }
    }
}

/// Locks the global latch registry and prints every latch that is not
/// currently unlocked, along with its debug records (spec.md §4.10).
pub fn list_print_info<W: std::io::Write>(out: &mut W) {
    registry::for_each(|latch| {
        let word = latch.lock_word.load(Ordering::Relaxed);
        if word == X_LOCK_DECR {
            return;
        }
        let _ = writeln!(out, "{:p}: {}", latch as *const RwLatch, latch);
        for record in latch.debug_list.snapshot() {
            let _ = writeln!(
                out,
                "    thread={} pass={} mode={:?} site={}",
                record.thread, record.pass, record.mode, record.site
            );
        }
    });
}
