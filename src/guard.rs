// RAII wrappers around `RwLatch::{s,x,sx}_lock`/`_unlock`. `RwLatch`
// carries no payload of its own (spec.md §6 — it guards external state,
// not a `T` living inside it), so these guards are bare markers: their
// only job is to call the matching unlock on `Drop`, the same shape as
// the teacher's `RwLockWP` guards in `concurrent/rwlock_wp.rs` minus the
// deref-to-data half, which has nothing to point at here.

use crate::rwlatch::RwLatch;

pub struct SGuard<'a> {
    latch: &'a RwLatch,
}

impl<'a> SGuard<'a> {
    pub(crate) fn new(latch: &'a RwLatch, site: &'static str) -> Self {
        latch.s_lock(false, site);
        Self { latch }
    }
}

impl Drop for SGuard<'_> {
    fn drop(&mut self) {
        self.latch.s_unlock(false);
    }
}

pub struct XGuard<'a> {
    latch: &'a RwLatch,
}

impl<'a> XGuard<'a> {
    pub(crate) fn new(latch: &'a RwLatch, site: &'static str) -> Self {
        latch.x_lock(false, site);
        Self { latch }
    }
}

impl Drop for XGuard<'_> {
    fn drop(&mut self) {
        self.latch.x_unlock(false);
    }
}

pub struct SxGuard<'a> {
    latch: &'a RwLatch,
}

impl<'a> SxGuard<'a> {
    pub(crate) fn new(latch: &'a RwLatch, site: &'static str) -> Self {
        latch.sx_lock(false, site);
        Self { latch }
    }
}

impl Drop for SxGuard<'_> {
    fn drop(&mut self) {
        self.latch.sx_unlock(false);
    }
}

impl RwLatch {
    pub fn lock_s(&self, site: &'static str) -> SGuard<'_> {
        SGuard::new(self, site)
    }

    pub fn lock_x(&self, site: &'static str) -> XGuard<'_> {
        XGuard::new(self, site)
    }

    pub fn lock_sx(&self, site: &'static str) -> SxGuard<'_> {
        SxGuard::new(self, site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug;

    #[test]
    fn s_guard_releases_on_drop() {
        let latch = RwLatch::new(debug::LEVEL_UNRANKED, "test");
        {
            let _g = latch.lock_s("test");
            assert!(latch.is_locked(crate::rwlatch::Mode::S));
        }
        assert!(!latch.is_locked(crate::rwlatch::Mode::S));
    }

    #[test]
    fn x_guard_releases_on_drop() {
        let latch = RwLatch::new(debug::LEVEL_UNRANKED, "test");
        {
            let _g = latch.lock_x("test");
            assert!(latch.own(crate::rwlatch::Mode::X));
        }
        assert!(!latch.own(crate::rwlatch::Mode::X));
    }

    #[test]
    fn sx_guard_releases_on_drop() {
        let latch = RwLatch::new(debug::LEVEL_UNRANKED, "test");
        {
            let _g = latch.lock_sx("test");
            assert!(latch.own(crate::rwlatch::Mode::Sx));
        }
        assert!(!latch.own(crate::rwlatch::Mode::Sx));
    }
}
