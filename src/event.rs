// The OS event primitive the spec treats as an external collaborator.
// `event` and `wait_ex_event` are each one of these: a monotonically
// increasing counter plus a way to block until it changes. The public
// contract (`create`, `destroy`, `reset`, `wait`, `signal`) matches spec.md
// §6 exactly so `sync_array` can be written purely in terms of it.
//
// The Linux fast path parks directly on the counter via `futex`, the same
// approach the teacher's `concurrent/rwlock_wp.rs` uses for its single
// writer-preference lock. Other platforms fall back to a `parking_lot`
// `Condvar`, which is a real blocking wait (not a busy-yield loop) so the
// park/wake handshake in §4.6 holds regardless of platform.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};

pub struct Event {
    counter: AtomicU32,
    #[cfg(not(target_os = "linux"))]
    gate: Mutex<()>,
    #[cfg(not(target_os = "linux"))]
    condvar: Condvar,
}

impl Event {
    pub const fn create(initial: u32) -> Self {
        Self {
            counter: AtomicU32::new(initial),
            #[cfg(not(target_os = "linux"))]
            gate: Mutex::new(()),
            #[cfg(not(target_os = "linux"))]
            condvar: Condvar::new(),
        }
    }

    /// Returns the current counter value, to be passed to a later `wait`.
    /// Capturing this before re-checking the guarded predicate is what
    /// prevents a signal that lands between the check and the wait from
    /// being lost.
    #[inline]
    pub fn reset(&self) -> u32 {
        self.counter.load(Ordering::Acquire)
    }

    /// Blocks until the counter no longer equals `counter`, i.e. until a
    /// `signal()` has happened since the matching `reset()`.
    pub fn wait(&self, counter: u32) {
        #[cfg(target_os = "linux")]
        {
            loop {
                if self.counter.load(Ordering::Acquire) != counter {
                    return;
                }
                let futex = &self.counter as *const AtomicU32 as *const libc::c_int;
                unsafe {
                    libc::syscall(
                        libc::SYS_futex,
                        futex,
                        libc::FUTEX_WAIT,
                        counter as libc::c_int,
                        std::ptr::null::<libc::timespec>(),
                    );
                }
                // Either really signalled, or a spurious wake / value
                // already moved on — the loop re-checks the counter.
            }
        }
        #[cfg(not(target_os = "linux"))]
        {
            let mut guard = self.gate.lock();
            while self.counter.load(Ordering::Acquire) == counter {
                self.condvar.wait(&mut guard);
            }
        }
    }

    /// Wakes every thread currently blocked in `wait`.
    pub fn signal(&self) {
        self.counter.fetch_add(1, Ordering::Release);
        #[cfg(target_os = "linux")]
        {
            let futex = &self.counter as *const AtomicU32 as *const libc::c_int;
            unsafe {
                libc::syscall(libc::SYS_futex, futex, libc::FUTEX_WAKE, i32::MAX);
            }
        }
        #[cfg(not(target_os = "linux"))]
        {
            let _guard = self.gate.lock();
            self.condvar.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn signal_wakes_waiter() {
        let event = Arc::new(Event::create(0));
        let waiter = {
            let event = event.clone();
            thread::spawn(move || {
                let counter = event.reset();
                event.wait(counter);
            })
        };

        thread::sleep(Duration::from_millis(20));
        event.signal();
        waiter.join().unwrap();
    }

    #[test]
    fn wait_returns_immediately_if_already_signalled() {
        let event = Event::create(0);
        let counter = event.reset();
        event.signal();
        event.wait(counter); // must not block
    }
}
