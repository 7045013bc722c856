// End-to-end scenarios, one per named test, following the literal
// schedules laid out for this latch: solo reader, reader-then-writer
// handoff, recursive X, SX-then-upgrade, ownership transfer, and SX's
// compatibility with concurrent S.

use rwlatch::rwlatch::{Mode, RwLatch, X_LOCK_DECR, X_LOCK_HALF_DECR};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn fresh() -> RwLatch {
    RwLatch::new(rwlatch::debug::LEVEL_UNRANKED, "scenarios")
}

#[test]
fn solo_reader() {
    let latch = fresh();
    latch.s_lock(false, "a");
    assert_eq!(raw_word(&latch), X_LOCK_DECR - 1);
    latch.s_unlock(false);
    assert_eq!(raw_word(&latch), X_LOCK_DECR);
    assert!(!latch.is_locked(Mode::S));
}

#[test]
fn reader_then_writer_handoff() {
    let latch = Arc::new(fresh());
    latch.s_lock(false, "a");
    assert_eq!(raw_word(&latch), X_LOCK_DECR - 1);

    let writer_done = Arc::new(AtomicBool::new(false));
    let latch_b = latch.clone();
    let done = writer_done.clone();
    let b = thread::spawn(move || {
        latch_b.x_lock(false, "b");
        done.store(true, Ordering::SeqCst);
        assert!(latch_b.own(Mode::X));
        latch_b.x_unlock(false);
    });

    thread::sleep(Duration::from_millis(30));
    assert!(!writer_done.load(Ordering::SeqCst));

    latch.s_unlock(false);
    b.join().unwrap();
    assert!(writer_done.load(Ordering::SeqCst));
    assert_eq!(raw_word(&latch), X_LOCK_DECR);
}

#[test]
fn recursive_x() {
    let latch = fresh();
    latch.x_lock(false, "a1");
    assert_eq!(raw_word(&latch), 0);
    latch.x_lock(false, "a2");
    assert_eq!(raw_word(&latch), -X_LOCK_DECR);
    latch.x_lock(false, "a3");
    assert_eq!(raw_word(&latch), -X_LOCK_DECR - 1);

    latch.x_unlock(false);
    latch.x_unlock(false);
    latch.x_unlock(false);
    assert_eq!(raw_word(&latch), X_LOCK_DECR);
}

#[test]
fn writer_with_sx_then_upgrade() {
    let latch = Arc::new(fresh());
    latch.sx_lock(false, "a");
    assert_eq!(raw_word(&latch), X_LOCK_HALF_DECR);

    latch.s_lock(false, "b");
    assert_eq!(raw_word(&latch), X_LOCK_HALF_DECR - 1);

    let upgraded = Arc::new(AtomicBool::new(false));
    let latch_a = latch.clone();
    let flag = upgraded.clone();
    let a = thread::spawn(move || {
        latch_a.x_lock(false, "a-upgrade");
        flag.store(true, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(30));
    assert!(!upgraded.load(Ordering::SeqCst));

    latch.s_unlock(false);
    a.join().unwrap();
    assert!(upgraded.load(Ordering::SeqCst));
    assert_eq!(raw_word(&latch), -X_LOCK_HALF_DECR);

    latch.x_unlock(false);
    latch.sx_unlock(false);
    assert_eq!(raw_word(&latch), X_LOCK_DECR);
}

#[test]
fn ownership_transfer() {
    let latch = Arc::new(fresh());
    latch.x_lock(true, "a");
    latch.move_ownership();

    let latch_b = latch.clone();
    thread::spawn(move || {
        latch_b.x_unlock(true);
    })
    .join()
    .unwrap();

    assert_eq!(raw_word(&latch), X_LOCK_DECR);
    assert!(!latch.own(Mode::X));
}

#[test]
fn sx_compatible_with_concurrent_s() {
    let latch = Arc::new(fresh());
    latch.sx_lock(false, "a");
    assert_eq!(raw_word(&latch), X_LOCK_HALF_DECR);

    latch.s_lock(false, "b");
    assert_eq!(raw_word(&latch), X_LOCK_HALF_DECR - 1);

    let c_got_sx = Arc::new(AtomicBool::new(false));
    let latch_c = latch.clone();
    let flag = c_got_sx.clone();
    let c = thread::spawn(move || {
        latch_c.sx_lock(false, "c");
        flag.store(true, Ordering::SeqCst);
        latch_c.sx_unlock(false);
    });

    thread::sleep(Duration::from_millis(30));
    assert!(!c_got_sx.load(Ordering::SeqCst));

    latch.s_unlock(false);
    latch.sx_unlock(false);
    c.join().unwrap();
    assert!(c_got_sx.load(Ordering::SeqCst));
}

fn raw_word(latch: &RwLatch) -> i32 {
    // Public API exposes state only through `is_locked`/`own`/`validate`;
    // the scenarios above additionally want the literal lock_word values
    // from the schedules, so this reaches in via `Display`'s debug
    // rendering rather than adding a test-only accessor to the public API.
    let rendered = latch.to_string();
    let marker = "lock_word=";
    let start = rendered.find(marker).unwrap() + marker.len();
    let rest = &rendered[start..];
    let end = rest.find(' ').unwrap_or(rest.len());
    rest[..end].parse().unwrap()
}
