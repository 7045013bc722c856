// Stand-in for the spec's "sync-array" collaborator: it hands out wait
// cells tied to an `Event` and (in the real engine) performs deadlock
// detection across every latch in the process. Deadlock detection is
// explicitly out of scope here (spec.md §1 Non-goals) and belongs to a
// component this crate does not own; what's left, and what every caller
// in `rwlatch.rs` actually needs, is cell reservation with the
// reserve-before-recheck discipline that makes the park/wake handshake
// safe.
//
// A real sync-array is process-wide and multiplexes many latches onto a
// bounded pool of OS wait slots. Each `RwLatch` here owns its own two
// `Event`s directly, so "reserving a cell" degenerates to capturing that
// event's current counter — there is no separate slot table to manage.

use crate::event::Event;

/// The wait-queue a cell was reserved against, kept only for statistics
/// and diagnostic dumps (spec.md §4.9/§4.10) — it has no effect on
/// blocking behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    S,
    X,
    Sx,
    XWait,
}

pub struct WaitCell<'a> {
    event: &'a Event,
    counter: u32,
    pub mode: WaitMode,
}

/// Captures the event's counter before the caller performs its final
/// predicate re-check. This ordering — reserve, re-check, then wait — is
/// what guarantees a signal landing between the re-check and the actual
/// block is not missed: the counter observed here already reflects
/// anything that happened up to this call.
pub fn reserve_cell(event: &Event, mode: WaitMode) -> WaitCell<'_> {
    WaitCell {
        event,
        counter: event.reset(),
        mode,
    }
}

impl<'a> WaitCell<'a> {
    /// Blocks until the reserving event is signalled.
    pub fn wait(&self) {
        self.event.wait(self.counter);
    }

    /// Releases the cell without waiting — used when a retry of the fast
    /// path succeeds between reservation and blocking.
    pub fn free(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn free_does_not_block() {
        let event = Event::create(0);
        let cell = reserve_cell(&event, WaitMode::S);
        cell.free();
    }

    #[test]
    fn wait_blocks_until_signalled() {
        let event = Arc::new(Event::create(0));
        let cell_event = event.clone();
        let handle = thread::spawn(move || {
            let cell = reserve_cell(&cell_event, WaitMode::X);
            cell.wait();
        });

        thread::sleep(Duration::from_millis(20));
        event.signal();
        handle.join().unwrap();
    }
}
