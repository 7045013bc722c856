//! Lock-free three-mode (S/X/SX) reader-writer latch for storage engine
//! hot paths.
//!
//! The core type is [`RwLatch`]: a single atomic word encodes every
//! combination of shared, exclusive, and shared-exclusive holders, with
//! a spin-then-park fallback for contended acquires. [`SGuard`],
//! [`XGuard`], and [`SxGuard`] wrap it in the usual RAII pattern for
//! callers who do not want to pair `*_lock`/`*_unlock` calls by hand.
//!
//! See `DESIGN.md` in the repository root for how each module maps back
//! to its sources.

pub mod config;
pub mod debug;
pub mod error;
pub mod event;
pub mod registry;
pub mod rwlatch;
pub mod stats;
pub mod sync_array;
pub mod thread_id;

pub use config::{set_tunables, Tunables};
pub use error::{Result, RwLatchError};
pub use rwlatch::{flag, list_print_info, Mode, RwLatch};

mod guard;
pub use guard::{SGuard, SxGuard, XGuard};
