use thiserror::Error;

/// Non-fatal error surface for the latch.
///
/// Invariant violations (the programmer-error class described in the
/// design notes) are never represented here — those abort the process via
/// `debug_assert!`/`panic!` at the point of detection. This type covers
/// only the conditions a caller can reasonably recover from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RwLatchError {
    #[error("lock_word {0} outside the valid range (-2*D, D]")]
    LockWordOutOfRange(i32),

    #[error("waiters flag held value {0}, expected 0 or 1")]
    WaitersOutOfRange(i32),

    #[error("operation would block")]
    WouldBlock,
}

pub type Result<T> = std::result::Result<T, RwLatchError>;
