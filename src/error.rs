//! Error types for the core DAG/Hashimoto library (§7).
//!
//! Fatal conditions (allocation failure) are not represented here; Rust's
//! global allocator already aborts the process on allocation failure,
//! which is the faithful analogue of the C original's `exit(1)` path.
//! Everything the core can reject based on caller-supplied input or
//! observable I/O failure is a `DagError` variant instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DagError {
    #[error("expected {expected} hex bytes, got {got}")]
    WrongHexLength { expected: usize, got: usize },

    #[error("non-hex digit in input")]
    BadHexDigit,

    #[error("difficulty must not be zero")]
    ZeroDifficulty,

    #[error("DAG line count mismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: u64, got: u64 },

    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("short write: expected {expected} bytes, got {got}")]
    ShortWrite { expected: usize, got: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
