//! Engine errors.
//!
//! Only caller-contract violations on the input batch are fatal. Everything
//! downstream — syntax errors, unresolved imports, missing symbols — degrades
//! to empty results instead of erroring, so one bad file can never abort a
//! whole-repository analysis.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The batch contains the same repo-relative path twice.
    #[error("duplicate path in batch: {0}")]
    DuplicatePath(String),

    /// A batch entry has an unusable path (empty or whitespace-only).
    #[error("invalid path in batch: {0:?}")]
    InvalidPath(String),
}
