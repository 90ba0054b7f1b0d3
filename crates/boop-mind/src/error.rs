//! Task-model errors.
//!
//! These are component-level errors: the runtime catches them at the
//! mind-step boundary and converts the mind into a remnant with
//! `ok = false` instead of aborting the shard.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MindError {
    #[error("mind has no task to step")]
    NoThunk,

    #[error("wait condition outside the grammar (empty any/all)")]
    InvalidWaitFor,
}

pub type MindResult<T> = Result<T, MindError>;
