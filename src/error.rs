// SPDX-License-Identifier: MPL-2.0
//! Error conditions raised by the enumeration core.
//!
//! Two conditions from spec.md §7 are deliberately *not* variants here:
//! a non-extendable input (§7.1) is "not an error for the caller" by the
//! spec's own words, so every enumerator that requires a DAG seed signals
//! it the way the spec prescribes — a zero `count` — rather than via
//! `Result::Err`; and an invariant violation (§7.4) is fatal and
//! unrecoverable by construction, caught by `debug_assert!` at the few
//! sites that maintain incremental bookkeeping (`extension.rs`'s δ/α/β
//! counters), which is exactly spec.md's "assert internal invariants in
//! debug builds" instruction and costs nothing in a release build.

use std::{error::Error, fmt, io};

/// Errors that can arise while loading a graph or enumerating its Markov
/// equivalence class.
#[derive(Debug)]
pub enum EnumError {
    /// The measurement sink's configured deadline was reached. Carries the
    /// number of DAGs emitted before cancellation; descriptive statistics
    /// computed from the sink up to this point remain valid, but the total
    /// count is incomplete.
    DeadlineExceeded {
        /// Number of DAGs emitted before the deadline fired.
        emitted: u64,
    },
    /// The graph file collaborator handed us something that doesn't parse.
    Io(io::Error),
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumError::DeadlineExceeded { emitted } => {
                write!(f, "deadline exceeded after emitting {emitted} DAGs")
            }
            EnumError::Io(e) => write!(f, "malformed graph input: {e}"),
        }
    }
}

impl Error for EnumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EnumError::Io(e) => Some(e),
            EnumError::DeadlineExceeded { .. } => None,
        }
    }
}

impl From<io::Error> for EnumError {
    fn from(e: io::Error) -> Self {
        EnumError::Io(e)
    }
}
