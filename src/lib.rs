// SPDX-License-Identifier: MPL-2.0
#![warn(missing_docs)]
//! mecenum - enumerates all DAGs Markov-equivalent to a CC/CPDAG/PDAG input
//! graph, by maximum-cardinality-search bucket recursion, successive
//! covered-edge reversal, or Meek-closure-guided splitting.
//!
//! The crate exposes the four independent enumeration entry points and the
//! three graph-theoretic routines they share, plus the ambient collaborator
//! surface (text file I/O, error model, measurement) spec'd for them. It
//! does not provide a `main()`, random-graph generation, or a benchmark
//! harness; those are external collaborators.

mod chickering;
mod enumerate_meek;
mod error;
mod extension;
mod graph;
mod io;
mod mcs;
mod measurement;
mod meek;

pub use chickering::{chickering_enumerate, dfs_enumerate, DEFAULT_MAX_DAGS};
pub use enumerate_meek::enumerate_meek;
pub use error::EnumError;
pub use extension::{extend, is_extendable};
pub use graph::Graph;
pub use io::{read_graph, write_dag};
pub use mcs::cpdag::cpdag_enumerate;
pub use mcs::pdag::pdag_enumerate;
pub use meek::meek_closure;
pub use measurement::{Measurement, MeasurementConfig, MeasurementSummary};
