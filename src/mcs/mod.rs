// SPDX-License-Identifier: MPL-2.0
//! Maximum-cardinality-search bucket enumeration, shared bookkeeping
//! ([`common`]) plus the CPDAG ([`cpdag`]) and PDAG ([`pdag`]) variants.

pub mod common;
pub mod cpdag;
pub mod pdag;
