// SPDX-License-Identifier: MPL-2.0
//! The Meek-based enumerator: recursively picks an undirected edge, orients
//! it both ways, closes each branch under Meek, and recurses. Simple and
//! robust, at the cost of re-running the closure at every node rather than
//! the linear-delay bucket bookkeeping the MCS enumerators use.

use std::path::Path;

use num_bigint::BigUint;

use crate::error::EnumError;
use crate::extension::is_extendable;
use crate::graph::Graph;
use crate::measurement::{emit, Measurement};
use crate::meek::meek_closure;

fn first_undirected_from(g: &Graph, start: usize) -> Option<(usize, usize)> {
    let n = g.n_vertices();
    for u in start..n {
        for v in (u + 1)..n {
            if g.is_undirected(u, v) {
                return Some((u, v));
            }
        }
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    g: &Graph,
    start: usize,
    count: &mut BigUint,
    measurement: &mut Measurement,
    sink: &mut dyn FnMut(&Graph),
    out_dir: Option<&Path>,
) -> Result<(), EnumError> {
    let mut gc = g.copy();
    meek_closure(&mut gc);
    match first_undirected_from(&gc, start) {
        None => emit(&gc, count, measurement, sink, out_dir),
        Some((u, v)) => {
            let mut with_u_to_v = gc.copy();
            with_u_to_v.remove_edge(v, u);
            recurse(&with_u_to_v, u, count, measurement, sink, out_dir)?;

            let mut with_v_to_u = gc.copy();
            with_v_to_u.remove_edge(u, v);
            recurse(&with_v_to_u, u, count, measurement, sink, out_dir)
        }
    }
}

/// Enumerates every DAG Markov-equivalent to `g`. If `skip_meek_and_extend_check`
/// is false, verifies `g` is extendable before doing any work (returning a
/// zero count if it is not); otherwise trusts the caller.
pub fn enumerate_meek(
    g: &Graph,
    skip_meek_and_extend_check: bool,
    measurement: &mut Measurement,
    sink: &mut dyn FnMut(&Graph),
    out_dir: Option<&Path>,
) -> Result<BigUint, EnumError> {
    if !skip_meek_and_extend_check && !is_extendable(g) {
        return Ok(BigUint::from(0u32));
    }
    let mut count = BigUint::from(0u32);
    recurse(g, 0, &mut count, measurement, sink, out_dir)?;
    Ok(count)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::measurement::MeasurementConfig;

    fn count_only(g: &Graph) -> BigUint {
        let mut measurement = Measurement::new(&MeasurementConfig::default()).unwrap();
        let mut sink = |_: &Graph| {};
        enumerate_meek(g, false, &mut measurement, &mut sink, None).unwrap()
    }

    fn triangle() -> Graph {
        let mut g = Graph::new(3);
        for &(u, v) in &[(0, 1), (1, 2), (0, 2)] {
            g.add_edge(u, v);
            g.add_edge(v, u);
        }
        g
    }

    #[test]
    fn triangle_has_six_orientations() {
        assert_eq!(count_only(&triangle()), BigUint::from(6u32));
    }

    #[test]
    fn scenario_two_r2_forces_unique_dag() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(0, 2);
        g.add_edge(2, 0);
        assert_eq!(count_only(&g), BigUint::from(1u32));
    }

    #[test]
    fn path_of_four_has_four_orientations() {
        let mut g = Graph::new(4);
        for &(u, v) in &[(0, 1), (1, 2), (2, 3)] {
            g.add_edge(u, v);
            g.add_edge(v, u);
        }
        assert_eq!(count_only(&g), BigUint::from(4u32));
    }

    #[test]
    fn k4_has_twenty_four_orientations() {
        let mut g = Graph::new(4);
        for u in 0..4 {
            for v in (u + 1)..4 {
                g.add_edge(u, v);
                g.add_edge(v, u);
            }
        }
        assert_eq!(count_only(&g), BigUint::from(24u32));
    }

    #[test]
    fn two_disconnected_triangles_multiply() {
        let mut g = Graph::new(6);
        for &(u, v) in &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
            g.add_edge(u, v);
            g.add_edge(v, u);
        }
        assert_eq!(count_only(&g), BigUint::from(36u32));
    }

    #[test]
    fn every_emitted_dag_has_no_undirected_edges() {
        let mut emitted = Vec::new();
        let mut measurement = Measurement::new(&MeasurementConfig::default()).unwrap();
        let mut sink = |d: &Graph| emitted.push(d.copy());
        enumerate_meek(&triangle(), false, &mut measurement, &mut sink, None).unwrap();
        assert_eq!(emitted.len(), 6);
        for d in &emitted {
            assert_eq!(d.unordered_edges().len(), 3);
            for (u, v) in d.unordered_edges() {
                assert!(d.is_directed(u, v) || d.is_directed(v, u));
            }
        }
    }
}
