// SPDX-License-Identifier: MPL-2.0
//! `pdag_enumerate`: generalizes [`crate::mcs::cpdag::cpdag_enumerate`] to a
//! PDAG carrying background-knowledge directed edges. Pre-converts the
//! input to its MPDAG (extendability check + Meek closure), then runs the
//! same bucket recursion over a second label axis that tracks, per vertex,
//! how many of its in-component directed predecessors remain unvisited —
//! so the emitted order always respects those background directions.

use std::path::Path;

use num_bigint::BigUint;

use crate::error::EnumError;
use crate::extension::is_extendable;
use crate::graph::Graph;
use crate::measurement::{emit, Measurement};
use crate::meek::meek_closure;

use super::common::{
    construct_dag, reachable_within_top_bucket, undirected_subgraph_bidirected, Buckets,
};

// A single set() can raise a combined-graph neighbor's label by 2 (the
// visited-neighbor-count term) and, if that neighbor is also the last
// unvisited in-component parent of some vertex, by a further 1 (the
// indeg-zero flag term) — up to 3 in total.
const PDAG_MAX_BUMP: usize = 3;

/// Per-vertex static structure derived from the MPDAG once, before
/// recursion starts: which vertices are `v`'s directed predecessors inside
/// `v`'s own undirected-component (`parents[v]`, used only to size
/// `indeg`), and the reverse map (`children_in_component[v]`: the vertices
/// for which `v` is such a predecessor, walked every time `v` is set/reset).
struct ComponentStructure {
    /// Bidirected union of `g`'s undirected edges with its in-component
    /// directed edges — contributes the `2 * (#visited combined-neighbors)`
    /// term of the label (both kinds of edge count, per spec.md §4.6: a
    /// vertex freed only by an in-component directed predecessor becoming
    /// visited must rank alongside one freed by an undirected sibling) and
    /// is also used for sibling reachability queries.
    combined: Graph,
    /// `children_in_component[v]`: vertices `w` with `v` a directed
    /// predecessor inside `w`'s own component.
    children_in_component: Vec<Vec<usize>>,
    /// Initial `indeg[v]`: count of `v`'s directed predecessors inside its
    /// own component.
    indeg0: Vec<usize>,
}

fn build_component_structure(g: &Graph, comp: &[usize]) -> ComponentStructure {
    let n = g.n_vertices();
    let mut combined = undirected_subgraph_bidirected(g);
    let mut children_in_component = vec![Vec::new(); n];
    let mut indeg0 = vec![0usize; n];
    for (u, v) in g.edges() {
        if g.is_directed(u, v) && comp[u] == comp[v] {
            combined.add_edge(u, v);
            combined.add_edge(v, u);
            children_in_component[u].push(v);
            indeg0[v] += 1;
        }
    }
    ComponentStructure {
        combined,
        children_in_component,
        indeg0,
    }
}

fn initial_labels(indeg: &[usize]) -> Vec<usize> {
    indeg
        .iter()
        .map(|&d| 1 + usize::from(d == 0))
        .collect()
}

struct SavedSet {
    saved_max_a: usize,
}

fn set_vertex(
    cs: &ComponentStructure,
    buckets: &mut Buckets,
    indeg: &mut [usize],
    v: usize,
) -> SavedSet {
    let saved_max_a = buckets.max_a;
    buckets.visited[v] = true;
    buckets.a[buckets.label[v]].remove(&v);
    buckets.tau[buckets.i] = v;
    buckets.i += 1;

    for w in cs.combined.all_neighbors(v) {
        if !buckets.visited[w] {
            buckets.bump_label(w, 2);
        }
    }
    for &w in &cs.children_in_component[v] {
        if !buckets.visited[w] {
            indeg[w] -= 1;
            if indeg[w] == 0 {
                buckets.bump_label(w, 1);
            }
        }
    }

    buckets.max_a = saved_max_a + PDAG_MAX_BUMP;
    buckets.descend_max_a();
    SavedSet { saved_max_a }
}

fn reset_vertex(cs: &ComponentStructure, buckets: &mut Buckets, indeg: &mut [usize], v: usize, saved: SavedSet) {
    for &w in &cs.children_in_component[v] {
        if !buckets.visited[w] {
            if indeg[w] == 0 {
                buckets.unbump_label(w, 1);
            }
            indeg[w] += 1;
        }
    }
    for w in cs.combined.all_neighbors(v) {
        if !buckets.visited[w] {
            buckets.unbump_label(w, 2);
        }
    }

    buckets.max_a = saved.saved_max_a;
    buckets.i -= 1;
    buckets.a[buckets.label[v]].insert(v);
    buckets.visited[v] = false;
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    g: &Graph,
    cs: &ComponentStructure,
    buckets: &mut Buckets,
    indeg: &mut [usize],
    count: &mut BigUint,
    measurement: &mut Measurement,
    sink: &mut dyn FnMut(&Graph),
    out_dir: Option<&Path>,
) -> Result<(), EnumError> {
    let n = g.n_vertices();
    if buckets.i == n {
        let dag = construct_dag(g, &buckets.tau);
        return emit(&dag, count, measurement, sink, out_dir);
    }
    let v = buckets
        .first_in_max_bucket()
        .expect("A[maxA] must be non-empty while vertices remain unvisited");
    let r = reachable_within_top_bucket(&cs.combined, buckets, v);

    let saved = set_vertex(cs, buckets, indeg, v);
    recurse(g, cs, buckets, indeg, count, measurement, sink, out_dir)?;
    reset_vertex(cs, buckets, indeg, v, saved);

    for &x in r.iter().filter(|&&x| x != v) {
        let saved = set_vertex(cs, buckets, indeg, x);
        recurse(g, cs, buckets, indeg, count, measurement, sink, out_dir)?;
        reset_vertex(cs, buckets, indeg, x, saved);
    }
    Ok(())
}

/// Enumerates every DAG Markov-equivalent to the PDAG `g`, respecting its
/// background-knowledge directed edges. Converts `g` to its MPDAG first
/// (extendability check, then Meek closure); returns a zero count if `g` is
/// not extendable.
pub fn pdag_enumerate(
    g: &Graph,
    measurement: &mut Measurement,
    sink: &mut dyn FnMut(&Graph),
    out_dir: Option<&Path>,
) -> Result<BigUint, EnumError> {
    if !is_extendable(g) {
        return Ok(BigUint::from(0u32));
    }
    let mut mpdag = g.copy();
    meek_closure(&mut mpdag);

    let n = mpdag.n_vertices();
    let comp = super::common::undirected_components(&mpdag);
    let cs = build_component_structure(&mpdag, &comp);
    let mut indeg = cs.indeg0.clone();
    let max_label = 2 * (n + 2);
    let mut buckets = Buckets::new(initial_labels(&indeg), max_label);

    let mut count = BigUint::from(0u32);
    recurse(
        &mpdag,
        &cs,
        &mut buckets,
        &mut indeg,
        &mut count,
        measurement,
        sink,
        out_dir,
    )?;
    Ok(count)
}
