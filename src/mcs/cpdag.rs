// SPDX-License-Identifier: MPL-2.0
//! `cpdag_enumerate`: linear-delay enumeration of a CPDAG's Markov
//! equivalence class by maximum-cardinality-search bucket recursion.

use std::path::Path;

use num_bigint::BigUint;

use crate::error::EnumError;
use crate::graph::Graph;
use crate::mcs::common::{
    construct_dag, reachable_within_top_bucket, undirected_subgraph_bidirected, Buckets,
};
use crate::measurement::{emit, Measurement};

const CPDAG_MAX_BUMP: usize = 1;

fn set_vertex(c: &Graph, buckets: &mut Buckets, v: usize) -> usize {
    let saved_max_a = buckets.max_a;
    buckets.visited[v] = true;
    buckets.a[buckets.label[v]].remove(&v);
    buckets.tau[buckets.i] = v;
    buckets.i += 1;
    for w in c.all_neighbors(v) {
        if !buckets.visited[w] {
            buckets.bump_label(w, 1);
        }
    }
    buckets.max_a = saved_max_a + CPDAG_MAX_BUMP;
    buckets.descend_max_a();
    saved_max_a
}

fn reset_vertex(c: &Graph, buckets: &mut Buckets, v: usize, saved_max_a: usize) {
    for w in c.all_neighbors(v) {
        if !buckets.visited[w] {
            buckets.unbump_label(w, 1);
        }
    }
    buckets.max_a = saved_max_a;
    buckets.i -= 1;
    buckets.a[buckets.label[v]].insert(v);
    buckets.visited[v] = false;
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    g: &Graph,
    c: &Graph,
    buckets: &mut Buckets,
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
    let r = reachable_within_top_bucket(c, buckets, v);

    let saved = set_vertex(c, buckets, v);
    recurse(g, c, buckets, count, measurement, sink, out_dir)?;
    reset_vertex(c, buckets, v, saved);

    for &x in r.iter().filter(|&&x| x != v) {
        let saved = set_vertex(c, buckets, x);
        recurse(g, c, buckets, count, measurement, sink, out_dir)?;
        reset_vertex(c, buckets, x, saved);
    }
    Ok(())
}

/// Enumerates every DAG Markov-equivalent to the CPDAG (or CC) `g`.
pub fn cpdag_enumerate(
    g: &Graph,
    measurement: &mut Measurement,
    sink: &mut dyn FnMut(&Graph),
    out_dir: Option<&Path>,
) -> Result<BigUint, EnumError> {
    let n = g.n_vertices();
    let c = undirected_subgraph_bidirected(g);
    let mut buckets = Buckets::new(vec![1; n], n.max(1));
    let mut count = BigUint::from(0u32);
    recurse(g, &c, &mut buckets, &mut count, measurement, sink, out_dir)?;
    Ok(count)
}
