// SPDX-License-Identifier: MPL-2.0
//! The extension engine: decides whether a PDAG has a consistent DAG
//! extension and, if so, produces one, by repeatedly peeling off "potential
//! sinks" while maintaining the incremental δ/α/β counters of an
//! [`ExtendedGraph`] in O(1) amortized work per peeled vertex.

use crate::graph::Graph;

/// A working copy of a graph plus the incremental counters that make
/// potential-sink testing O(1). All counters are signed so a debug build can
/// observe one going negative (an invariant violation) instead of silently
/// wrapping.
#[derive(Debug, Clone)]
pub struct ExtendedGraph {
    g: Graph,
    out_dir: Vec<i64>,
    in_dir: Vec<i64>,
    out_undir: Vec<i64>,
    in_undir: Vec<i64>,
    alpha: Vec<i64>,
    beta: Vec<i64>,
}

impl ExtendedGraph {
    /// Builds the extended graph for `g`, adding its edges one unordered
    /// pair at a time (ascending) so that every α/β contribution is counted
    /// exactly once, at the moment the last of a triangle's three edges is
    /// added — the standard incremental-triangle-counting argument, carried
    /// over to the richer eight-case α/β table below.
    pub fn build(g: &Graph) -> ExtendedGraph {
        let n = g.n_vertices();
        let mut eg = ExtendedGraph {
            g: Graph::new(n),
            out_dir: vec![0; n],
            in_dir: vec![0; n],
            out_undir: vec![0; n],
            in_undir: vec![0; n],
            alpha: vec![0; n],
            beta: vec![0; n],
        };
        for (u, v) in g.unordered_edges() {
            if g.is_undirected(u, v) {
                eg.g.add_edge(u, v);
                eg.g.add_edge(v, u);
                eg.out_undir[u] += 1;
                eg.in_undir[u] += 1;
                eg.out_undir[v] += 1;
                eg.in_undir[v] += 1;
                eg.update_alpha_beta(u, v, 1, false);
            } else if g.is_directed(u, v) {
                eg.g.add_edge(u, v);
                eg.out_dir[u] += 1;
                eg.in_dir[v] += 1;
                eg.update_alpha_beta(u, v, 1, true);
            } else if g.is_directed(v, u) {
                eg.g.add_edge(v, u);
                eg.out_dir[v] += 1;
                eg.in_dir[u] += 1;
                eg.update_alpha_beta(v, u, 1, true);
            }
        }
        eg
    }

    /// The eight-case α/β update table. `is_directed` means the edge runs
    /// `u -> v`; for an undirected edge `u` and `v` are interchangeable (the
    /// table's rows come in u/v mirror pairs in that case). Deliberately
    /// literal: row 4 (`isD ∧ VX → β[v]`) has no `β[u]` mirror, an asymmetry
    /// the source material calls out and instructs not to "fix".
    fn update_alpha_beta(&mut self, u: usize, v: usize, val: i64, is_directed: bool) {
        let nu = self.g.all_neighbors_set(u);
        let nv = self.g.all_neighbors_set(v);
        for &x in nu.intersection(&nv) {
            let ux = self.g.is_undirected(u, x);
            let vx = self.g.is_undirected(v, x);
            if !is_directed && ux {
                self.alpha[u] += val;
            }
            if !is_directed && !self.g.has_edge(u, x) && self.g.has_edge(x, u) {
                self.beta[u] += val;
            }
            if !is_directed && vx {
                self.alpha[v] += val;
            }
            if is_directed && vx {
                self.beta[v] += val;
            }
            if !is_directed && self.g.has_edge(x, v) && !self.g.has_edge(v, x) {
                self.beta[v] += val;
            }
            if ux && vx {
                self.alpha[x] += val;
            }
            if vx && self.g.has_edge(u, x) && !self.g.has_edge(x, u) {
                self.beta[x] += val;
            }
            if ux && !self.g.has_edge(x, v) && self.g.has_edge(v, x) {
                self.beta[x] += val;
            }
        }
        debug_assert!(self.alpha.iter().all(|&a| a >= 0), "alpha went negative");
        debug_assert!(self.beta.iter().all(|&b| b >= 0), "beta went negative");
    }

    /// `s` is a potential sink: no outgoing directed edge, every pair of its
    /// undirected neighbors is itself adjacent, and every directed
    /// predecessor is adjacent to every undirected neighbor.
    pub fn is_potential_sink(&self, s: usize) -> bool {
        let d = self.out_undir[s];
        let expected_alpha = d * (d - 1) / 2;
        self.out_dir[s] == 0 && self.alpha[s] == expected_alpha && self.beta[s] == d * self.in_dir[s]
    }

    fn remove_directed_predecessor(&mut self, p: usize, s: usize) {
        self.update_alpha_beta(p, s, -1, true);
        self.g.remove_edge(p, s);
        self.out_dir[p] -= 1;
        self.in_dir[s] -= 1;
    }

    fn remove_undirected_neighbor(&mut self, s: usize, u: usize) {
        self.update_alpha_beta(s, u, -1, false);
        self.g.remove_edge(s, u);
        self.g.remove_edge(u, s);
        self.out_undir[s] -= 1;
        self.in_undir[s] -= 1;
        self.out_undir[u] -= 1;
        self.in_undir[u] -= 1;
    }

    /// Strips every edge incident to the potential sink `s`, keeping δ/α/β
    /// consistent. Predecessors are processed before undirected neighbors,
    /// matching the order the source material lists them in.
    fn remove_sink(&mut self, s: usize) {
        let preds: Vec<usize> = self.g.parents_of(s).collect();
        for p in preds {
            self.remove_directed_predecessor(p, s);
        }
        let unds: Vec<usize> = self.g.adjacent_undirected(s).collect();
        for u in unds {
            self.remove_undirected_neighbor(s, u);
        }
    }

    /// Recomputes α/β for every vertex from scratch, for test-only
    /// cross-checking against the incrementally maintained values.
    #[cfg(test)]
    fn recompute_alpha_beta(&self) -> (Vec<i64>, Vec<i64>) {
        let n = self.g.n_vertices();
        let mut alpha = vec![0i64; n];
        let mut beta = vec![0i64; n];
        for v in 0..n {
            let und: Vec<usize> = self.g.adjacent_undirected(v).collect();
            for i in 0..und.len() {
                for j in (i + 1)..und.len() {
                    if self.g.is_adjacent(und[i], und[j]) {
                        alpha[v] += 1;
                    }
                }
            }
            for y in self.g.parents_of(v) {
                for &x in &und {
                    if self.g.is_adjacent(y, x) {
                        beta[v] += 1;
                    }
                }
            }
        }
        (alpha, beta)
    }
}

/// Peels potential sinks off a working copy of `g`, returning the emptied
/// [`ExtendedGraph`] (whose remaining arc count tells the caller whether `g`
/// was extendable) for reuse by [`extend`].
fn peel(g: &Graph) -> (ExtendedGraph, bool) {
    let n = g.n_vertices();
    let mut eg = ExtendedGraph::build(g);
    let mut removed = vec![false; n];
    let mut stack: Vec<usize> = (0..n).filter(|&v| eg.is_potential_sink(v)).collect();
    while let Some(s) = stack.pop() {
        if removed[s] {
            continue;
        }
        removed[s] = true;
        let neighbors_before: Vec<usize> = eg.g.all_neighbors(s).collect();
        eg.remove_sink(s);
        for w in neighbors_before {
            if !removed[w] && eg.is_potential_sink(w) {
                stack.push(w);
            }
        }
    }
    let extendable = eg.g.n_arcs() == 0;
    (eg, extendable)
}

/// True iff `g` has a consistent DAG extension.
pub fn is_extendable(g: &Graph) -> bool {
    peel(g).1
}

/// Extends `g` to a DAG consistent with its directed edges and skeleton, by
/// running the same potential-sink peeling used by [`is_extendable`] while
/// mirroring every peel onto a working copy `d` of `g`: whenever `s` is
/// popped, `d` drops the arcs `s -> u` for `u` among `s`'s current
/// out-neighbors, leaving every edge at `s` oriented *into* it. Returns
/// `None` if `g` has no consistent extension.
pub fn extend(g: &Graph) -> Option<Graph> {
    let n = g.n_vertices();
    let mut eg = ExtendedGraph::build(g);
    let mut d = g.copy();
    let mut removed = vec![false; n];
    let mut stack: Vec<usize> = (0..n).filter(|&v| eg.is_potential_sink(v)).collect();
    while let Some(s) = stack.pop() {
        if removed[s] {
            continue;
        }
        removed[s] = true;
        for u in eg.g.out_neighbors(s).collect::<Vec<_>>() {
            d.remove_edge(s, u);
        }
        let neighbors_before: Vec<usize> = eg.g.all_neighbors(s).collect();
        eg.remove_sink(s);
        for w in neighbors_before {
            if !removed[w] && eg.is_potential_sink(w) {
                stack.push(w);
            }
        }
    }
    if eg.g.n_arcs() == 0 {
        Some(d)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn has_cycle(g: &Graph) -> bool {
        let n = g.n_vertices();
        let mut indeg: Vec<usize> = (0..n).map(|v| g.parents_of(v).count()).collect();
        let mut queue: Vec<usize> = (0..n).filter(|&v| indeg[v] == 0).collect();
        let mut visited = 0;
        while let Some(v) = queue.pop() {
            visited += 1;
            for c in g.children_of(v).collect::<Vec<_>>() {
                indeg[c] -= 1;
                if indeg[c] == 0 {
                    queue.push(c);
                }
            }
        }
        visited != n
    }

    #[test]
    fn triangle_is_extendable_and_acyclic() {
        let mut g = Graph::new(3);
        for &(u, v) in &[(0, 1), (1, 2), (0, 2)] {
            g.add_edge(u, v);
            g.add_edge(v, u);
        }
        assert!(is_extendable(&g));
        let d = extend(&g).unwrap();
        assert!(!has_cycle(&d));
        assert_eq!(d.n_arcs(), 3);
    }

    #[test]
    fn k4_is_extendable() {
        let mut g = Graph::new(4);
        for u in 0..4 {
            for v in (u + 1)..4 {
                g.add_edge(u, v);
                g.add_edge(v, u);
            }
        }
        assert!(is_extendable(&g));
        let d = extend(&g).unwrap();
        assert!(!has_cycle(&d));
        assert_eq!(d.n_arcs(), 6);
    }

    #[test]
    fn path_is_extendable() {
        let mut g = Graph::new(4);
        for &(u, v) in &[(0, 1), (1, 2), (2, 3)] {
            g.add_edge(u, v);
            g.add_edge(v, u);
        }
        assert!(is_extendable(&g));
        let d = extend(&g).unwrap();
        assert!(!has_cycle(&d));
    }

    #[test]
    fn already_directed_edges_are_preserved() {
        // 1 -> 2, 2 -> 3, 1 - 3 : after extension the directed edges survive.
        let mut g = Graph::new(3);
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(0, 2);
        g.add_edge(2, 0);
        assert!(is_extendable(&g));
        let d = extend(&g).unwrap();
        assert!(d.is_directed(0, 1));
        assert!(d.is_directed(1, 2));
    }

    #[test]
    fn shielded_collider_is_still_extendable() {
        // 1 -> 2, 3 -> 2, 1 - 3: 1 and 3 are adjacent, so this is a shielded
        // collider rather than a v-structure, and has a consistent
        // extension (2 is a vacuous potential sink since it has no
        // undirected neighbors at all).
        let mut g = Graph::new(3);
        g.add_edge(0, 1);
        g.add_edge(2, 1);
        g.add_edge(0, 2);
        g.add_edge(2, 0);
        assert!(is_extendable(&g));
        let d = extend(&g).unwrap();
        assert!(!has_cycle(&d));
        assert!(d.is_directed(0, 1));
        assert!(d.is_directed(2, 1));
    }

    #[test]
    fn preexisting_directed_cycle_is_not_extendable() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 0);
        assert!(!is_extendable(&g));
        assert!(extend(&g).is_none());
    }

    #[test]
    fn alpha_beta_match_recomputation_from_scratch() {
        let mut g = Graph::new(5);
        for &(u, v) in &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)] {
            g.add_edge(u, v);
            g.add_edge(v, u);
        }
        g.add_edge(0, 2);
        g.add_edge(2, 0);
        let eg = ExtendedGraph::build(&g);
        let (alpha, beta) = eg.recompute_alpha_beta();
        assert_eq!(eg.alpha, alpha);
        assert_eq!(eg.beta, beta);
    }

    #[test]
    fn two_disconnected_triangles_are_extendable() {
        let mut g = Graph::new(6);
        for &(u, v) in &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
            g.add_edge(u, v);
            g.add_edge(v, u);
        }
        assert!(is_extendable(&g));
    }
}
