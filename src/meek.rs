// SPDX-License-Identifier: MPL-2.0
//! The four Meek orientation rules, applied to a fixpoint ("Meek closure").
//! Orienting an edge means deleting its reverse arc; each application
//! strictly shrinks the undirected edge count, so the closure always
//! terminates in at most `m` passes.

use crate::graph::Graph;

/// R1: `a -> b`, `b - c`, `a` not adjacent to `c` forces `b -> c`.
fn rule1_forces(g: &Graph, b: usize, c: usize) -> bool {
    g.parents_of(b).any(|a| a != c && !g.is_adjacent(a, c))
}

/// R2: `a -> b -> c`, `a - c` forces `a -> c`.
fn rule2_forces(g: &Graph, a: usize, c: usize) -> bool {
    g.children_of(a).any(|b| g.is_directed(b, c))
}

/// R3: `a - b`, `a - c`, `a - d`, `b -> c`, `d -> c`, `b` not adjacent to `d`
/// forces `a -> c`.
fn rule3_forces(g: &Graph, a: usize, c: usize) -> bool {
    let und: Vec<usize> = g.adjacent_undirected(a).collect();
    for &b in &und {
        if !g.is_directed(b, c) {
            continue;
        }
        for &d in &und {
            if d == b || !g.is_directed(d, c) || g.is_adjacent(b, d) {
                continue;
            }
            return true;
        }
    }
    false
}

/// R4: `a - b`, `a - c`, `a - d`, `d -> c -> b`, `b` not adjacent to `d`
/// forces `a -> b`.
fn rule4_forces(g: &Graph, a: usize, b: usize) -> bool {
    let und: Vec<usize> = g.adjacent_undirected(a).collect();
    for &c in &und {
        if !g.is_directed(c, b) {
            continue;
        }
        for &d in &und {
            if d == b || d == c || !g.is_directed(d, c) || g.is_adjacent(b, d) {
                continue;
            }
            return true;
        }
    }
    false
}

fn forces_orientation(g: &Graph, x: usize, y: usize) -> bool {
    rule1_forces(g, x, y) || rule2_forces(g, x, y) || rule3_forces(g, x, y) || rule4_forces(g, x, y)
}

/// Applies R1–R4 to `g` in place until no rule fires in a full pass over its
/// undirected edges, turning a PDAG into its MPDAG.
pub fn meek_closure(g: &mut Graph) {
    loop {
        let mut changed = false;
        for (x, y) in g.unordered_edges() {
            if !g.is_undirected(x, y) {
                continue;
            }
            if forces_orientation(g, x, y) {
                g.remove_edge(y, x);
                changed = true;
            } else if forces_orientation(g, y, x) {
                g.remove_edge(x, y);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}
