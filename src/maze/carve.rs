//! Randomized frontier growth (a Prim's variant) over the grid graph
//!
//! Each non-root node joins the tree through exactly one passage to an
//! already-integrated neighbor, so the result is a spanning tree.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::grid::{Node, NodeId};

/// Seed for a level. Stable across restarts for the same size and modifier.
pub fn level_seed(rows: usize, cols: usize, seed_modifier: i64) -> u64 {
    ((rows * cols * cols) as u64).wrapping_add(seed_modifier as u64)
}

/// Maze RNG for a level
pub fn level_rng(rows: usize, cols: usize, seed_modifier: i64) -> Pcg32 {
    Pcg32::seed_from_u64(level_seed(rows, cols, seed_modifier))
}

/// Carve passages in place. Resets any previous carve state first.
pub fn carve<R: Rng + ?Sized>(nodes: &mut [Node], rng: &mut R) {
    for node in nodes.iter_mut() {
        node.connected.clear();
        node.queued = false;
        node.integrated = false;
    }
    if nodes.is_empty() {
        return;
    }

    let root = rng.random_range(0..nodes.len());
    nodes[root].queued = true;
    let mut frontier: Vec<NodeId> = vec![root];

    while !frontier.is_empty() {
        let id = frontier.remove(rng.random_range(0..frontier.len()));

        let degree = nodes[id].adjacent.len();
        if degree > 0 {
            let start = rng.random_range(0..degree);
            let anchor = (0..degree)
                .map(|k| nodes[id].adjacent[(start + k) % degree])
                .find(|&other| nodes[other].integrated);
            if let Some(other) = anchor {
                nodes[id].connected.push(other);
                nodes[other].connected.push(id);
            }
        }
        nodes[id].integrated = true;

        for k in 0..degree {
            let other = nodes[id].adjacent[k];
            if !nodes[other].queued && !nodes[other].integrated {
                nodes[other].queued = true;
                frontier.push(other);
            }
        }
    }
}

/// Undirected passage count
pub fn passage_count(nodes: &[Node]) -> usize {
    nodes.iter().map(|n| n.connected.len()).sum::<usize>() / 2
}

/// Number of nodes reachable from `start` through passages
pub fn reachable_from(nodes: &[Node], start: NodeId) -> usize {
    if start >= nodes.len() {
        return 0;
    }
    let mut seen = vec![false; nodes.len()];
    let mut stack = vec![start];
    seen[start] = true;
    let mut count = 0;
    while let Some(id) = stack.pop() {
        count += 1;
        for &next in &nodes[id].connected {
            if !seen[next] {
                seen[next] = true;
                stack.push(next);
            }
        }
    }
    count
}
