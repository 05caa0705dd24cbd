//! Rectangular grid graph
//!
//! Nodes live in a flat arena addressed by `NodeId` (row-major), so adjacency
//! and passage lists are plain index lists.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::MazeError;

/// Index of a node in the maze arena
pub type NodeId = usize;

/// One maze cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub row: usize,
    pub col: usize,
    /// Cell center in world units
    pub center: Vec2,
    /// Up to four grid neighbors (up, down, left, right)
    pub adjacent: Vec<NodeId>,
    /// Neighbors reachable through an open passage (symmetric)
    pub connected: Vec<NodeId>,
    /// Carve-time: node sits on the frontier
    #[serde(skip)]
    pub queued: bool,
    /// Carve-time: node joined the growing tree (never unset)
    #[serde(skip)]
    pub integrated: bool,
}

impl Node {
    fn new(row: usize, col: usize, cell_size: f32) -> Self {
        Self {
            row,
            col,
            center: cell_center(row, col, cell_size),
            adjacent: Vec::with_capacity(4),
            connected: Vec::new(),
            queued: false,
            integrated: false,
        }
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.connected.contains(&other)
    }
}

/// Center of cell `(row, col)`
#[inline]
pub fn cell_center(row: usize, col: usize, cell_size: f32) -> Vec2 {
    Vec2::new(
        col as f32 * cell_size + cell_size / 2.0,
        row as f32 * cell_size + cell_size / 2.0,
    )
}

/// Build a `rows × cols` grid with 4-neighbor adjacency
pub fn build_grid(rows: usize, cols: usize, cell_size: f32) -> Result<Vec<Node>, MazeError> {
    if rows == 0 || cols == 0 {
        return Err(MazeError::DegenerateGrid { rows, cols });
    }

    let id = |row: usize, col: usize| row * cols + col;
    let mut nodes = Vec::with_capacity(rows * cols);

    for row in 0..rows {
        for col in 0..cols {
            let mut node = Node::new(row, col, cell_size);
            if row > 0 {
                node.adjacent.push(id(row - 1, col));
            }
            if row + 1 < rows {
                node.adjacent.push(id(row + 1, col));
            }
            if col > 0 {
                node.adjacent.push(id(row, col - 1));
            }
            if col + 1 < cols {
                node.adjacent.push(id(row, col + 1));
            }
            nodes.push(node);
        }
    }

    Ok(nodes)
}

/// Number of undirected grid edges in a `rows × cols` grid
pub fn grid_edge_count(rows: usize, cols: usize) -> usize {
    rows * cols.saturating_sub(1) + cols * rows.saturating_sub(1)
}
