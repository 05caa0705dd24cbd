//! Maze generation
//!
//! Everything here is deterministic given an explicit RNG:
//! - `grid`: node arena with 4-neighbor adjacency
//! - `carve`: randomized spanning tree (the passages)
//! - `walls`: blocked edges as deduplicated wall segments
//! - `populate`: walls and gameplay entities handed to a physics engine

pub mod carve;
pub mod grid;
pub mod populate;
pub mod walls;

pub use carve::{carve, level_rng, level_seed, passage_count, reachable_from};
pub use grid::{Node, NodeId, build_grid, grid_edge_count};
pub use populate::{PopulateParams, Population, populate};
pub use walls::{LineSegment, synthesize_walls};

use rand::Rng;
use thiserror::Error;

use crate::consts::MAZE_CELL_SIZE;

/// Maze construction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze must have at least one row and one column (got {rows}x{cols})")]
    DegenerateGrid { rows: usize, cols: usize },
}

/// A carved maze. Rebuilt once per level.
#[derive(Debug, Clone)]
pub struct Maze {
    rows: usize,
    cols: usize,
    cell_size: f32,
    nodes: Vec<Node>,
}

impl Default for Maze {
    fn default() -> Self {
        Self::new()
    }
}

impl Maze {
    pub fn new() -> Self {
        Self::with_cell_size(MAZE_CELL_SIZE)
    }

    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            rows: 0,
            cols: 0,
            cell_size,
            nodes: Vec::new(),
        }
    }

    /// Clear, build the grid and carve it. On error the maze is left empty.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<(), MazeError> {
        self.clear();

        let mut nodes = build_grid(rows, cols, self.cell_size)?;
        carve(&mut nodes, rng);

        self.rows = rows;
        self.cols = cols;
        self.nodes = nodes;
        log::debug!(
            "Carved {}x{} maze with {} passages",
            rows,
            cols,
            passage_count(&self.nodes)
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.rows = 0;
        self.cols = 0;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Width and height of the carved area
    pub fn extent(&self) -> (f32, f32) {
        (
            self.cols as f32 * self.cell_size,
            self.rows as f32 * self.cell_size,
        )
    }

    pub fn node_at(&self, row: usize, col: usize) -> Option<&Node> {
        if row < self.rows && col < self.cols {
            self.nodes.get(row * self.cols + col)
        } else {
            None
        }
    }
}
