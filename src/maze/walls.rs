//! Wall synthesis: every blocked grid edge becomes one wall segment

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Maze;
use crate::{approx_eq, perpendicular};

/// Tolerance for treating two wall endpoints as the same point
pub const WALL_EPSILON: f32 = 1e-3;

/// A line segment in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub a: Vec2,
    pub b: Vec2,
}

impl LineSegment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    pub fn length(&self) -> f32 {
        (self.b - self.a).length()
    }

    /// Same endpoints, in either order
    pub fn same_geometry_as(&self, other: &LineSegment) -> bool {
        (approx_eq(self.a, other.a, WALL_EPSILON) && approx_eq(self.b, other.b, WALL_EPSILON))
            || (approx_eq(self.a, other.b, WALL_EPSILON) && approx_eq(self.b, other.a, WALL_EPSILON))
    }

    /// Unit direction from `a` to `b`
    pub fn direction(&self) -> Vec2 {
        (self.b - self.a).normalize_or_zero()
    }
}

/// Wall separating two adjacent cell centers
pub fn wall_between(center: Vec2, neighbor: Vec2, cell_size: f32) -> LineSegment {
    let mid = (center + neighbor) * 0.5;
    let tangent = perpendicular((neighbor - center).normalize_or_zero());
    let half = tangent * (cell_size / 2.0);
    LineSegment::new(mid + half, mid - half)
}

/// The four walls enclosing `(0,0)–(width,height)`
pub fn boundary_walls(width: f32, height: f32) -> [LineSegment; 4] {
    [
        LineSegment::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, height)),
        LineSegment::new(Vec2::new(width, 0.0), Vec2::new(width, height)),
        LineSegment::new(Vec2::new(0.0, 0.0), Vec2::new(width, 0.0)),
        LineSegment::new(Vec2::new(0.0, height), Vec2::new(width, height)),
    ]
}

/// Internal walls (deduplicated) followed by the four boundary walls
pub fn synthesize_walls(maze: &Maze) -> Vec<LineSegment> {
    let cell_size = maze.cell_size();
    let mut walls: Vec<LineSegment> = Vec::new();

    for node in maze.nodes() {
        for &other in &node.adjacent {
            if node.is_connected_to(other) {
                continue;
            }
            let wall = wall_between(node.center, maze.nodes()[other].center, cell_size);
            if walls.iter().any(|w| w.same_geometry_as(&wall)) {
                continue;
            }
            walls.push(wall);
        }
    }

    let (width, height) = maze.extent();
    walls.extend(boundary_walls(width, height));
    walls
}
