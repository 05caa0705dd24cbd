//! Gravity Maze - tilt the device, roll the ball, touch every block
//!
//! Core modules:
//! - `maze`: Grid graph, spanning-tree carving, wall synthesis, world population
//! - `world`: Entity model, physics engine seam, collision dispatch, sandbox engine
//! - `session`: Level state machine (generate → fly in → play → fly out → win)
//! - `persistence`: Level progress load/save
//! - `platform`: Gravity sensor bridge
//! - `renderer`: Draw-target seam and per-entity render dispatch
//! - `settings`: Player options (gravity, bounce)

pub mod maze;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod world;

pub use maze::{Maze, MazeError};
pub use persistence::{Progress, ProgressError, ProgressStore};
pub use session::{Session, SessionEvent, SessionPhase, SessionState};
pub use settings::Options;
pub use world::{PhysicsEngine, SandboxWorld};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of one maze cell. Physics is tuned for this size, so the
    /// maze grows in cell count rather than cell size.
    pub const MAZE_CELL_SIZE: f32 = 40.0;

    /// Rows of the first level; each level adds one.
    pub const BASE_ROWS: u32 = 5;
    /// Level that hosts the queen
    pub const FINAL_LEVEL: u32 = 20;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;

    /// Blocks are polygons inscribed in a circle of this radius
    pub const BLOCK_RADIUS: f32 = 10.0;
    pub const GOOD_BLOCK_RESTITUTION: f32 = 0.5;

    /// Worm defaults
    pub const WORM_RADIUS: f32 = 5.0;
    pub const WORM_MIN_SPEED: f32 = 200.0;
    pub const WORM_MAX_SPEED: f32 = 250.0;
    /// Good blocks needed before a worm joins the maze
    pub const WORM_BLOCK_THRESHOLD: usize = 10;
    pub const WORM_TRAIL_LENGTH: usize = 32;

    /// Queen defaults
    pub const QUEEN_RADIUS: f32 = 15.0;
    pub const QUEEN_RINGS: usize = 32;

    /// Default fly-in/fly-out speed (alpha units per second)
    pub const ANIM_RATE: f32 = 1.0;

    /// Standard gravity, used to normalize the sensor's z component
    pub const EARTH_GRAVITY: f32 = 9.8;
}

/// Rotate `v` counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Left-hand perpendicular of `v`
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Approximate point equality used for geometric dedup
#[inline]
pub fn approx_eq(a: Vec2, b: Vec2, eps: f32) -> bool {
    (a - b).length_squared() <= eps * eps
}
