//! Gameplay entities
//!
//! Every entity in the physics world is tagged with an `EntityKind`; kind
//! specific state lives in the variant so collision and render dispatch are
//! plain `match`es.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::maze::LineSegment;
use crate::renderer::palette::{self, Color};
use crate::rotate;

/// Stable handle to an entity registered with a physics engine
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

/// Translation / rotation / scale applied about an entity's own position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    /// Component-wise lerp. `alpha` is clamped to [0, 1].
    pub fn interpolate(from: &Transform, to: &Transform, alpha: f32) -> Transform {
        let t = alpha.clamp(0.0, 1.0);
        Transform {
            translation: from.translation.lerp(to.translation, t),
            rotation: from.rotation + (to.rotation - from.rotation) * t,
            scale: from.scale + (to.scale - from.scale) * t,
        }
    }

    /// Map `point` with `pivot` as the origin of rotation and scale
    pub fn apply(&self, pivot: Vec2, point: Vec2) -> Vec2 {
        pivot + rotate((point - pivot) * self.scale, self.rotation) + self.translation
    }
}

/// Collectible block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodBlock {
    /// Convex polygon, local to the entity position
    pub shape: Vec<Vec2>,
    pub touched: bool,
}

/// Hazard block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvilBlock {
    pub shape: Vec<Vec2>,
}

/// Roaming hazard with a fading trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worm {
    /// Past positions, oldest first
    trail: VecDeque<Vec2>,
    capacity: usize,
}

impl Default for Worm {
    fn default() -> Self {
        Self::with_capacity(WORM_TRAIL_LENGTH)
    }
}

impl Worm {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            trail: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a position, evicting the oldest beyond capacity
    pub fn record(&mut self, pos: Vec2) {
        self.trail.push_back(pos);
        while self.trail.len() > self.capacity {
            self.trail.pop_front();
        }
    }

    pub fn trail(&self) -> impl ExactSizeIterator<Item = &Vec2> {
        self.trail.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

/// Final-level boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Queen {
    pub color_ramp: Vec<Color>,
    pub color_ramp_offset: usize,
    pub alive: bool,
    /// Set the first time the queen brushes an evil block
    pub added_blocks: bool,
}

impl Default for Queen {
    fn default() -> Self {
        Self {
            color_ramp: palette::queen_ramp(QUEEN_RINGS),
            color_ramp_offset: 0,
            alive: true,
            added_blocks: false,
        }
    }
}

impl Queen {
    pub fn rings(&self) -> usize {
        self.color_ramp.len()
    }

    /// Rotate the ring colors by one step
    pub fn cycle_colors(&mut self) {
        if !self.color_ramp.is_empty() {
            self.color_ramp_offset = (self.color_ramp_offset + 1) % self.color_ramp.len();
        }
    }

    pub fn ring_color(&self, ring: usize) -> Color {
        match self.color_ramp.len() {
            0 => palette::BALL,
            n => self.color_ramp[(ring + self.color_ramp_offset) % n],
        }
    }
}

/// Entity kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Wall(LineSegment),
    Ball,
    GoodBlock(GoodBlock),
    EvilBlock(EvilBlock),
    Worm(Worm),
    Queen(Queen),
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Wall(_) => "wall",
            EntityKind::Ball => "ball",
            EntityKind::GoodBlock(_) => "good-block",
            EntityKind::EvilBlock(_) => "evil-block",
            EntityKind::Worm(_) => "worm",
            EntityKind::Queen(_) => "queen",
        }
    }
}

/// An entity in the physics world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Assigned by the engine on registration
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Bounding radius
    pub radius: f32,
    pub restitution: f32,
    pub gravity_affected: bool,
    pub reports_collisions: bool,
    pub color: Color,
    /// Fly-in/fly-out animation endpoints
    pub source_transform: Transform,
    pub target_transform: Transform,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec2) -> Self {
        let (radius, color) = match &kind {
            EntityKind::Wall(seg) => (seg.length() / 2.0, palette::WALL),
            EntityKind::Ball => (BALL_RADIUS, palette::BALL),
            EntityKind::GoodBlock(b) if b.touched => (BLOCK_RADIUS, palette::GOOD_BLOCK_TOUCHED),
            EntityKind::GoodBlock(_) => (BLOCK_RADIUS, palette::GOOD_BLOCK),
            EntityKind::EvilBlock(_) => (BLOCK_RADIUS, palette::EVIL_BLOCK),
            EntityKind::Worm(_) => (WORM_RADIUS, palette::WORM),
            EntityKind::Queen(_) => (QUEEN_RADIUS, palette::BALL),
        };
        Self {
            id: EntityId::default(),
            kind,
            position,
            velocity: Vec2::ZERO,
            radius,
            restitution: 1.0,
            gravity_affected: false,
            reports_collisions: false,
            color,
            source_transform: Transform::IDENTITY,
            target_transform: Transform::IDENTITY,
        }
    }

    /// Wall entity positioned at the segment midpoint
    pub fn wall(seg: LineSegment) -> Self {
        Self::new(EntityKind::Wall(seg), seg.midpoint())
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_gravity(mut self, on: bool) -> Self {
        self.gravity_affected = on;
        self
    }

    pub fn with_collisions(mut self, on: bool) -> Self {
        self.reports_collisions = on;
        self
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.kind, EntityKind::Wall(_))
    }

    pub fn is_ball(&self) -> bool {
        matches!(self.kind, EntityKind::Ball)
    }

    pub fn good_block(&self) -> Option<&GoodBlock> {
        match &self.kind {
            EntityKind::GoodBlock(b) => Some(b),
            _ => None,
        }
    }

    pub fn queen(&self) -> Option<&Queen> {
        match &self.kind {
            EntityKind::Queen(q) => Some(q),
            _ => None,
        }
    }

    pub fn queen_mut(&mut self) -> Option<&mut Queen> {
        match &mut self.kind {
            EntityKind::Queen(q) => Some(q),
            _ => None,
        }
    }

    /// Set a good block's touched flag and recolor it.
    /// Returns true if the flag changed; no-op for other kinds.
    pub fn set_touched(&mut self, touched: bool) -> bool {
        let EntityKind::GoodBlock(block) = &mut self.kind else {
            return false;
        };
        if block.touched == touched {
            return false;
        }
        block.touched = touched;
        self.color = if touched {
            palette::GOOD_BLOCK_TOUCHED
        } else {
            palette::GOOD_BLOCK
        };
        true
    }

    /// Polygon in world space (blocks only)
    pub fn world_shape(&self) -> Option<Vec<Vec2>> {
        let shape = match &self.kind {
            EntityKind::GoodBlock(b) => &b.shape,
            EntityKind::EvilBlock(b) => &b.shape,
            _ => return None,
        };
        Some(shape.iter().map(|&v| v + self.position).collect())
    }

    /// Transform to render with at the given animation progress
    pub fn render_transform(&self, alpha: f32) -> Transform {
        Transform::interpolate(&self.source_transform, &self.target_transform, alpha)
    }

    /// Move the entity (walls carry their segment along)
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        if let EntityKind::Wall(seg) = &mut self.kind {
            seg.a += delta;
            seg.b += delta;
        }
    }
}
