//! Physics world seam
//!
//! The rigid-body engine is an external collaborator. This module defines the
//! surface the maze and session code consume (`PhysicsEngine`), the entity
//! model handed to it, and `SandboxWorld`, a small deterministic engine used
//! by tests and the headless binary.

pub mod collision;
pub mod entity;
pub mod sandbox;

pub use collision::{CollisionEvent, Reaction, dispatch_contact, touch_good_blocks};
pub use entity::{Entity, EntityId, EntityKind, EvilBlock, GoodBlock, Queen, Transform, Worm};
pub use sandbox::SandboxWorld;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }

    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(self.min - Vec2::splat(margin), self.max + Vec2::splat(margin))
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Uniform random point inside the box
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            self.min.x + rng.random::<f32>() * self.width(),
            self.min.y + rng.random::<f32>() * self.height(),
        )
    }

    /// The box shifted by its own size along the axes and diagonals
    pub fn surrounding(&self) -> [BoundingBox; 8] {
        let v = Vec2::new(0.0, self.height());
        let h = Vec2::new(self.width(), 0.0);
        let da = Vec2::new(self.width(), self.height());
        let db = Vec2::new(self.width(), -self.height());
        [
            self.translated(v),
            self.translated(-v),
            self.translated(h),
            self.translated(-h),
            self.translated(da),
            self.translated(-da),
            self.translated(db),
            self.translated(-db),
        ]
    }
}

/// Surface the game consumes from a physics engine
pub trait PhysicsEngine {
    /// Remove every entity and pending collision
    fn clear(&mut self);

    fn set_world_box(&mut self, world_box: BoundingBox);
    fn world_box(&self) -> BoundingBox;

    /// Register an entity; the engine assigns its id
    fn add_entity(&mut self, entity: Entity) -> EntityId;

    fn entities(&self) -> &[Entity];
    fn entities_mut(&mut self) -> &mut [Entity];

    /// Merge wall geometry for broad-phase efficiency
    fn consolidate_walls(&mut self);

    /// Advance the simulation, returning the time actually simulated
    fn tick(&mut self, dt: f32) -> f32;

    fn gravity(&self) -> Vec2;
    fn set_gravity(&mut self, gravity: Vec2);

    /// Take all queued collision events, oldest first
    fn drain_collisions(&mut self) -> Vec<CollisionEvent>;

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities().iter().find(|e| e.id == id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities_mut().iter_mut().find(|e| e.id == id)
    }

    fn good_block_count(&self) -> usize {
        self.entities().iter().filter_map(Entity::good_block).count()
    }

    fn touched_good_block_count(&self) -> usize {
        self.entities()
            .iter()
            .filter_map(Entity::good_block)
            .filter(|b| b.touched)
            .count()
    }

    fn find_queen(&self) -> Option<&Queen> {
        self.entities().iter().find_map(Entity::queen)
    }

    fn queen_dead_or_absent(&self) -> bool {
        self.find_queen().is_none_or(|q| !q.alive)
    }

    /// Every good block touched and no living queen
    fn is_maze_solved(&self) -> bool {
        self.good_block_count() == self.touched_good_block_count() && self.queen_dead_or_absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_surrounding_boxes_exclude_center() {
        let b = BoundingBox::new(Vec2::new(-20.0, -20.0), Vec2::new(140.0, 220.0));
        for outer in b.surrounding() {
            assert_eq!(outer.width(), b.width());
            assert!(!outer.contains(b.center()));
        }
    }

    #[test]
    fn test_random_point_inside() {
        let b = BoundingBox::new(Vec2::ZERO, Vec2::new(10.0, 5.0));
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            assert!(b.contains(b.random_point(&mut rng)));
        }
    }
}
