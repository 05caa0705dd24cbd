//! Minimal deterministic physics engine
//!
//! Integrates gravity and velocity, keeps bodies inside the world box and
//! queues the contacts it is told about. No contact solving: collisions are
//! reported from outside via `report_collision`.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{self, CollisionEvent, Reaction};
use super::entity::{Entity, EntityId, EntityKind};
use super::{BoundingBox, PhysicsEngine};
use crate::consts::{WORM_MAX_SPEED, WORM_MIN_SPEED};
use crate::maze::LineSegment;
use crate::maze::walls::WALL_EPSILON;

/// Largest step a single tick will simulate
pub const MAX_STEP: f32 = 1.0 / 30.0;

#[derive(Debug, Clone)]
pub struct SandboxWorld {
    entities: Vec<Entity>,
    world_box: BoundingBox,
    gravity: Vec2,
    collisions: Vec<CollisionEvent>,
    next_id: u32,
    rng: Pcg32,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SandboxWorld {
    /// `seed` drives the engine's own randomness (worm speed changes)
    pub fn new(seed: u64) -> Self {
        Self {
            entities: Vec::new(),
            world_box: BoundingBox::default(),
            gravity: Vec2::ZERO,
            collisions: Vec::new(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Report a contact: runs both entities' callbacks now and queues the
    /// event if either participant asked for collision reports.
    pub fn report_collision(&mut self, a: EntityId, b: EntityId) -> Vec<Reaction> {
        let event = CollisionEvent::new(a, b);
        let reactions = collision::dispatch_contact(&mut self.entities, event, &self.collisions);

        let reports = |id: EntityId| {
            self.entities
                .iter()
                .any(|e| e.id == id && e.reports_collisions)
        };
        if reports(a) || reports(b) {
            self.collisions.push(event);
        }
        reactions
    }

    pub fn pending_collisions(&self) -> usize {
        self.collisions.len()
    }

    pub fn wall_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_wall()).count()
    }

    fn keep_worm_moving(rng: &mut Pcg32, velocity: Vec2) -> Vec2 {
        if velocity.length() >= WORM_MIN_SPEED {
            return velocity;
        }
        let dir = match velocity.try_normalize() {
            Some(d) => d,
            None => Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU)),
        };
        dir * rng.random_range(WORM_MIN_SPEED..=WORM_MAX_SPEED)
    }

    fn contain(&self, entity: &mut Entity) {
        let b = self.world_box;
        if b.width() <= 0.0 || b.height() <= 0.0 {
            return;
        }
        let bounce = entity.restitution;
        let lo = b.min + Vec2::splat(entity.radius);
        let hi = b.max - Vec2::splat(entity.radius);
        for axis in 0..2 {
            if entity.position[axis] < lo[axis] {
                entity.position[axis] = lo[axis];
                entity.velocity[axis] = entity.velocity[axis].abs() * bounce;
            } else if entity.position[axis] > hi[axis] {
                entity.position[axis] = hi[axis];
                entity.velocity[axis] = -entity.velocity[axis].abs() * bounce;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WallFate {
    Keep,
    Replace(LineSegment),
    /// Merged into an earlier wall on the same line
    Absorbed,
}

/// A wall projected onto its line
#[derive(Debug, Clone, Copy)]
struct LinePiece {
    index: usize,
    lo: f32,
    hi: f32,
    start: Vec2,
    end: Vec2,
}

/// Quantized (direction, offset) of an infinite line
type LineKey = (i64, i64, i64);

fn quantize(v: f32) -> i64 {
    (v / WALL_EPSILON).round() as i64
}

/// Group walls by the line they lie on
fn wall_lines(entities: &[Entity]) -> BTreeMap<LineKey, Vec<LinePiece>> {
    let mut lines: BTreeMap<LineKey, Vec<LinePiece>> = BTreeMap::new();
    for (index, entity) in entities.iter().enumerate() {
        let EntityKind::Wall(seg) = &entity.kind else {
            continue;
        };
        let mut dir = seg.direction();
        if dir == Vec2::ZERO {
            continue;
        }
        // One direction per line regardless of endpoint order
        if dir.x < -WALL_EPSILON || (dir.x.abs() <= WALL_EPSILON && dir.y < 0.0) {
            dir = -dir;
        }
        let offset = dir.perp_dot(seg.a);
        let (ta, tb) = (dir.dot(seg.a), dir.dot(seg.b));
        let piece = if ta <= tb {
            LinePiece { index, lo: ta, hi: tb, start: seg.a, end: seg.b }
        } else {
            LinePiece { index, lo: tb, hi: ta, start: seg.b, end: seg.a }
        };
        lines
            .entry((quantize(dir.x), quantize(dir.y), quantize(offset)))
            .or_default()
            .push(piece);
    }
    lines
}

/// Sweep one line's walls in order, joining runs that touch or overlap.
/// The earliest wall of a run takes the merged segment.
fn merge_line(mut pieces: Vec<LinePiece>, fates: &mut [WallFate]) {
    pieces.sort_by(|a, b| a.lo.total_cmp(&b.lo).then(a.index.cmp(&b.index)));
    // Each run keeps its pieces and the piece reaching furthest along the line
    let mut runs: Vec<(Vec<LinePiece>, LinePiece)> = Vec::new();
    for piece in pieces {
        let extends = runs
            .last()
            .is_some_and(|(_, far)| piece.lo <= far.hi + WALL_EPSILON);
        match runs.last_mut() {
            Some((run, far)) if extends => {
                if piece.hi > far.hi {
                    *far = piece;
                }
                run.push(piece);
            }
            _ => runs.push((vec![piece], piece)),
        }
    }

    for (run, far) in runs.into_iter().filter(|(run, _)| run.len() > 1) {
        let first = run[0];
        let leader = run.iter().map(|p| p.index).min().unwrap_or(first.index);
        for p in &run {
            fates[p.index] = WallFate::Absorbed;
        }
        fates[leader] = WallFate::Replace(LineSegment::new(first.start, far.end));
    }
}

impl PhysicsEngine for SandboxWorld {
    fn clear(&mut self) {
        self.entities.clear();
        self.collisions.clear();
    }

    fn set_world_box(&mut self, world_box: BoundingBox) {
        self.world_box = world_box;
    }

    fn world_box(&self) -> BoundingBox {
        self.world_box
    }

    fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    fn consolidate_walls(&mut self) {
        let before = self.wall_count();
        let mut fates = vec![WallFate::Keep; self.entities.len()];
        for pieces in wall_lines(&self.entities).into_values() {
            merge_line(pieces, &mut fates);
        }

        let entities = std::mem::take(&mut self.entities);
        self.entities = entities
            .into_iter()
            .zip(fates)
            .filter_map(|(entity, fate)| match fate {
                WallFate::Keep => Some(entity),
                WallFate::Replace(seg) => {
                    let mut wall = Entity::wall(seg);
                    wall.id = entity.id;
                    Some(wall)
                }
                WallFate::Absorbed => None,
            })
            .collect();
        log::debug!("Consolidated {} walls into {}", before, self.wall_count());
    }

    fn tick(&mut self, dt: f32) -> f32 {
        let step = dt.clamp(0.0, MAX_STEP);
        let gravity = self.gravity;

        let mut entities = std::mem::take(&mut self.entities);
        for entity in entities.iter_mut().filter(|e| !e.is_wall()) {
            if entity.gravity_affected {
                entity.velocity += gravity * step;
            }
            match &mut entity.kind {
                EntityKind::Worm(worm) => {
                    worm.record(entity.position);
                    entity.velocity = Self::keep_worm_moving(&mut self.rng, entity.velocity);
                }
                EntityKind::Queen(queen) => queen.cycle_colors(),
                _ => {}
            }
            entity.position += entity.velocity * step;
            self.contain(entity);
        }
        self.entities = entities;
        step
    }

    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn drain_collisions(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.collisions)
    }
}
