//! Fill a physics world with a maze level
//!
//! Walls first, then the ball at cell 0, then every other entity in its own
//! randomly chosen cell.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use std::f32::consts::TAU;

use super::grid::NodeId;
use super::walls::synthesize_walls;
use super::Maze;
use crate::consts::*;
use crate::world::{
    BoundingBox, Entity, EntityId, EntityKind, EvilBlock, GoodBlock, PhysicsEngine, Queen, Worm,
};

/// Per-level population inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulateParams {
    /// Good blocks already touched in a previous session of this level
    pub touched_count: usize,
    pub include_boss: bool,
    /// Ball restitution
    pub bounce: f32,
}

impl Default for PopulateParams {
    fn default() -> Self {
        Self {
            touched_count: 0,
            include_boss: false,
            bounce: 0.5,
        }
    }
}

/// What was spawned, and where
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    pub walls: usize,
    pub ball: Option<EntityId>,
    pub good_blocks: Vec<(EntityId, NodeId)>,
    pub evil_blocks: Vec<(EntityId, NodeId)>,
    pub worm: Option<(EntityId, NodeId)>,
    pub queen: Option<(EntityId, NodeId)>,
}

impl Population {
    /// Every occupied cell, ball first
    pub fn slots(&self) -> Vec<NodeId> {
        let mut slots = Vec::new();
        if self.ball.is_some() {
            slots.push(0);
        }
        slots.extend(self.good_blocks.iter().map(|&(_, s)| s));
        slots.extend(self.evil_blocks.iter().map(|&(_, s)| s));
        slots.extend(self.worm.iter().map(|&(_, s)| s));
        slots.extend(self.queen.iter().map(|&(_, s)| s));
        slots
    }
}

/// Good blocks in a maze with `cols` columns
pub fn good_block_count(cols: usize) -> usize {
    cols.saturating_sub(1)
}

/// Evil blocks in a maze with `cols` columns
pub fn evil_block_count(cols: usize) -> usize {
    good_block_count(cols) / 4
}

/// Node extents plus half a cell of margin
pub fn world_box_for(maze: &Maze) -> BoundingBox {
    let half = maze.cell_size() / 2.0;
    let (min, max) = maze.nodes().iter().fold(
        (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        |(min, max), n| {
            (
                min.min(n.center - Vec2::splat(half)),
                max.max(n.center + Vec2::splat(half)),
            )
        },
    );
    BoundingBox::new(min, max).expanded(half)
}

/// Convex polygon with 3-5 vertices on a circle, counter-clockwise
pub fn random_convex_polygon<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec<Vec2> {
    let count = rng.random_range(3..=5);
    let mut angles: Vec<f32> = (0..count).map(|_| rng.random_range(0.0..TAU)).collect();
    angles.sort_by(f32::total_cmp);
    angles
        .into_iter()
        .map(|a| Vec2::from_angle(a) * radius)
        .collect()
}

fn evil_quad(radius: f32) -> Vec<Vec2> {
    let h = radius / std::f32::consts::SQRT_2;
    vec![
        Vec2::new(-h, -h),
        Vec2::new(h, -h),
        Vec2::new(h, h),
        Vec2::new(-h, h),
    ]
}

/// Clear the engine and spawn walls and entities for `maze`
pub fn populate<E, R>(engine: &mut E, maze: &Maze, params: PopulateParams, rng: &mut R) -> Population
where
    E: PhysicsEngine + ?Sized,
    R: Rng + ?Sized,
{
    let mut population = Population::default();
    engine.clear();
    if maze.is_empty() {
        log::warn!("Populating from an empty maze; world left clear");
        return population;
    }
    engine.set_world_box(world_box_for(maze));

    for wall in synthesize_walls(maze) {
        engine.add_entity(Entity::wall(wall));
        population.walls += 1;
    }

    let nodes = maze.nodes();
    population.ball = Some(
        engine.add_entity(
            Entity::new(EntityKind::Ball, nodes[0].center)
                .with_radius(BALL_RADIUS)
                .with_restitution(params.bounce)
                .with_gravity(true)
                .with_collisions(true),
        ),
    );

    let mut slots: Vec<NodeId> = (1..nodes.len()).collect();
    slots.shuffle(rng);
    let mut slots = slots.into_iter();
    let mut next_slot = |what: &str| {
        let slot = slots.next();
        if slot.is_none() {
            log::warn!("Maze too small: no free cell for {}", what);
        }
        slot
    };

    for i in 0..good_block_count(maze.cols()) {
        let Some(slot) = next_slot("good block") else {
            break;
        };
        let block = GoodBlock {
            shape: random_convex_polygon(rng, BLOCK_RADIUS),
            touched: i < params.touched_count,
        };
        let id = engine.add_entity(
            Entity::new(EntityKind::GoodBlock(block), nodes[slot].center)
                .with_restitution(GOOD_BLOCK_RESTITUTION)
                .with_gravity(true)
                .with_collisions(true),
        );
        population.good_blocks.push((id, slot));
    }

    for _ in 0..evil_block_count(maze.cols()) {
        let Some(slot) = next_slot("evil block") else {
            break;
        };
        let block = EvilBlock {
            shape: evil_quad(BLOCK_RADIUS),
        };
        let id = engine.add_entity(
            Entity::new(EntityKind::EvilBlock(block), nodes[slot].center)
                .with_gravity(true)
                .with_collisions(true),
        );
        population.evil_blocks.push((id, slot));
    }

    if good_block_count(maze.cols()) > WORM_BLOCK_THRESHOLD {
        if let Some(slot) = next_slot("worm") {
            let speed = rng.random_range(WORM_MIN_SPEED..=WORM_MAX_SPEED);
            let heading = Vec2::from_angle(rng.random_range(0.0..TAU));
            let id = engine.add_entity(
                Entity::new(EntityKind::Worm(Worm::default()), nodes[slot].center)
                    .with_velocity(heading * speed)
                    .with_collisions(true),
            );
            population.worm = Some((id, slot));
        }
    }

    if params.include_boss {
        if let Some(slot) = next_slot("queen") {
            let id = engine.add_entity(
                Entity::new(EntityKind::Queen(Queen::default()), nodes[slot].center)
                    .with_gravity(true)
                    .with_collisions(true),
            );
            population.queen = Some((id, slot));
        }
    }

    engine.consolidate_walls();

    log::info!(
        "Populated {}x{} maze: {} walls, {} good ({} touched), {} evil, worm: {}, queen: {}",
        maze.rows(),
        maze.cols(),
        population.walls,
        population.good_blocks.len(),
        params.touched_count.min(population.good_blocks.len()),
        population.evil_blocks.len(),
        population.worm.is_some(),
        population.queen.is_some()
    );
    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SandboxWorld;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn level(rows: usize, cols: usize, params: PopulateParams) -> (SandboxWorld, Population) {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut maze = Maze::new();
        maze.generate(rows, cols, &mut rng).unwrap();
        let mut world = SandboxWorld::new(0);
        let pop = populate(&mut world, &maze, params, &mut rng);
        (world, pop)
    }

    #[test]
    fn test_entity_counts_follow_columns() {
        let (world, pop) = level(6, 9, PopulateParams::default());
        assert_eq!(pop.good_blocks.len(), 8);
        assert_eq!(pop.evil_blocks.len(), 2);
        assert!(pop.worm.is_none());
        assert!(pop.queen.is_none());
        assert_eq!(world.good_block_count(), 8);
    }

    #[test]
    fn test_worm_and_queen_on_wide_final_level() {
        let params = PopulateParams {
            include_boss: true,
            ..Default::default()
        };
        let (world, pop) = level(8, 13, params);
        assert_eq!(pop.good_blocks.len(), 12);
        assert_eq!(pop.evil_blocks.len(), 3);
        let (worm, _) = pop.worm.unwrap();
        let speed = world.entity(worm).unwrap().velocity.length();
        assert!((WORM_MIN_SPEED..=WORM_MAX_SPEED + 0.01).contains(&speed));
        assert!(!world.entity(worm).unwrap().gravity_affected);
        assert!(world.find_queen().is_some_and(|q| q.alive));
    }

    #[test]
    fn test_no_two_entities_share_a_cell() {
        let params = PopulateParams {
            include_boss: true,
            ..Default::default()
        };
        let (_, pop) = level(5, 14, params);
        let slots = pop.slots();
        let unique: HashSet<_> = slots.iter().collect();
        assert_eq!(unique.len(), slots.len());
        assert_eq!(slots[0], 0);
    }

    #[test]
    fn test_touched_count_preseeds_blocks() {
        let params = PopulateParams {
            touched_count: 3,
            ..Default::default()
        };
        let (world, pop) = level(5, 7, params);
        assert_eq!(world.touched_good_block_count(), 3);
        let first = world.entity(pop.good_blocks[0].0).unwrap();
        assert!(first.good_block().unwrap().touched);
    }

    #[test]
    fn test_ball_spawns_at_first_cell() {
        let params = PopulateParams {
            bounce: 0.8,
            ..Default::default()
        };
        let (world, pop) = level(5, 5, params);
        let ball = world.entity(pop.ball.unwrap()).unwrap();
        assert_eq!(ball.position, Vec2::new(20.0, 20.0));
        assert_eq!(ball.restitution, 0.8);
        assert!(ball.gravity_affected && ball.reports_collisions);
    }

    #[test]
    fn test_world_box_has_margin() {
        let (world, _) = level(5, 3, PopulateParams::default());
        let b = world.world_box();
        assert_eq!(b.min, Vec2::new(-20.0, -20.0));
        assert_eq!(b.max, Vec2::new(140.0, 220.0));
    }

    #[test]
    fn test_tiny_maze_runs_out_of_slots() {
        let (_, pop) = level(1, 3, PopulateParams {
            include_boss: true,
            ..Default::default()
        });
        // Two free cells: both good blocks fit, nothing left for the queen
        assert_eq!(pop.good_blocks.len(), 2);
        assert!(pop.queen.is_none());
    }

    #[test]
    fn test_random_polygon_is_convex() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let poly = random_convex_polygon(&mut rng, BLOCK_RADIUS);
            assert!((3..=5).contains(&poly.len()));
            for i in 0..poly.len() {
                let a = poly[i];
                let b = poly[(i + 1) % poly.len()];
                let c = poly[(i + 2) % poly.len()];
                assert!((b - a).perp_dot(c - b) >= -1e-3);
                assert!((a.length() - BLOCK_RADIUS).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let (a, _) = level(6, 8, PopulateParams::default());
        let (b, _) = level(6, 8, PopulateParams::default());
        assert_eq!(a.entities(), b.entities());
    }
}
