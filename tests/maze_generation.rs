use std::collections::HashSet;

use gravity_maze::maze::populate::{evil_block_count, good_block_count};
use gravity_maze::maze::{
    Maze, PopulateParams, grid_edge_count, level_rng, passage_count, populate, reachable_from,
    synthesize_walls,
};
use gravity_maze::session::maze_dimensions;
use gravity_maze::world::{Entity, PhysicsEngine, SandboxWorld};

fn build_level(level: u32, aspect: f32, seed_modifier: i64) -> (Maze, SandboxWorld) {
    let (rows, cols) = maze_dimensions(level, aspect);
    let mut rng = level_rng(rows, cols, seed_modifier);
    let mut maze = Maze::new();
    maze.generate(rows, cols, &mut rng).unwrap();
    let mut world = SandboxWorld::new(0);
    let params = PopulateParams {
        include_boss: level == gravity_maze::consts::FINAL_LEVEL,
        ..Default::default()
    };
    populate(&mut world, &maze, params, &mut rng);
    (maze, world)
}

#[test]
fn five_by_three_level_is_reproducible() {
    let mut first = Maze::new();
    let mut second = Maze::new();
    first.generate(5, 3, &mut level_rng(5, 3, 42)).unwrap();
    second.generate(5, 3, &mut level_rng(5, 3, 42)).unwrap();

    assert_eq!(passage_count(first.nodes()), 14);
    assert_eq!(synthesize_walls(&first).len(), 12);
    assert_eq!(first.nodes(), second.nodes(), "carve diverged between runs");
}

#[test]
fn every_level_is_a_spanning_tree() {
    for level in 0..=20 {
        let (rows, cols) = maze_dimensions(level, 0.5625);
        let mut maze = Maze::new();
        maze.generate(rows, cols, &mut level_rng(rows, cols, 1_700_000_000))
            .unwrap();
        let n = rows * cols;
        assert_eq!(passage_count(maze.nodes()), n - 1, "level {}", level);
        assert_eq!(reachable_from(maze.nodes(), 0), n, "level {}", level);
        assert_eq!(
            synthesize_walls(&maze).len(),
            grid_edge_count(rows, cols) - (n - 1) + 4,
            "level {}",
            level
        );
    }
}

#[test]
fn populated_levels_replay_identically() {
    let (_, a) = build_level(4, 0.75, 99);
    let (_, b) = build_level(4, 0.75, 99);
    assert_eq!(a.entities(), b.entities());

    let (_, c) = build_level(4, 0.75, 100);
    assert_ne!(a.entities(), c.entities());
}

#[test]
fn final_level_has_every_entity_kind() {
    let (maze, world) = build_level(20, 0.6, 7);
    let kinds: HashSet<&str> = world.entities().iter().map(|e| e.kind.name()).collect();
    for kind in ["wall", "ball", "good-block", "evil-block", "worm", "queen"] {
        assert!(kinds.contains(kind), "missing {}", kind);
    }
    assert_eq!(world.good_block_count(), good_block_count(maze.cols()));
    let evil = world
        .entities()
        .iter()
        .filter(|e| e.kind.name() == "evil-block")
        .count();
    assert_eq!(evil, evil_block_count(maze.cols()));
}

#[test]
fn entities_start_in_distinct_cells() {
    let (maze, world) = build_level(10, 0.6, 3);
    let cells: Vec<(i32, i32)> = world
        .entities()
        .iter()
        .filter(|e| !e.is_wall())
        .map(|e: &Entity| {
            let cell = maze.cell_size();
            ((e.position.x / cell).floor() as i32, (e.position.y / cell).floor() as i32)
        })
        .collect();
    let unique: HashSet<_> = cells.iter().collect();
    assert_eq!(unique.len(), cells.len());
}
