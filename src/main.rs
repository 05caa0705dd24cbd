//! Gravity Maze headless runner
//!
//! Plays the session against the sandbox engine with a scripted player that
//! rolls into one untouched block at a time. Useful for checking level
//! progression and save files without a device.
//!
//! ```text
//! gravity-maze [--progress <path>] [--options <path>] [--levels <n>] [--seed <n>]
//! ```

use std::path::PathBuf;

use clap::Parser;
use gravity_maze::persistence::JsonFileStore;
use gravity_maze::renderer::Recorder;
use gravity_maze::world::{EntityId, PhysicsEngine};
use gravity_maze::{Options, SandboxWorld, Session, SessionPhase};

const FRAME: f32 = 1.0 / 60.0;
/// Frames between scripted touches
const TOUCH_INTERVAL: u32 = 15;
const MAX_FRAMES: u32 = 1_000_000;

/// Play Gravity Maze headless with a scripted player
#[derive(Debug, Parser)]
#[command(name = "gravity-maze", version, about)]
struct Args {
    /// Progress save file
    #[arg(long, default_value = JsonFileStore::DEFAULT_FILE)]
    progress: PathBuf,
    /// Options file (gravity, bounce, animation rate)
    #[arg(long, default_value = Options::FILE_NAME)]
    options: PathBuf,
    /// Levels to solve before stopping
    #[arg(long, default_value_t = 3)]
    levels: u32,
    /// Seed for the engine and fly-in animation
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Next good block the ball has not touched yet
fn next_target(world: &SandboxWorld) -> Option<EntityId> {
    world
        .entities()
        .iter()
        .find(|e| e.good_block().is_some_and(|b| !b.touched))
        .map(|e| e.id)
}

fn find_ball(world: &SandboxWorld) -> Option<EntityId> {
    world.entities().iter().find(|e| e.is_ball()).map(|e| e.id)
}

fn living_queen(world: &SandboxWorld) -> Option<EntityId> {
    world
        .entities()
        .iter()
        .find(|e| e.queen().is_some_and(|q| q.alive))
        .map(|e| e.id)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let options = Options::load(&args.options);
    let store = JsonFileStore::new(&args.progress);
    let mut session = Session::new(SandboxWorld::new(args.seed), store, options, args.seed);
    session.set_surface(1080, 1920);
    log::info!("Gravity Maze (headless) starting, {} levels", args.levels);

    let mut recorder = Recorder::default();
    let mut solved = 0;
    let mut frame = 0;
    while solved < args.levels && frame < MAX_FRAMES {
        let before = session.phase();
        let after = session.tick(FRAME);
        if before == SessionPhase::PlayGame && after == SessionPhase::FlyMazeOut {
            solved += 1;
        }
        if after == SessionPhase::GameWon {
            break;
        }

        if after == SessionPhase::PlayGame && frame % TOUCH_INTERVAL == 0 {
            let world = session.engine_mut();
            if let Some(ball) = find_ball(world) {
                match next_target(world).or_else(|| living_queen(world)) {
                    Some(target) => {
                        world.report_collision(ball, target);
                    }
                    None => log::debug!("Nothing left to touch"),
                }
            }
        }

        recorder.clear();
        session.render(&mut recorder);
        frame += 1;
    }
    session.suspend();

    let progress = session.progress();
    println!(
        "Solved {} levels in {} frames; now at level {} ({} touched) -> {}",
        solved,
        frame,
        progress.level,
        progress.touches,
        args.progress.display()
    );
    if session.phase() == SessionPhase::GameWon {
        println!("YOU WIN!!!");
    }
}
