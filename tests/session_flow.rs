use std::fs;
use std::path::PathBuf;

use gravity_maze::persistence::{JsonFileStore, MemoryStore};
use gravity_maze::world::{EntityId, PhysicsEngine, SandboxWorld};
use gravity_maze::{Options, Progress, ProgressStore, Session, SessionPhase};

const FRAME: f32 = 1.0 / 30.0;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gravity-maze-it-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_until<S: ProgressStore>(session: &mut Session<SandboxWorld, S>, phase: SessionPhase) {
    for _ in 0..1_000 {
        if session.phase() == phase {
            return;
        }
        session.tick(FRAME);
    }
    panic!("stuck in {:?} waiting for {:?}", session.phase(), phase);
}

fn untouched_blocks(world: &SandboxWorld) -> Vec<EntityId> {
    world
        .entities()
        .iter()
        .filter(|e| e.good_block().is_some_and(|b| !b.touched))
        .map(|e| e.id)
        .collect()
}

fn ball(world: &SandboxWorld) -> EntityId {
    world.entities().iter().find(|e| e.is_ball()).unwrap().id
}

#[test]
fn level_resumes_after_restart() {
    let dir = scratch_dir("resume");
    fs::write(
        dir.join(JsonFileStore::DEFAULT_FILE),
        r#"{ "level": 2, "touches": 0, "seed_mod": 12345 }"#,
    )
    .unwrap();

    let first_layout = {
        let mut session = Session::new(
            SandboxWorld::new(1),
            JsonFileStore::in_dir(&dir),
            Options::default(),
            1,
        );
        session.set_surface(720, 1280);
        run_until(&mut session, SessionPhase::PlayGame);

        let world = session.engine_mut();
        let ball = ball(world);
        let targets = untouched_blocks(world);
        world.report_collision(ball, targets[0]);
        world.report_collision(ball, targets[1]);
        session.tick(FRAME);
        assert_eq!(session.engine().touched_good_block_count(), 2);

        session.surface_lost();
        session.maze().nodes().to_vec()
    };

    let saved: Progress = serde_json::from_str(
        &fs::read_to_string(dir.join(JsonFileStore::DEFAULT_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(
        saved,
        Progress {
            level: 2,
            touches: 2,
            seed_modifier: 12345
        }
    );

    let mut session = Session::new(
        SandboxWorld::new(2),
        JsonFileStore::in_dir(&dir),
        Options::default(),
        2,
    );
    session.set_surface(720, 1280);
    assert_eq!(session.tick(FRAME), SessionPhase::FlyMazeIn);
    assert_eq!(session.maze().nodes(), first_layout.as_slice());
    assert_eq!(session.engine().touched_good_block_count(), 2);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn scripted_player_climbs_levels() {
    let mut session = Session::new(
        SandboxWorld::new(0),
        MemoryStore::with(Progress::new(77)),
        Options::default(),
        0,
    );
    session.set_surface(1080, 1920);

    for level in 0..4 {
        run_until(&mut session, SessionPhase::PlayGame);
        assert_eq!(session.progress().level, level);
        assert_eq!(session.maze().rows(), level as usize + 5);

        let world = session.engine_mut();
        let ball = ball(world);
        for block in untouched_blocks(world) {
            world.report_collision(ball, block);
        }
        assert_eq!(session.tick(FRAME), SessionPhase::FlyMazeOut);
        assert_eq!(session.store().stored.unwrap().level, level + 1);
    }
}

#[test]
fn corrupt_progress_file_starts_over() {
    let dir = scratch_dir("corrupt");
    let path = dir.join(JsonFileStore::DEFAULT_FILE);
    fs::write(&path, "not json").unwrap();

    let mut session = Session::new(
        SandboxWorld::new(0),
        JsonFileStore::new(&path),
        Options::default(),
        0,
    );
    session.set_surface(1080, 1920);
    assert_eq!(session.tick(FRAME), SessionPhase::FlyMazeIn);
    assert_eq!(session.progress().level, 0);

    // The reset progress replaced the bad file
    let mut store = JsonFileStore::new(&path);
    assert_eq!(store.load().unwrap().level, 0);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn options_drive_gravity_and_bounce() {
    let options = Options {
        gravity: 150.0,
        bounce: 0.9,
        ..Default::default()
    };
    let mut session = Session::new(
        SandboxWorld::new(0),
        MemoryStore::with(Progress::new(5)),
        options,
        0,
    );
    session.set_surface(1080, 1920);
    session.tick(FRAME);
    assert_eq!(session.engine().gravity().y, -150.0);
    let world = session.engine();
    let ball = world.entity(ball(world)).unwrap();
    assert_eq!(ball.restitution, 0.9);
}
