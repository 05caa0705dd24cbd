//! Level session
//!
//! Drives one game from the first maze to the win screen. Each tick the
//! physics engine advances, the current state does its work and emits at
//! most one event, and a phase change runs the old state's leave hook before
//! the new state's enter hook.

pub mod state;

pub use state::{SessionEvent, SessionPhase, SessionState, Transition};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use crate::consts::{BASE_ROWS, FINAL_LEVEL};
use crate::maze::{Maze, MazeError, PopulateParams, Population, level_rng, populate};
use crate::persistence::{Progress, ProgressStore};
use crate::platform::SharedGravity;
use crate::renderer::{self, DrawHelper};
use crate::settings::Options;
use crate::world::{PhysicsEngine, Transform, touch_good_blocks};

/// Maze size for `level` on a surface with the given width/height ratio
pub fn maze_dimensions(level: u32, aspect: f32) -> (usize, usize) {
    let rows = (BASE_ROWS + level) as usize;
    let cols = (rows as f32 * aspect).round().max(1.0) as usize;
    (rows, cols)
}

pub struct Session<E: PhysicsEngine, S: ProgressStore> {
    engine: E,
    store: S,
    options: Options,
    maze: Maze,
    state: SessionState,
    progress: Progress,
    population: Population,
    /// Width / height of the render surface, once there is one
    aspect: Option<f32>,
    gravity: Option<SharedGravity>,
    /// Fly-in placement only; level layout has its own seeded stream
    anim_rng: Pcg32,
}

impl<E: PhysicsEngine, S: ProgressStore> Session<E, S> {
    pub fn new(engine: E, store: S, options: Options, seed: u64) -> Self {
        Self {
            engine,
            store,
            options,
            maze: Maze::new(),
            state: SessionState::GenerateMaze,
            progress: Progress::default(),
            population: Population::default(),
            aspect: None,
            gravity: None,
            anim_rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// A render surface of `width` x `height` is available
    pub fn set_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring empty surface {}x{}", width, height);
            return;
        }
        self.aspect = Some(width as f32 / height as f32);
        log::debug!("Surface {}x{}", width, height);
    }

    /// The render surface went away; progress is saved and ticking pauses
    pub fn surface_lost(&mut self) {
        self.suspend();
        self.aspect = None;
    }

    /// Read gravity from a sensor thread from now on
    pub fn attach_gravity(&mut self, gravity: SharedGravity) {
        self.gravity = Some(gravity);
    }

    pub fn set_debug_win_entire_game(&mut self, on: bool) {
        self.options.debug_win_entire_game = on;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Advance by `dt` seconds. Does nothing until a surface is attached.
    pub fn tick(&mut self, dt: f32) -> SessionPhase {
        if self.aspect.is_none() {
            return self.phase();
        }

        if let Some(gravity) = &self.gravity {
            self.engine.set_gravity(gravity.load());
        }
        self.engine.tick(dt);

        let Some(event) = self.tick_state(dt) else {
            return self.phase();
        };
        let next = self.state.next(event);
        let (from, to) = (self.state.phase(), next.phase());
        if from != to {
            self.leave(from);
            self.state = next;
            self.enter(to);
            log::debug!("Session {:?} -> {:?}", from, to);
        } else {
            self.state = next;
        }
        to
    }

    fn tick_state(&mut self, dt: f32) -> Option<SessionEvent> {
        match self.state {
            SessionState::GenerateMaze => match self.generate_level() {
                Ok(()) => Some(SessionEvent::MazeGenerated {
                    anim_rate: self.options.anim_rate,
                }),
                Err(e) => {
                    log::warn!("Level generation failed: {}", e);
                    None
                }
            },
            SessionState::FlyMazeIn(_) | SessionState::FlyMazeOut { .. } => {
                Some(SessionEvent::Elapsed(dt))
            }
            SessionState::PlayGame => self.play(),
            SessionState::GameWon => None,
        }
    }

    fn load_progress(&mut self) -> Progress {
        match self.store.load() {
            Ok(progress) => progress,
            Err(e) => {
                log::warn!("Failed to load progress ({}); starting over", e);
                let progress = Progress::new(Progress::fresh_seed_modifier());
                if let Err(e) = self.store.save(&progress) {
                    log::warn!("Failed to save fresh progress: {}", e);
                }
                progress
            }
        }
    }

    fn generate_level(&mut self) -> Result<(), MazeError> {
        let Some(aspect) = self.aspect else {
            return Ok(());
        };
        self.maze.clear();
        self.progress = self.load_progress();

        let level = self.progress.level;
        let (rows, cols) = maze_dimensions(level, aspect);
        log::info!("Level {} is a maze of size {} by {}", level, rows, cols);

        let mut rng = level_rng(rows, cols, self.progress.seed_modifier);
        self.maze.generate(rows, cols, &mut rng)?;
        let params = PopulateParams {
            touched_count: self.progress.touches as usize,
            include_boss: level == FINAL_LEVEL,
            bounce: self.options.bounce,
        };
        self.population = populate(&mut self.engine, &self.maze, params, &mut rng);
        self.engine.set_gravity(self.options.default_gravity());
        Ok(())
    }

    fn play(&mut self) -> Option<SessionEvent> {
        let collisions = self.engine.drain_collisions();
        let touched = touch_good_blocks(self.engine.entities_mut(), &collisions);
        if touched > 0 {
            log::debug!(
                "Touched {} ({}/{})",
                touched,
                self.engine.touched_good_block_count(),
                self.engine.good_block_count()
            );
        }

        let debug_win = self.options.debug_win_entire_game;
        if !self.engine.is_maze_solved() && !debug_win {
            return None;
        }

        let queen_dead = self.engine.find_queen().map(|q| !q.alive);
        match queen_dead {
            None => self.progress.level += 1,
            Some(_) => self.progress.reset(Progress::fresh_seed_modifier()),
        }
        self.progress.touches = 0;
        if let Err(e) = self.store.save(&self.progress) {
            log::warn!("Failed to save progress: {}", e);
        }
        log::info!("Maze solved; next level {}", self.progress.level);

        Some(SessionEvent::MazeSolved {
            victory: queen_dead == Some(true) || debug_win,
            anim_rate: self.options.anim_rate,
        })
    }

    fn enter(&mut self, phase: SessionPhase) {
        let world_box = self.engine.world_box();
        match phase {
            SessionPhase::FlyMazeIn => {
                let outer = world_box.surrounding();
                for entity in self.engine.entities_mut() {
                    let from = outer[self.anim_rng.random_range(0..outer.len())];
                    entity.source_transform = Transform {
                        translation: from.random_point(&mut self.anim_rng) - entity.position,
                        rotation: self.anim_rng.random_range(0.0..TAU),
                        scale: 1.0,
                    };
                    entity.target_transform = Transform::IDENTITY;
                }
            }
            SessionPhase::FlyMazeOut => {
                let center = world_box.center();
                for entity in self.engine.entities_mut() {
                    entity.source_transform = Transform::IDENTITY;
                    entity.target_transform = Transform {
                        translation: center - entity.position,
                        rotation: 0.0,
                        scale: 0.0,
                    };
                }
            }
            SessionPhase::GameWon => {
                let off_screen = 2.0 * world_box.max;
                for entity in self.engine.entities_mut() {
                    entity.source_transform = Transform::IDENTITY;
                    entity.target_transform = Transform {
                        translation: off_screen,
                        ..Transform::IDENTITY
                    };
                }
                log::info!("Game won");
            }
            SessionPhase::GenerateMaze | SessionPhase::PlayGame => {}
        }
    }

    /// Runs on a phase change and when play is abandoned by `suspend`. A
    /// solved level was already recorded by `play`.
    fn leave(&mut self, phase: SessionPhase) {
        if phase == SessionPhase::PlayGame
            && !self.engine.is_maze_solved()
            && !self.options.debug_win_entire_game
        {
            self.save_touches();
        }
    }

    fn save_touches(&mut self) {
        self.progress.touches = self.engine.touched_good_block_count() as u32;
        if let Err(e) = self.store.save(&self.progress) {
            log::warn!("Failed to save progress: {}", e);
        }
    }

    /// Persist progress now (app backgrounded or closing). An unsolved level
    /// is abandoned through the play leave hook, so it resumes with its
    /// touches.
    pub fn suspend(&mut self) {
        if self.maze.is_empty() {
            return;
        }
        if self.phase() == SessionPhase::PlayGame {
            self.leave(SessionPhase::PlayGame);
        } else if let Err(e) = self.store.save(&self.progress) {
            log::warn!("Failed to save progress: {}", e);
        }
    }

    /// Draw the world, the level label and, at the end, the victory banner
    pub fn render<D: DrawHelper + ?Sized>(&self, draw: &mut D) {
        if self.aspect.is_none() {
            return;
        }
        let world_box = self.engine.world_box();
        renderer::render_world(self.engine.entities(), self.state.transition_alpha(), draw);
        renderer::render_hud(self.progress.level, world_box, draw);
        if self.phase() == SessionPhase::GameWon {
            renderer::render_victory(world_box, draw);
        }
    }

    /// Current gravity, for display
    pub fn gravity(&self) -> Vec2 {
        self.engine.gravity()
    }
}
