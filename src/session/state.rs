//! Session states and the transition table
//!
//! `SessionState::next` is pure: the session driver feeds it one event per
//! tick and runs the leave/enter hooks when the phase changes.

use serde::{Deserialize, Serialize};

/// Which state the session is in, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a surface, then building the level
    GenerateMaze,
    /// Level animating in from off-screen
    FlyMazeIn,
    /// Player in control
    PlayGame,
    /// Solved level shrinking away
    FlyMazeOut,
    /// Terminal
    GameWon,
}

/// Progress of a fly-in or fly-out animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Starts at 0; the animation is over once it passes 1
    pub alpha: f32,
    /// Alpha units per second
    pub anim_rate: f32,
}

impl Transition {
    pub fn new(anim_rate: f32) -> Self {
        Self {
            alpha: 0.0,
            anim_rate,
        }
    }

    /// Alpha never decreases
    pub fn advanced(self, dt: f32) -> Self {
        Self {
            alpha: self.alpha + self.anim_rate * dt.max(0.0),
            ..self
        }
    }

    pub fn is_complete(&self) -> bool {
        self.alpha > 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    GenerateMaze,
    FlyMazeIn(Transition),
    PlayGame,
    FlyMazeOut {
        transition: Transition,
        /// Head for `GameWon` instead of the next level
        victory: bool,
    },
    GameWon,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Level built and populated
    MazeGenerated { anim_rate: f32 },
    /// Time passed
    Elapsed(f32),
    /// Every good block touched (and the queen, if any, defeated)
    MazeSolved { victory: bool, anim_rate: f32 },
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::GenerateMaze => SessionPhase::GenerateMaze,
            SessionState::FlyMazeIn(_) => SessionPhase::FlyMazeIn,
            SessionState::PlayGame => SessionPhase::PlayGame,
            SessionState::FlyMazeOut { .. } => SessionPhase::FlyMazeOut,
            SessionState::GameWon => SessionPhase::GameWon,
        }
    }

    /// Render interpolation factor; 1 outside the fly animations
    pub fn transition_alpha(&self) -> f32 {
        match self {
            SessionState::FlyMazeIn(t) | SessionState::FlyMazeOut { transition: t, .. } => t.alpha,
            _ => 1.0,
        }
    }

    /// Apply one event. Events that mean nothing in the current state leave
    /// it unchanged.
    pub fn next(self, event: SessionEvent) -> SessionState {
        match (self, event) {
            (SessionState::GenerateMaze, SessionEvent::MazeGenerated { anim_rate }) => {
                SessionState::FlyMazeIn(Transition::new(anim_rate))
            }
            (SessionState::FlyMazeIn(t), SessionEvent::Elapsed(dt)) => {
                let t = t.advanced(dt);
                if t.is_complete() {
                    SessionState::PlayGame
                } else {
                    SessionState::FlyMazeIn(t)
                }
            }
            (SessionState::PlayGame, SessionEvent::MazeSolved { victory, anim_rate }) => {
                SessionState::FlyMazeOut {
                    transition: Transition::new(anim_rate),
                    victory,
                }
            }
            (SessionState::FlyMazeOut { transition, victory }, SessionEvent::Elapsed(dt)) => {
                let transition = transition.advanced(dt);
                match (transition.is_complete(), victory) {
                    (false, _) => SessionState::FlyMazeOut { transition, victory },
                    (true, true) => SessionState::GameWon,
                    (true, false) => SessionState::GenerateMaze,
                }
            }
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn solved(victory: bool) -> SessionEvent {
        SessionEvent::MazeSolved {
            victory,
            anim_rate: 1.0,
        }
    }

    #[test]
    fn test_full_cycle() {
        let mut s = SessionState::GenerateMaze;
        s = s.next(SessionEvent::MazeGenerated { anim_rate: 1.0 });
        assert_eq!(s.phase(), SessionPhase::FlyMazeIn);
        assert_eq!(s.transition_alpha(), 0.0);

        s = s.next(SessionEvent::Elapsed(0.5));
        assert_eq!(s.phase(), SessionPhase::FlyMazeIn);
        // Exactly 1 is not past the end
        s = s.next(SessionEvent::Elapsed(0.5));
        assert_eq!(s.phase(), SessionPhase::FlyMazeIn);
        s = s.next(SessionEvent::Elapsed(0.01));
        assert_eq!(s, SessionState::PlayGame);

        s = s.next(solved(false));
        assert_eq!(s.phase(), SessionPhase::FlyMazeOut);
        s = s.next(SessionEvent::Elapsed(2.0));
        assert_eq!(s, SessionState::GenerateMaze);
    }

    #[test]
    fn test_victory_ends_in_game_won() {
        let s = SessionState::PlayGame
            .next(solved(true))
            .next(SessionEvent::Elapsed(1.5));
        assert_eq!(s, SessionState::GameWon);
        assert_eq!(s.next(SessionEvent::Elapsed(10.0)), SessionState::GameWon);
        assert_eq!(s.next(solved(true)), SessionState::GameWon);
    }

    #[test]
    fn test_irrelevant_events_ignored() {
        assert_eq!(
            SessionState::GenerateMaze.next(SessionEvent::Elapsed(5.0)),
            SessionState::GenerateMaze
        );
        assert_eq!(
            SessionState::PlayGame.next(SessionEvent::Elapsed(5.0)),
            SessionState::PlayGame
        );
        let flying = SessionState::FlyMazeIn(Transition::new(1.0));
        assert_eq!(flying.next(solved(true)), flying);
    }

    #[test]
    fn test_anim_rate_scales_time() {
        let s = SessionState::FlyMazeIn(Transition::new(4.0)).next(SessionEvent::Elapsed(0.2));
        assert!((s.transition_alpha() - 0.8).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_alpha_monotonic_single_step(dts in prop::collection::vec(0.0f32..0.5, 1..60)) {
            let mut s = SessionState::FlyMazeIn(Transition::new(1.0));
            let mut last_alpha = 0.0;
            for dt in dts {
                let before = s.phase();
                s = s.next(SessionEvent::Elapsed(dt));
                match s.phase() {
                    SessionPhase::FlyMazeIn => {
                        prop_assert!(s.transition_alpha() >= last_alpha);
                        last_alpha = s.transition_alpha();
                    }
                    SessionPhase::PlayGame => {
                        prop_assert!(matches!(before, SessionPhase::FlyMazeIn | SessionPhase::PlayGame));
                    }
                    other => prop_assert!(false, "unexpected phase {:?}", other),
                }
            }
        }
    }
}
