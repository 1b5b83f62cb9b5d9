//! Game session state and the events it publishes
//!
//! One [`GameSession`] per active game. Everything the presentation layer
//! needs is either in a [`Snapshot`] or in the event queue drained after
//! each tick.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::BallState;
use super::generator::{RandomSource, SegmentGenerator};
use super::rotation::TunnelRotation;
use super::window::{SegmentWindow, WindowChange};
use crate::config::{PhysicsTuning, SessionConfig, TunnelConfig};
use crate::error::ConfigError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the play command
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    Lost,
    /// Clearing the previous run; never visible between ticks
    Restarting,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Bounce {
        position: Vec3,
        /// (0, vertical, forward) velocity per tick after the bounce
        velocity: Vec3,
        segment_index: u32,
        face: u32,
    },
    Collected {
        position: Vec3,
        segment_index: u32,
        face: u32,
    },
    Lost {
        final_score: u64,
    },
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    SegmentSpawned {
        index: u32,
    },
    SegmentEvicted {
        index: u32,
    },
}

/// Read-only view of the session after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub forward: f32,
    pub vertical: f32,
    pub velocity: f32,
    pub rotation: f32,
    pub target_rotation: f32,
    pub score: u64,
    pub jump_count: u32,
    /// Indices of the live segments
    pub segments: Vec<u32>,
}

/// Complete state of one game
pub struct GameSession {
    pub config: TunnelConfig,
    pub tuning: PhysicsTuning,
    /// Seed of the segment generator, when known
    pub seed: Option<u64>,
    pub phase: GamePhase,
    pub score: u64,
    pub ball: BallState,
    pub rotation: TunnelRotation,
    pub window: SegmentWindow,
    /// Simulation tick counter (every tick, any phase)
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Session with a seeded PCG generator
    pub fn new(config: TunnelConfig, tuning: PhysicsTuning, seed: u64) -> Result<Self, ConfigError> {
        let mut session =
            Self::with_random_source(config, tuning, Box::new(Pcg32::seed_from_u64(seed)))?;
        session.seed = Some(seed);
        Ok(session)
    }

    /// Session seeded from OS entropy; the seed is logged so a run can be replayed
    pub fn from_entropy(config: TunnelConfig, tuning: PhysicsTuning) -> Result<Self, ConfigError> {
        let seed = rand::random::<u64>();
        log::info!("Session seed: {}", seed);
        Self::new(config, tuning, seed)
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        match config.seed {
            Some(seed) => Self::new(config.tunnel.clone(), config.physics.clone(), seed),
            None => Self::from_entropy(config.tunnel.clone(), config.physics.clone()),
        }
    }

    /// Session over any random source (scripted layouts, replays)
    pub fn with_random_source(
        config: TunnelConfig,
        tuning: PhysicsTuning,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tuning.validate()?;

        let generator = SegmentGenerator::new(config.clone(), rng);
        let window = SegmentWindow::new(config.clone(), generator);
        Ok(Self {
            ball: BallState::resting(&config),
            config,
            tuning,
            seed: None,
            phase: GamePhase::Menu,
            score: 0,
            rotation: TunnelRotation::default(),
            window,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    pub fn jump_count(&self) -> u32 {
        self.ball.jump_count
    }

    /// Menu -> Playing
    pub fn start(&mut self) {
        if self.phase != GamePhase::Menu {
            log::warn!("Ignoring play command in {:?}", self.phase);
            return;
        }
        self.begin_run();
        self.set_phase(GamePhase::Playing);
    }

    /// Lost/Playing -> Restarting -> Playing, within one call
    ///
    /// From the menu this is the same as [`start`](Self::start).
    pub fn restart(&mut self) {
        match self.phase {
            GamePhase::Menu => {
                self.start();
                return;
            }
            GamePhase::Lost | GamePhase::Playing => {}
            GamePhase::Restarting => {
                log::warn!("Ignoring restart command in {:?}", self.phase);
                return;
            }
        }
        let from = self.phase;
        self.phase = GamePhase::Restarting;
        log::info!("Restarting (previous score {})", self.score);
        self.begin_run();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::PhaseChanged {
            from,
            to: GamePhase::Playing,
        });
    }

    /// Playing -> Lost
    pub fn lose(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.set_phase(GamePhase::Lost);
        log::info!(
            "Run lost: score {} after {} bounces",
            self.score,
            self.ball.jump_count
        );
        self.events.push(GameEvent::Lost {
            final_score: self.score,
        });
    }

    /// Reset ball, rotation, score and segments for a fresh run
    fn begin_run(&mut self) {
        self.score = 0;
        self.ball = BallState::resting(&self.config);
        self.rotation = TunnelRotation::default();
        self.window.reset();
        let change = self.window.advance(self.ball.forward);
        self.publish_window_change(&change);
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    pub(crate) fn publish_window_change(&mut self, change: &WindowChange) {
        for index in &change.evicted {
            self.events.push(GameEvent::SegmentEvicted { index: *index });
        }
        for record in &change.created {
            self.events.push(GameEvent::SegmentSpawned {
                index: record.index,
            });
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event published since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events waiting to be drained
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            forward: self.ball.forward,
            vertical: self.ball.vertical,
            velocity: self.ball.velocity,
            rotation: self.rotation.angle,
            target_rotation: self.rotation.target,
            score: self.score,
            jump_count: self.ball.jump_count,
            segments: self.window.indices(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(TunnelConfig::default(), PhysicsTuning::default(), 12345).unwrap()
    }

    #[test]
    fn test_new_session_in_menu() {
        let session = session();
        assert_eq!(session.phase, GamePhase::Menu);
        assert_eq!(session.score, 0);
        assert!(session.window.is_empty());
        assert_eq!(session.seed, Some(12345));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TunnelConfig {
            sides: 2,
            ..Default::default()
        };
        assert!(matches!(
            GameSession::new(config, PhysicsTuning::default(), 1),
            Err(ConfigError::TooFewSides(2))
        ));

        let tuning = PhysicsTuning {
            gravity: 0.1,
            ..Default::default()
        };
        assert!(GameSession::new(TunnelConfig::default(), tuning, 1).is_err());
    }

    #[test]
    fn test_start_spawns_window_and_events() {
        let mut session = session();
        session.start();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.window.len(), 7);

        let events = session.drain_events();
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::SegmentSpawned { .. }))
            .count();
        assert_eq!(spawned, 7);
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Menu,
            to: GamePhase::Playing,
        }));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_restart_from_menu_starts() {
        let mut session = session();
        session.restart();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.window.len(), 7);
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Menu,
            to: GamePhase::Playing,
        }));
    }

    #[test]
    fn test_restart_after_lost() {
        let mut session = session();
        session.start();
        session.score = 42;
        session.lose();
        assert_eq!(session.phase, GamePhase::Lost);
        assert!(session
            .pending_events()
            .contains(&GameEvent::Lost { final_score: 42 }));

        session.restart();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.ball, BallState::resting(&session.config));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = session();
        session.start();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.forward, 1.5);
        assert_eq!(snapshot.segments, (0..=6).collect::<Vec<_>>());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"Playing\""));
    }
}
