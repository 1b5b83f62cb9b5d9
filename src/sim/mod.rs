//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical step for the ball, frame delta only for rotation easing
//! - Injected or seeded RNG only
//! - Stable iteration order (segments by index)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod generator;
pub mod geometry;
pub mod rotation;
pub mod state;
pub mod tick;
pub mod window;

pub use ball::{BallState, StepOutcome};
pub use collision::{Landing, Pickup, Probe};
pub use generator::{Platform, RandomSource, ScriptedRandom, SegmentGenerator};
pub use geometry::{bottom_face, face_angle, face_position, face_width};
pub use rotation::TunnelRotation;
pub use state::{GameEvent, GamePhase, GameSession, Snapshot};
pub use tick::{TickInput, autopilot_target, tick};
pub use window::{SegmentRecord, SegmentWindow, WindowChange};
