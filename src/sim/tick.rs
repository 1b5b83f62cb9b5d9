//! Per-frame simulation tick
//!
//! Each call handles commands, eases the tunnel rotation on the frame delta,
//! and, while playing, advances the ball by exactly one logical step.

use super::ball::{self, StepOutcome};
use super::collision::collectibles_in_reach;
use super::geometry::rotation_to_floor;
use super::state::{GameEvent, GamePhase, GameSession};
use glam::Vec3;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Rotate-left key held
    pub rotate_left: bool,
    /// Rotate-right key held
    pub rotate_right: bool,
    /// Play (menu) or play again (lost)
    pub play: bool,
    /// Restart the run; starts one from the menu
    pub restart: bool,
    /// Idle/demo mode - the autopilot steers the tunnel
    pub idle_mode: bool,
}

/// Advance the session by one frame
///
/// `dt` is the frame time in seconds and only drives rotation easing.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.time_ticks += 1;

    match session.phase {
        GamePhase::Menu if input.play || input.restart => session.start(),
        GamePhase::Lost if input.play || input.restart => session.restart(),
        GamePhase::Playing if input.restart => session.restart(),
        _ => {}
    }

    // Rotation keeps easing in every phase
    if input.idle_mode && session.phase == GamePhase::Playing {
        if let Some(target) = autopilot_target(session) {
            session.rotation.set_target(target);
        }
    } else {
        session.rotation.hold(
            input.rotate_left,
            input.rotate_right,
            session.tuning.rotation_speed,
            dt,
        );
    }
    session.rotation.ease(session.tuning.rotation_easing, dt);

    if session.phase == GamePhase::Playing {
        advance_ball(session);
    }
}

/// One fixed physics step plus its consequences
fn advance_ball(session: &mut GameSession) {
    let before = session.ball.position();
    let rotation = session.rotation.angle;

    let outcome = ball::step(
        &mut session.ball,
        &session.config,
        &session.tuning,
        &session.window,
        rotation,
    );

    match outcome {
        StepOutcome::Fell => {
            session.lose();
            return;
        }
        StepOutcome::Landed(landing) => {
            session.score += session.tuning.bounce_score;
            let velocity = Vec3::new(
                0.0,
                session.ball.velocity,
                session.ball.forward_speed(&session.tuning),
            );
            log::debug!(
                "Bounce #{} on segment {} face {} at {:.3}",
                session.ball.jump_count,
                landing.segment_index,
                landing.face,
                session.ball.forward
            );
            session.push_event(GameEvent::Bounce {
                position: session.ball.position(),
                velocity,
                segment_index: landing.segment_index,
                face: landing.face,
            });
        }
        StepOutcome::Launched => {
            log::debug!("Launched off the foothold");
        }
        StepOutcome::Airborne => {}
    }

    // Pickups are independent of bouncing: test where the ball was and is
    let after = session.ball.position();
    let pickups = collectibles_in_reach(
        &session.window,
        &session.config,
        &[before, after],
        rotation,
        session.tuning.collect_radius,
    );
    for pickup in pickups {
        if session.window.mark_collected(pickup.segment_index, pickup.platform) {
            session.score += session.tuning.collectible_score;
            session.push_event(GameEvent::Collected {
                position: pickup.position,
                segment_index: pickup.segment_index,
                face: pickup.face,
            });
        }
    }

    let change = session.window.advance(session.ball.forward);
    session.publish_window_change(&change);
}

/// Rotation that brings the next platform under the ball
///
/// Picks, in the segment after the one the ball last passed the center of,
/// the platform needing the smallest turn from the current target. Holds
/// still while the ball sits on the foothold.
pub fn autopilot_target(session: &GameSession) -> Option<f32> {
    if session.ball.on_foothold(&session.config) {
        return None;
    }
    let config = &session.config;
    let passed = (session.ball.forward - config.first_platform_center()) / config.spacing();
    let next = (passed.floor() + 1.0).max(0.0) as u32;
    let current = session.rotation.target;

    session
        .window
        .segment(next)?
        .platforms
        .iter()
        .map(|p| rotation_to_floor(p.face, config.sides, current))
        .min_by(|a, b| (a - current).abs().total_cmp(&(b - current).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PhysicsTuning, TunnelConfig};
    use crate::consts::FRAME_DT;

    fn session() -> GameSession {
        GameSession::new(TunnelConfig::default(), PhysicsTuning::default(), 12345).unwrap()
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut state = session();
        assert_eq!(state.phase, GamePhase::Menu);

        // Tick without play - should stay in Menu
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.ball.forward, 1.5);

        let input = TickInput {
            play: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        // Starting tick already integrates: the ball leaves the foothold,
        // which is not a bounce
        assert_eq!(state.jump_count(), 0);
        assert_eq!(state.score, 0);
        assert!(state.ball.velocity > 0.0);
        assert!(!state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Bounce { .. })));
    }

    #[test]
    fn test_restart_from_menu_starts_playing() {
        let mut state = session();
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::PhaseChanged {
            from: GamePhase::Menu,
            to: GamePhase::Playing,
        }));
        assert_eq!(state.window.len(), 7);
    }

    #[test]
    fn test_rotation_eases_outside_playing() {
        let mut state = session();
        let input = TickInput {
            rotate_right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, FRAME_DT);
        }
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.rotation.target > 0.0);
        assert!(state.rotation.angle > 0.0);
        assert!(state.rotation.angle < state.rotation.target);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed produce identical runs
        let mut a = session();
        let mut b = session();
        let inputs = [
            TickInput {
                play: true,
                ..Default::default()
            },
            TickInput {
                rotate_left: true,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];
        for i in 0..600 {
            let input = &inputs[(i / 40).min(2)];
            tick(&mut a, input, FRAME_DT);
            tick(&mut b, input, FRAME_DT);
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_autopilot_survives() {
        let mut state = session();
        let play = TickInput {
            play: true,
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &play, FRAME_DT);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state, &idle, FRAME_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.jump_count() >= 20);
        assert!(state.score >= state.jump_count() as u64);
    }

    #[test]
    fn test_lost_then_play_again() {
        let mut state = session();
        tick(
            &mut state,
            &TickInput {
                play: true,
                ..Default::default()
            },
            FRAME_DT,
        );
        // Half a face off: the ball falls between two faces
        let between_faces = std::f32::consts::PI / 8.0;
        state.rotation.angle = between_faces;
        state.rotation.target = between_faces;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), FRAME_DT);
            if state.phase == GamePhase::Lost {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::Lost);
        let frozen = state.ball;
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.ball, frozen);

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            FRAME_DT,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.rotation.angle, 0.0);
    }
}
