//! Per-frame simulation step
//!
//! Speeds are in units per frame: the host calls `advance` once per
//! display refresh, so game pace follows the frame rate.

use super::state::{LossEvent, Session};
use crate::tuning::Tuning;

/// Advance the session by one frame.
///
/// Moves every target, reports the first one to reach the loss boundary,
/// then integrates and culls particles. A halted session is left untouched.
pub fn advance(session: &mut Session, canvas_height: f32, tuning: &Tuning) -> Option<LossEvent> {
    if !session.is_running() {
        return None;
    }

    let mut loss = None;
    for target in &mut session.targets {
        target.pos.y += target.speed;

        // Center reached the bottom edge
        if loss.is_none() && target.pos.y >= canvas_height {
            loss = Some(LossEvent {
                target_id: target.id,
                final_score: session.score,
            });
        }
    }

    for particle in &mut session.particles {
        particle.pos += particle.vel;
        particle.life -= tuning.particle_decay;
    }
    session.particles.retain(|p| p.life > 0.0);

    loss
}
