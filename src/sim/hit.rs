//! Pointer hit-testing
//!
//! One shot, one kill: a click destroys at most one target, preferring the
//! most recently spawned (drawn on top) when circles overlap.

use std::f32::consts::TAU;

use glam::Vec2;

use super::spawner::uniform;
use super::state::{Palette, Particle, Session};
use crate::tuning::Tuning;

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// A target was destroyed; `score` is the new total
    Hit { target_id: u32, score: u32 },
    /// Nothing under the pointer
    Miss,
    /// No running session
    Ignored,
}

impl HitResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, HitResult::Hit { .. })
    }
}

/// Resolve a click at canvas coordinates (x, y)
pub fn handle_click(session: &mut Session, x: f32, y: f32, tuning: &Tuning) -> HitResult {
    if !session.is_running() {
        return HitResult::Ignored;
    }

    let point = Vec2::new(x, y);
    let Some(index) = session.targets.iter().rposition(|t| t.contains(point)) else {
        return HitResult::Miss;
    };

    let target = session.targets.remove(index);
    explode(session, target.pos, target.color, tuning);
    session.score += tuning.hit_award;
    log::debug!(
        "Hit {} '{}' (score {})",
        target.id,
        target.kind.as_str(),
        session.score
    );

    HitResult::Hit {
        target_id: target.id,
        score: session.score,
    }
}

/// Radial particle burst, evenly spaced around a full circle
fn explode(session: &mut Session, pos: Vec2, color: Palette, tuning: &Tuning) {
    let count = tuning.burst_size;
    session.particles.reserve(count);
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        let speed = uniform(
            &mut session.rng,
            tuning.burst_speed_min,
            tuning.burst_speed_max,
        );
        session.particles.push(Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            life: 1.0,
            color,
        });
    }
}
