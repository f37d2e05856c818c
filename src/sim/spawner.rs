//! Time-gated target spawning
//!
//! Difficulty comes entirely from here: the spawn interval shrinks and the
//! fall speed grows as the score climbs.

use glam::Vec2;
use rand::Rng;

use super::state::{DistractionKind, Palette, Session, Target};
use crate::tuning::Tuning;

/// Milliseconds that must elapse between spawns at the given score
pub fn spawn_interval_ms(score: u32, tuning: &Tuning) -> f64 {
    (tuning.spawn_interval_base_ms - score as f64 / tuning.spawn_interval_score_divisor)
        .max(tuning.spawn_interval_floor_ms)
}

/// Spawn at most one target if the spawn interval has elapsed.
///
/// The new target is pushed onto the session (topmost) and a copy returned.
pub fn maybe_spawn(
    session: &mut Session,
    now_ms: f64,
    canvas_width: f32,
    tuning: &Tuning,
) -> Option<Target> {
    if !session.is_running() {
        return None;
    }
    if now_ms - session.last_spawn_ms <= spawn_interval_ms(session.score, tuning) {
        return None;
    }

    let target = roll_target(session, canvas_width, tuning);
    session.last_spawn_ms = now_ms;
    let id = session.push_target(target);
    log::debug!("Spawned target {} (score {})", id, session.score);
    session.targets.last().cloned()
}

/// Randomize a target's attributes (ID assigned on push)
fn roll_target(session: &mut Session, canvas_width: f32, tuning: &Tuning) -> Target {
    let score = session.score;
    let rng = &mut session.rng;

    let radius = rng.random_range(tuning.radius_min..=tuning.radius_max);

    // Keep the whole circle on screen
    let margin = tuning.spawn_side_margin.max(radius);
    let x = if canvas_width > 2.0 * margin {
        rng.random_range(margin..=canvas_width - margin)
    } else {
        canvas_width / 2.0
    };

    let speed = uniform(&mut *rng, tuning.speed_min, tuning.speed_max)
        + score as f32 / tuning.speed_score_divisor;

    let kind = DistractionKind::ALL[rng.random_range(0..DistractionKind::ALL.len())];
    let color = Palette::ALL[rng.random_range(0..Palette::ALL.len())];

    Target {
        id: 0,
        pos: Vec2::new(x, tuning.spawn_y),
        kind,
        speed,
        radius,
        color,
    }
}

/// Sample [min, max), collapsing to `min` for an empty range
pub(crate) fn uniform<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
