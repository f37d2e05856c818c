//! Distraction Defense - falling-target arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, hit-tests, game state)
//! - `tuning`: Data-driven game balance
//! - `reward`: Score to XP/coin conversion used by the embedding dashboard
//! - `renderer`: Canvas 2D drawing

pub mod renderer;
pub mod reward;
pub mod sim;
pub mod tuning;

pub use reward::Reward;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Spawn interval at score 0 (ms)
    pub const SPAWN_INTERVAL_BASE_MS: f64 = 1000.0;
    /// Spawn interval never drops below this (ms)
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 400.0;
    /// Every `n` points of score shave 1ms off the spawn interval
    pub const SPAWN_INTERVAL_SCORE_DIVISOR: f64 = 2.0;

    /// Base fall speed range (units per frame)
    pub const TARGET_SPEED_MIN: f32 = 1.0;
    pub const TARGET_SPEED_MAX: f32 = 2.5;
    /// Every `n` points of score add 1 unit/frame of fall speed
    pub const SPEED_SCORE_DIVISOR: f32 = 500.0;

    /// Target radius range
    pub const TARGET_RADIUS_MIN: f32 = 25.0;
    pub const TARGET_RADIUS_MAX: f32 = 40.0;

    /// Minimum distance from a side wall to a spawned target's center
    pub const SPAWN_SIDE_MARGIN: f32 = 50.0;
    /// Spawn line (above the visible area)
    pub const SPAWN_Y: f32 = -50.0;

    /// Points per destroyed target
    pub const HIT_AWARD: u32 = 10;

    /// Particles per explosion
    pub const BURST_SIZE: usize = 12;
    /// Particle launch speed range [min, max)
    pub const BURST_SPEED_MIN: f32 = 1.0;
    pub const BURST_SPEED_MAX: f32 = 4.0;
    /// Life lost per frame (1.0 → 0 in ~50 frames)
    pub const PARTICLE_DECAY: f32 = 0.02;

    /// Height of the danger strip drawn along the loss boundary
    pub const DANGER_STRIP_HEIGHT: f64 = 10.0;
}
