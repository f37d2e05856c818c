//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one stream per session)
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod game;
pub mod hit;
pub mod spawner;
pub mod state;
pub mod tick;

pub use game::{
    FrameLoop, FrameOutcome, FrameTicket, Game, GameEvent, GamePhase, HudSnapshot, SoundCue,
    Viewport,
};
pub use hit::{HitResult, handle_click};
pub use spawner::{maybe_spawn, spawn_interval_ms};
pub use state::{DistractionKind, LossEvent, Palette, Particle, Session, Target};
pub use tick::advance;
