//! Game state and core simulation types
//!
//! All per-session mutable data lives here. The host never touches it
//! directly; it reads the entity slices for drawing and a `HudSnapshot` for
//! the overlay.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Distraction labels drawn on the targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistractionKind {
    TikTok,
    Email,
    Slack,
    News,
    Noise,
    Notification,
    Doubt,
    Fear,
    Reddit,
    Text,
}

impl DistractionKind {
    pub const ALL: [DistractionKind; 10] = [
        DistractionKind::TikTok,
        DistractionKind::Email,
        DistractionKind::Slack,
        DistractionKind::News,
        DistractionKind::Noise,
        DistractionKind::Notification,
        DistractionKind::Doubt,
        DistractionKind::Fear,
        DistractionKind::Reddit,
        DistractionKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistractionKind::TikTok => "TikTok",
            DistractionKind::Email => "Email",
            DistractionKind::Slack => "Slack",
            DistractionKind::News => "News",
            DistractionKind::Noise => "Noise",
            DistractionKind::Notification => "Notification",
            DistractionKind::Doubt => "Doubt",
            DistractionKind::Fear => "Fear",
            DistractionKind::Reddit => "Reddit",
            DistractionKind::Text => "Text",
        }
    }
}

/// Target/particle color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    Red,
    Orange,
    Yellow,
    Fuchsia,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Red,
        Palette::Orange,
        Palette::Yellow,
        Palette::Fuchsia,
    ];

    /// CSS hex color (`#rrggbb`)
    pub fn hex(&self) -> &'static str {
        match self {
            Palette::Red => "#f87171",
            Palette::Orange => "#fb923c",
            Palette::Yellow => "#facc15",
            Palette::Fuchsia => "#e879f9",
        }
    }
}

/// A falling distraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub kind: DistractionKind,
    /// Fall speed in units per frame
    pub speed: f32,
    pub radius: f32,
    pub color: Palette,
}

impl Target {
    /// True if the point lies strictly inside the target's circle
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) < self.radius * self.radius
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases every frame
    pub color: Palette,
}

/// Emitted when a target reaches the loss boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LossEvent {
    pub target_id: u32,
    pub final_score: u32,
}

/// One play-through, from start/restart to game over
#[derive(Debug, Clone)]
pub struct Session {
    /// Live targets in spawn order (last = topmost)
    pub targets: Vec<Target>,
    /// Live particles
    pub particles: Vec<Particle>,
    /// Timestamp of the last spawn (ms, host clock)
    pub last_spawn_ms: f64,
    pub score: u32,
    running: bool,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl Session {
    /// Create a fresh running session
    pub fn new(seed: u64, now_ms: f64) -> Self {
        Self {
            targets: Vec::new(),
            particles: Vec::new(),
            last_spawn_ms: now_ms,
            score: 0,
            running: true,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// End the session. Only the first call has any effect.
    pub fn halt(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a target on top of the stack, assigning it a fresh ID
    pub fn push_target(&mut self, mut target: Target) -> u32 {
        target.id = self.next_entity_id();
        let id = target.id;
        self.targets.push(target);
        id
    }
}
