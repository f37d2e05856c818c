//! Game state machine
//!
//! `Start → Playing → GameOver → (restart) Playing`, or `GameOver → Exited`
//! when the player claims their score. The host drives `frame` from its
//! animation callback and `click` from its pointer handler; both are no-ops
//! outside `Playing`.

use serde::{Deserialize, Serialize};

use super::hit::{HitResult, handle_click};
use super::spawner::maybe_spawn;
use super::state::{LossEvent, Particle, Session, Target};
use super::tick::advance;
use crate::tuning::Tuning;

/// Current phase of the mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session yet
    Start,
    /// Session running
    Playing,
    /// Session ended by a loss, score frozen
    GameOver,
    /// Score claimed, mini-game torn down
    Exited,
}

/// Play-area size in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Token for one scheduled animation callback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket(u64);

/// Guards the per-frame loop: at most one ticket is live at a time
#[derive(Debug, Default)]
pub struct FrameLoop {
    generation: u64,
    live: Option<u64>,
}

impl FrameLoop {
    /// Start a new loop, invalidating any previous ticket
    pub fn begin(&mut self) -> FrameTicket {
        self.generation += 1;
        self.live = Some(self.generation);
        FrameTicket(self.generation)
    }

    /// Stop the live loop; every outstanding ticket becomes stale
    pub fn cancel(&mut self) {
        self.live = None;
    }

    pub fn accepts(&self, ticket: FrameTicket) -> bool {
        self.live == Some(ticket.0)
    }

    pub fn is_active(&self) -> bool {
        self.live.is_some()
    }
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stop,
}

/// UI-observable copy of the session, refreshed on scoring and phase changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u32,
}

/// Feedback cues for the host's sound layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Start,
    Laser,
    Click,
    GameOver,
}

/// Things that happened since the host last drained the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Spawned { id: u32 },
    Hit { target_id: u32, score: u32 },
    Miss,
    Lost { final_score: u32 },
    Claimed { final_score: u32 },
}

impl GameEvent {
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Started => Some(SoundCue::Start),
            GameEvent::Hit { .. } => Some(SoundCue::Laser),
            GameEvent::Miss => Some(SoundCue::Click),
            GameEvent::Lost { .. } => Some(SoundCue::GameOver),
            GameEvent::Spawned { .. } | GameEvent::Claimed { .. } => None,
        }
    }
}

type CompletionCallback = Box<dyn FnOnce(u32)>;

/// One mini-game instance
///
/// Session state is only reachable read-only from outside the simulation:
///
/// ```compile_fail
/// use distraction_defense::Tuning;
/// use distraction_defense::sim::Game;
///
/// let mut game = Game::new(Tuning::default(), 1, |_| {});
/// game.start(0.0);
/// game.session_mut().unwrap().score = 0;
/// ```
pub struct Game {
    tuning: Tuning,
    phase: GamePhase,
    session: Option<Session>,
    frame_loop: FrameLoop,
    on_complete: Option<CompletionCallback>,
    seed: u64,
    sessions_started: u64,
    events: Vec<GameEvent>,
    hud_dirty: bool,
}

impl Game {
    /// Create an idle game; `on_complete` receives the claimed score once
    pub fn new(tuning: Tuning, seed: u64, on_complete: impl FnOnce(u32) + 'static) -> Self {
        Self {
            tuning,
            phase: GamePhase::Start,
            session: None,
            frame_loop: FrameLoop::default(),
            on_complete: Some(Box::new(on_complete)),
            seed,
            sessions_started: 0,
            events: Vec::new(),
            hud_dirty: true,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Mutable session access for scripted setups
    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Live targets, bottom to top
    pub fn targets(&self) -> &[Target] {
        self.session
            .as_ref()
            .map(|s| s.targets.as_slice())
            .unwrap_or(&[])
    }

    pub fn particles(&self) -> &[Particle] {
        self.session
            .as_ref()
            .map(|s| s.particles.as_slice())
            .unwrap_or(&[])
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.score)
    }

    pub fn is_loop_active(&self) -> bool {
        self.frame_loop.is_active()
    }

    /// Begin a fresh session from `Start` or `GameOver`
    pub fn start(&mut self, now_ms: f64) -> Option<FrameTicket> {
        match self.phase {
            GamePhase::Start | GamePhase::GameOver => {}
            GamePhase::Playing | GamePhase::Exited => {
                log::warn!("Ignoring start in phase {:?}", self.phase);
                return None;
            }
        }

        // Each session gets its own stream so restarts don't replay
        let seed = self.seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;

        self.session = Some(Session::new(seed, now_ms));
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::Started);
        log::info!("Session {} started (seed {})", self.sessions_started, seed);

        Some(self.frame_loop.begin())
    }

    /// Play again after a loss
    pub fn restart(&mut self, now_ms: f64) -> Option<FrameTicket> {
        if self.phase != GamePhase::GameOver {
            log::warn!("Ignoring restart in phase {:?}", self.phase);
            return None;
        }
        self.start(now_ms)
    }

    /// Run one frame: spawn, move, detect loss
    pub fn frame(&mut self, ticket: FrameTicket, now_ms: f64, viewport: Viewport) -> FrameOutcome {
        if self.phase != GamePhase::Playing || !self.frame_loop.accepts(ticket) {
            return FrameOutcome::Stop;
        }
        let Some(session) = self.session.as_mut() else {
            return FrameOutcome::Stop;
        };

        if let Some(target) = maybe_spawn(session, now_ms, viewport.width, &self.tuning) {
            self.events.push(GameEvent::Spawned { id: target.id });
        }

        match advance(session, viewport.height, &self.tuning) {
            Some(loss) => {
                self.on_loss(loss);
                FrameOutcome::Stop
            }
            None => FrameOutcome::Continue,
        }
    }

    /// Pointer click in canvas coordinates
    pub fn click(&mut self, x: f32, y: f32) -> HitResult {
        if self.phase != GamePhase::Playing {
            return HitResult::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return HitResult::Ignored;
        };

        let result = handle_click(session, x, y, &self.tuning);
        match result {
            HitResult::Hit { target_id, score } => {
                self.events.push(GameEvent::Hit { target_id, score });
                self.hud_dirty = true;
            }
            HitResult::Miss => self.events.push(GameEvent::Miss),
            HitResult::Ignored => {}
        }
        result
    }

    /// Hand the final score to the embedder and tear down
    pub fn claim(&mut self) -> Option<u32> {
        if self.phase != GamePhase::GameOver {
            log::warn!("Ignoring claim in phase {:?}", self.phase);
            return None;
        }
        let final_score = self.score();
        self.session = None;
        self.frame_loop.cancel();
        self.set_phase(GamePhase::Exited);
        self.events.push(GameEvent::Claimed { final_score });

        if let Some(on_complete) = self.on_complete.take() {
            log::info!("Score claimed: {}", final_score);
            on_complete(final_score);
        }
        Some(final_score)
    }

    /// Cancel the frame loop (view hidden or unmounted)
    pub fn stop(&mut self) {
        if self.frame_loop.is_active() {
            log::debug!("Frame loop stopped");
        }
        self.frame_loop.cancel();
    }

    /// Restart the frame loop of a stopped session
    pub fn resume(&mut self, now_ms: f64) -> Option<FrameTicket> {
        if self.phase != GamePhase::Playing || self.frame_loop.is_active() {
            return None;
        }
        // Time spent hidden doesn't count toward the next spawn
        if let Some(session) = self.session.as_mut() {
            session.last_spawn_ms = now_ms;
        }
        Some(self.frame_loop.begin())
    }

    /// Current HUD values
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.phase,
            score: self.score(),
        }
    }

    /// HUD values, only if they changed since the last call
    pub fn take_hud_update(&mut self) -> Option<HudSnapshot> {
        if std::mem::take(&mut self.hud_dirty) {
            Some(self.hud())
        } else {
            None
        }
    }

    /// Drain queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn on_loss(&mut self, loss: LossEvent) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.halt() {
            return;
        }
        self.frame_loop.cancel();
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::Lost {
            final_score: loss.final_score,
        });
        log::info!(
            "Target {} breached the boundary, final score {}",
            loss.target_id,
            loss.final_score
        );
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.hud_dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{DistractionKind, Palette};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    const VIEW: Viewport = Viewport {
        width: 600.0,
        height: 400.0,
    };

    fn game() -> Game {
        Game::new(Tuning::default(), 12345, |_| {})
    }

    fn target(x: f32, y: f32, radius: f32, speed: f32) -> Target {
        Target {
            id: 0,
            pos: Vec2::new(x, y),
            kind: DistractionKind::Fear,
            speed,
            radius,
            color: Palette::Yellow,
        }
    }

    #[test]
    fn test_start_to_playing() {
        let mut game = game();
        assert_eq!(game.phase(), GamePhase::Start);
        assert!(game.targets().is_empty());

        let ticket = game.start(0.0);
        assert!(ticket.is_some());
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score(), 0);
        assert!(game.is_loop_active());
        assert_eq!(game.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_start_while_playing_is_rejected() {
        let mut game = game();
        let first = game.start(0.0).unwrap();
        assert!(game.start(10.0).is_none());
        // Original loop keeps running
        assert_eq!(game.frame(first, 16.0, VIEW), FrameOutcome::Continue);
    }

    #[test]
    fn test_hit_scenario() {
        let mut game = game();
        let ticket = game.start(0.0).unwrap();
        game.session_mut()
            .unwrap()
            .push_target(target(300.0, 0.0, 30.0, 5.0));

        // Frames well inside the spawn interval so nothing else appears
        for i in 1..=6 {
            assert_eq!(game.frame(ticket, i as f64, VIEW), FrameOutcome::Continue);
        }
        assert_eq!(game.targets()[0].pos, Vec2::new(300.0, 30.0));

        assert!(game.click(300.0, 30.0).is_hit());
        assert_eq!(game.score(), 10);
        assert!(game.targets().is_empty());
        assert_eq!(game.particles().len(), 12);
        assert!(game.particles().iter().all(|p| p.pos == Vec2::new(300.0, 30.0)));

        assert_eq!(game.frame(ticket, 7.0, VIEW), FrameOutcome::Continue);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.targets().is_empty());
    }

    #[test]
    fn test_loss_scenario() {
        let mut game = game();
        let ticket = game.start(0.0).unwrap();
        game.session_mut()
            .unwrap()
            .push_target(target(200.0, 0.0, 30.0, 20.0));

        let mut lost_at = None;
        for step in 1..=20 {
            if game.frame(ticket, step as f64, VIEW) == FrameOutcome::Stop {
                lost_at = Some(step);
                break;
            }
        }
        assert!(lost_at.is_some_and(|s| s <= 20));
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(!game.session().unwrap().is_running());
        assert!(!game.is_loop_active());

        // Score frozen: clicks and stray frames do nothing
        let y = game.targets()[0].pos.y;
        assert_eq!(game.click(200.0, y), HitResult::Ignored);
        assert_eq!(game.frame(ticket, 100.0, VIEW), FrameOutcome::Stop);
        assert_eq!(game.score(), 0);
        assert_eq!(game.targets()[0].pos.y, y);

        let events = game.drain_events();
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::Lost { .. })).count(),
            1
        );
    }

    #[test]
    fn test_restart_resets_session() {
        let mut game = game();
        let ticket = game.start(0.0).unwrap();
        {
            let session = game.session_mut().unwrap();
            session.push_target(target(100.0, 350.0, 30.0, 60.0));
            session.push_target(target(400.0, 100.0, 30.0, 1.0));
        }
        assert!(game.click(400.0, 100.0).is_hit());
        assert_eq!(game.frame(ticket, 1.0, VIEW), FrameOutcome::Stop);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.score(), 10);

        let new_ticket = game.restart(50.0).unwrap();
        assert_ne!(new_ticket, ticket);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score(), 0);
        assert!(game.targets().is_empty());
        assert!(game.particles().is_empty());

        // The old loop stays dead
        assert_eq!(game.frame(ticket, 60.0, VIEW), FrameOutcome::Stop);
        assert_eq!(game.frame(new_ticket, 60.0, VIEW), FrameOutcome::Continue);
    }

    #[test]
    fn test_stop_revokes_ticket() {
        let mut game = game();
        let ticket = game.start(0.0).unwrap();
        game.session_mut()
            .unwrap()
            .push_target(target(100.0, 0.0, 30.0, 4.0));

        game.stop();
        assert_eq!(game.frame(ticket, 16.0, VIEW), FrameOutcome::Stop);
        assert_eq!(game.targets()[0].pos.y, 0.0);

        let resumed = game.resume(5000.0).unwrap();
        assert!(game.resume(5001.0).is_none());
        assert_eq!(game.frame(ticket, 5016.0, VIEW), FrameOutcome::Stop);
        assert_eq!(game.frame(resumed, 5016.0, VIEW), FrameOutcome::Continue);
        assert_eq!(game.targets()[0].pos.y, 4.0);
        // Hidden time didn't trigger a spawn
        assert_eq!(game.targets().len(), 1);
    }

    #[test]
    fn test_claim_invokes_callback_once() {
        let claimed = Rc::new(RefCell::new(Vec::new()));
        let sink = claimed.clone();
        let mut game = Game::new(Tuning::default(), 1, move |score| sink.borrow_mut().push(score));

        assert!(game.claim().is_none());

        let ticket = game.start(0.0).unwrap();
        {
            let session = game.session_mut().unwrap();
            session.push_target(target(100.0, 100.0, 30.0, 1.0));
            session.push_target(target(300.0, 390.0, 30.0, 20.0));
        }
        game.click(100.0, 100.0);
        game.frame(ticket, 1.0, VIEW);
        assert_eq!(game.phase(), GamePhase::GameOver);

        assert_eq!(game.claim(), Some(10));
        assert_eq!(game.phase(), GamePhase::Exited);
        assert!(game.session().is_none());
        assert!(game.claim().is_none());
        assert!(game.start(0.0).is_none());
        assert_eq!(*claimed.borrow(), vec![10]);
    }

    #[test]
    fn test_hud_updates_on_coarse_events_only() {
        let mut game = game();
        assert!(game.take_hud_update().is_some());
        assert!(game.take_hud_update().is_none());

        let ticket = game.start(0.0).unwrap();
        assert_eq!(
            game.take_hud_update(),
            Some(HudSnapshot {
                phase: GamePhase::Playing,
                score: 0
            })
        );

        game.session_mut()
            .unwrap()
            .push_target(target(100.0, 0.0, 30.0, 1.0));
        game.frame(ticket, 1.0, VIEW);
        assert!(game.take_hud_update().is_none());

        game.click(500.0, 300.0);
        assert!(game.take_hud_update().is_none());

        game.click(100.0, 1.0);
        assert_eq!(game.take_hud_update().map(|h| h.score), Some(10));
    }

    #[test]
    fn test_event_cues() {
        let mut game = game();
        game.start(0.0);
        game.session_mut()
            .unwrap()
            .push_target(target(100.0, 100.0, 30.0, 1.0));
        game.click(500.0, 300.0);
        game.click(100.0, 100.0);
        let cues: Vec<_> = game.drain_events().iter().filter_map(|e| e.cue()).collect();
        assert_eq!(cues, vec![SoundCue::Start, SoundCue::Click, SoundCue::Laser]);
    }

    #[test]
    fn test_spawns_over_time() {
        let mut game = game();
        let ticket = game.start(0.0).unwrap();
        let mut now = 0.0;
        while now < 3500.0 {
            now += 1000.0 / 60.0;
            assert_eq!(game.frame(ticket, now, VIEW), FrameOutcome::Continue);
        }
        assert_eq!(game.targets().len(), 3);
        let spawned = game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 3);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut game = game();
        let ticket = game.start(0.0).unwrap();
        game.click(10.0, 10.0);
        assert_eq!(game.drain_events().len(), 2);
        assert!(game.drain_events().is_empty());

        // Frames without spawns or hits queue nothing
        for i in 1..=30 {
            game.frame(ticket, i as f64, VIEW);
        }
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_frame_follows_viewport_changes() {
        let mut game = game();
        let ticket = game.start(0.0).unwrap();
        game.session_mut()
            .unwrap()
            .push_target(target(100.0, 190.0, 30.0, 5.0));

        assert_eq!(game.frame(ticket, 1.0, VIEW), FrameOutcome::Continue);

        // Canvas shrank mid-session: the new bottom edge applies at once
        let shrunk = Viewport::new(300.0, 200.0);
        assert_eq!(game.frame(ticket, 2.0, shrunk), FrameOutcome::Stop);
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut game = game();
            let ticket = game.start(0.0).unwrap();
            for frame in 1..=200 {
                game.frame(ticket, frame as f64 * 16.0, VIEW);
            }
            game.targets().to_vec()
        };
        assert_eq!(run(), run());
    }
}
