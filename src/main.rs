//! Distraction Defense entry point
//!
//! Browser: drives the simulation from requestAnimationFrame and draws to a
//! canvas. Native: plays a headless session with a scripted clicker.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent};

    use distraction_defense::Reward;
    use distraction_defense::Tuning;
    use distraction_defense::renderer::{CanvasPainter, scene};
    use distraction_defense::sim::{
        FrameOutcome, FrameTicket, Game, GamePhase, HudSnapshot, Viewport,
    };

    // Hands the claimed reward back to the dashboard page
    #[wasm_bindgen(inline_js = "
        export function notify_complete(score, xp, coins) {
            window.dispatchEvent(new CustomEvent('arcade-complete', {
                detail: { score, xp, coins },
            }));
        }
    ")]
    extern "C" {
        fn notify_complete(score: u32, xp: u32, coins: u32);
    }

    /// Browser-side game instance
    struct Host {
        game: Game,
        painter: CanvasPainter,
        viewport: Viewport,
    }

    impl Host {
        fn resize(&mut self) {
            let (w, h) = self.painter.fit_to_layout();
            self.viewport = Viewport::new(w, h);
        }

        fn render(&self) {
            let cmds = scene(self.game.targets(), self.game.particles(), self.viewport);
            if let Err(e) = self.painter.paint(&cmds) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Push HUD changes into the DOM and log feedback cues
        fn sync_ui(&mut self) {
            for event in self.game.drain_events() {
                if let Some(cue) = event.cue() {
                    log::debug!("Cue {:?} for {:?}", cue, event);
                }
            }
            if let Some(hud) = self.game.take_hud_update() {
                update_hud(&hud);
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn update_hud(hud: &HudSnapshot) {
        let Some(document) = document() else {
            return;
        };

        if let Some(el) = document.get_element_by_id("arcade-score") {
            el.set_text_content(Some(&hud.score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&hud.score.to_string()));
        }

        set_hidden(&document, "start-screen", hud.phase != GamePhase::Start);
        set_hidden(&document, "gameover-screen", hud.phase != GamePhase::GameOver);
        if hud.phase == GamePhase::Exited {
            set_hidden(&document, "arcade", true);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Distraction Defense starting...");

        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id("arcade-canvas")
            .ok_or_else(|| JsValue::from_str("missing #arcade-canvas"))?
            .dyn_into::<HtmlCanvasElement>()?;

        let tuning = Tuning::load();
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(tuning, seed, |score| {
            let reward = Reward::for_score(score);
            log::info!(
                "Claimed {} points: {} XP, {} coins",
                score,
                reward.xp,
                reward.coins
            );
            notify_complete(score, reward.xp, reward.coins);
        });

        let painter = CanvasPainter::new(canvas)?;
        let host = Rc::new(RefCell::new(Host {
            game,
            painter,
            viewport: Viewport::new(1.0, 1.0),
        }));
        {
            let mut h = host.borrow_mut();
            h.resize();
            h.render();
            h.sync_ui();
        }

        setup_canvas_click(host.clone())?;
        setup_button("start-btn", host.clone(), |game, now| game.start(now))?;
        setup_button("restart-btn", host.clone(), |game, now| game.restart(now))?;
        setup_claim_button(host.clone())?;
        setup_resize(host.clone())?;
        setup_auto_stop(host)?;

        log::info!("Distraction Defense ready (seed {})", seed);
        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>, ticket: FrameTicket) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, ticket, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, ticket: FrameTicket, time: f64) {
        let outcome = {
            let mut h = host.borrow_mut();
            let viewport = h.viewport;
            let outcome = h.game.frame(ticket, time, viewport);
            h.render();
            h.sync_ui();
            outcome
        };

        if outcome == FrameOutcome::Continue {
            request_animation_frame(host, ticket);
        }
    }

    fn setup_canvas_click(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let canvas = host.borrow().painter.canvas().clone();
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let x = (event.client_x() as f64 - rect.left()) as f32;
            let y = (event.client_y() as f64 - rect.top()) as f32;
            let mut h = host.borrow_mut();
            h.game.click(x, y);
            h.sync_ui();
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Wire a button that (re)starts the session and its frame loop
    fn setup_button(
        id: &str,
        host: Rc<RefCell<Host>>,
        action: fn(&mut Game, f64) -> Option<FrameTicket>,
    ) -> Result<(), JsValue> {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Button #{} not found", id);
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let ticket = {
                let mut h = host.borrow_mut();
                h.resize();
                let ticket = action(&mut h.game, now_ms());
                h.sync_ui();
                ticket
            };
            if let Some(ticket) = ticket {
                request_animation_frame(host.clone(), ticket);
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_claim_button(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("claim-btn")) else {
            log::warn!("Button #claim-btn not found");
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut h = host.borrow_mut();
            h.game.claim();
            h.sync_ui();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Keep the viewport in step with the canvas layout size
    fn setup_resize(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut h = host.borrow_mut();
            h.resize();
            // Resizing the backing store clears it
            h.render();
            log::debug!("Viewport resized to {:?}", h.viewport);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Stop the frame loop while hidden or unloading; resume when visible
    fn setup_auto_stop(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;

        {
            let host = host.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    host.borrow_mut().game.stop();
                    log::info!("Frame loop stopped (tab hidden)");
                } else {
                    let ticket = host.borrow_mut().game.resume(now_ms());
                    if let Some(ticket) = ticket {
                        log::info!("Frame loop resumed");
                        request_animation_frame(host.clone(), ticket);
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                host.borrow_mut().game.stop();
            });
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().inspect_err(|e| log::error!("Startup failed: {:?}", e))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::Cell;
    use std::path::Path;
    use std::rc::Rc;

    use distraction_defense::sim::{FrameOutcome, Game, GamePhase, Viewport};
    use distraction_defense::{Reward, Tuning};

    /// Frames between scripted clicks
    const CLICK_EVERY: u64 = 45;
    /// Give up after ten minutes of 60 Hz frames
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Distraction Defense (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load_file(Path::new(&path)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let claimed = Rc::new(Cell::new(None));
    let sink = claimed.clone();
    let mut game = Game::new(tuning, 42, move |score| sink.set(Some(score)));
    let viewport = Viewport::new(600.0, 500.0);

    let frame_ms = 1000.0 / 60.0;
    let Some(ticket) = game.start(0.0) else {
        log::error!("Failed to start session");
        return;
    };

    let mut frame = 0;
    while frame < MAX_FRAMES {
        frame += 1;
        let now = frame as f64 * frame_ms;

        // Shoot whatever is closest to the boundary
        if frame % CLICK_EVERY == 0 {
            let lowest = game
                .targets()
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|t| t.pos);
            if let Some(pos) = lowest {
                game.click(pos.x, pos.y);
            }
        }

        let outcome = game.frame(ticket, now, viewport);
        for event in game.drain_events() {
            if let Some(cue) = event.cue() {
                log::debug!("Cue {:?} for {:?}", cue, event);
            }
        }
        if outcome == FrameOutcome::Stop {
            break;
        }
    }

    if game.phase() == GamePhase::GameOver {
        game.claim();
    }

    match claimed.get() {
        Some(score) => {
            let reward = Reward::for_score(score);
            println!(
                "Breached after {} frames. Score {} -> {} XP, {} coins",
                frame, score, reward.xp, reward.coins
            );
        }
        None => println!(
            "Survived {} frames with score {}",
            frame,
            game.score()
        ),
    }
}
