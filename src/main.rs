//! Soundbars entry point
//!
//! Handles platform-specific initialization and drives the session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use soundbars::audio::WebAudioVoices;
    use soundbars::platform::FrameTimer;
    use soundbars::platform::web::BrowserInterval;
    use soundbars::renderer::CanvasRenderer;
    use soundbars::sim::{Command, Key, PitchMode};
    use soundbars::{InstrumentId, Session, Settings};

    /// Everything one tick touches
    struct App {
        session: Session,
        renderer: CanvasRenderer,
        voices: WebAudioVoices,
        /// Last settings written to LocalStorage
        saved: Settings,
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
        static TIMER: RefCell<Option<FrameTimer<BrowserInterval>>> = const { RefCell::new(None) };
    }

    /// Queue a command for the next tick
    fn push(cmd: Command) {
        APP.with(|app| {
            if let Some(app) = app.borrow().as_ref() {
                app.borrow_mut().session.push(cmd);
            }
        });
    }

    /// Timer callback: one simulation tick
    fn frame(app: &Rc<RefCell<App>>) {
        let interval = {
            let mut guard = app.borrow_mut();
            let App {
                session,
                renderer,
                voices,
                saved,
            } = &mut *guard;

            session.step(voices, renderer);

            if *session.settings() != *saved {
                session.settings().save();
                *saved = session.settings().clone();
            }
            session.take_interval_change()
        };

        if let Some(ms) = interval {
            TIMER.with(|timer| {
                if let Some(timer) = timer.borrow_mut().as_mut() {
                    timer.ensure_interval(ms);
                }
            });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Soundbars starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("sbCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Canvas #sbCanvas not found");
            return;
        };

        let settings = Settings::load();
        canvas.set_width(settings.width as u32);
        canvas.set_height(settings.height as u32);

        let Some(renderer) = CanvasRenderer::new(&canvas) else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        log::info!("Session initialized with seed: {}", seed);

        let interval_ms = settings.frame_interval_ms();
        let app = Rc::new(RefCell::new(App {
            session: Session::with_settings(settings.clone(), seed),
            renderer,
            voices: WebAudioVoices::new(),
            saved: settings,
        }));
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        setup_input_handlers(&canvas, app.clone());

        let mut timer = FrameTimer::new(BrowserInterval::new(move || frame(&app)));
        timer.restart(interval_ms);
        TIMER.with(|slot| *slot.borrow_mut() = Some(timer));

        log::info!("Soundbars running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Click - draw lines, or pick/place in edit mode
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                // Audio may only start after a user gesture
                a.voices.resume();
                a.session.push(Command::Click {
                    pos: Vec2::new(event.offset_x() as f32, event.offset_y() as f32),
                });
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - draft line preview and dragging picks
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().session.push(Command::MouseMove {
                    pos: Vec2::new(event.offset_x() as f32, event.offset_y() as f32),
                });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Keyboard - space pauses, backspace deletes, shift enters edit mode,
        // digits select a channel
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut a = app.borrow_mut();
                if let Some(k) = Key::from_dom_key(&key) {
                    if k != Key::Shift {
                        // Keep the page from scrolling or navigating back
                        event.prevent_default();
                    }
                    a.session.push(Command::KeyDown(k));
                } else if let Some(n) = key.parse::<usize>().ok().filter(|n| *n > 0) {
                    if let Some(id) = a.session.state.channels.get(n - 1).map(|c| c.id) {
                        a.session.push(Command::SelectChannel(id));
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(k) = Key::from_dom_key(&event.key()) {
                    app.borrow_mut().session.push(Command::KeyUp(k));
                }
            });
            let _ =
                document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    // Host page controls. The page owns the widgets; these only queue commands.

    #[wasm_bindgen]
    pub fn set_pitch_mode(name: &str) {
        match PitchMode::from_str(name) {
            Some(mode) => push(Command::SetPitchMode(mode)),
            None => log::warn!("Unknown pitch mode: {name}"),
        }
    }

    #[wasm_bindgen]
    pub fn set_frame_rate(rate: u32) {
        push(Command::SetFrameRate(rate));
    }

    #[wasm_bindgen]
    pub fn set_gravity(gravity: f32) {
        push(Command::SetGravity(gravity));
    }

    #[wasm_bindgen]
    pub fn set_collision_threshold(threshold: f32) {
        push(Command::SetCollisionThreshold(threshold));
    }

    #[wasm_bindgen]
    pub fn set_drop_cadence(ticks: u32) {
        push(Command::SetDropCadence(ticks as u64));
    }

    #[wasm_bindgen]
    pub fn add_channel(color: String, instrument: &str) {
        let instrument = InstrumentId::from_str(instrument).unwrap_or_default();
        push(Command::AddChannel { color, instrument });
    }

    #[wasm_bindgen]
    pub fn delete_channel() {
        push(Command::DeleteChannel);
    }

    #[wasm_bindgen]
    pub fn set_channel_color(color: String) {
        push(Command::SetChannelColor(color));
    }

    #[wasm_bindgen]
    pub fn set_channel_instrument(instrument: &str) {
        match InstrumentId::from_str(instrument) {
            Some(inst) => push(Command::SetChannelInstrument(inst)),
            None => log::warn!("Unknown instrument: {instrument}"),
        }
    }

    #[wasm_bindgen]
    pub fn set_channel_range(start: u8, end: u8) {
        push(Command::SetPitchRange { start, end });
    }

    #[wasm_bindgen]
    pub fn clear_balls() {
        push(Command::ClearBalls);
    }

    #[wasm_bindgen]
    pub fn set_volume(volume: f32) {
        APP.with(|app| {
            if let Some(app) = app.borrow().as_ref() {
                app.borrow_mut().voices.set_master_volume(volume);
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Soundbars (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Build a small scene and print the notes it plays
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use glam::Vec2;
    use soundbars::sim::Command;
    use soundbars::{NoteRecorder, RenderSink, SceneView, Session};

    struct NoDisplay;

    impl RenderSink for NoDisplay {
        fn draw(&mut self, _scene: &SceneView<'_>) {}
    }

    let mut session = Session::new(42);
    session.push(Command::SetDropCadence(120));

    // A ramp under the default dropper, then a catch line further right
    let lines: [((f32, f32), (f32, f32)); 2] = [
        ((10.0, 40.0), (90.0, 70.0)),
        ((100.0, 140.0), (220.0, 120.0)),
    ];
    for (a, b) in lines {
        session.push(Command::Click { pos: Vec2::from(a) });
        session.push(Command::Click { pos: Vec2::from(b) });
    }

    let mut audio = NoteRecorder::new();
    let mut display = NoDisplay;
    let mut bounces = 0;
    for _ in 0..2_000 {
        bounces += session.step(&mut audio, &mut display).len();
    }

    let notes = audio.drain();
    println!(
        "{} ticks, {} bounces, {} balls alive",
        session.state.frame_counter,
        bounces,
        session.state.balls.len()
    );
    for played in notes.iter().take(12) {
        println!(
            "  {:>8} {:>4} {:>8.2} Hz",
            played.instrument.as_str(),
            played.note.label(),
            played.note.frequency_hz()
        );
    }
}
