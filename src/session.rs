//! Session controller
//!
//! Owns the simulation state, the settings and the input queue. Input
//! handlers only enqueue [`Command`]s; [`Session::step`] applies the queue at
//! the start of the tick, advances the simulation, sends every bounce to the
//! audio collaborator and finally hands the scene to the renderer.

use std::collections::VecDeque;

use crate::audio::NoteSink;
use crate::renderer::{RenderSink, SceneView};
use crate::settings::Settings;
use crate::sim::{Bounce, Command, Key, SimState, scene, tick};

pub struct Session {
    pub state: SimState,
    settings: Settings,
    queue: VecDeque<Command>,
    /// Set when the tick interval changed and the host timer must restart
    interval_changed: bool,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::with_settings(Settings::default(), seed)
    }

    pub fn with_settings(settings: Settings, seed: u64) -> Self {
        Self {
            state: SimState::new(seed),
            settings: settings.sanitized(),
            queue: VecDeque::new(),
            interval_changed: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Queue a command for the next tick
    pub fn push(&mut self, cmd: Command) {
        self.queue.push_back(cmd);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// New tick interval if it changed since the last call
    pub fn take_interval_change(&mut self) -> Option<u32> {
        if std::mem::take(&mut self.interval_changed) {
            Some(self.settings.frame_interval_ms())
        } else {
            None
        }
    }

    pub fn view(&self) -> SceneView<'_> {
        SceneView::new(&self.state, &self.settings)
    }

    /// Run one tick: commands, simulation, audio, render
    pub fn step<A, R>(&mut self, audio: &mut A, renderer: &mut R) -> Vec<Bounce>
    where
        A: NoteSink + ?Sized,
        R: RenderSink + ?Sized,
    {
        while let Some(cmd) = self.queue.pop_front() {
            self.apply(cmd);
        }

        let bounces = tick(&mut self.state, &self.settings);
        for bounce in &bounces {
            if let Some((instrument, note)) = bounce.note {
                audio.trigger(instrument, note, self.settings.note_duration);
            }
        }

        renderer.draw(&self.view());
        bounces
    }

    /// Apply a command immediately
    pub fn apply(&mut self, cmd: Command) {
        let state = &mut self.state;
        match cmd {
            Command::Click { pos } => scene::click(state, pos, self.settings.pick_radius),
            Command::MouseMove { pos } => scene::mouse_move(state, pos),
            Command::KeyDown(key) => self.key_down(key),
            Command::KeyUp(key) => state.held_keys.set(key, false),
            Command::TogglePause => self.toggle_pause(),
            Command::ClearBalls => {
                log::info!("Cleared {} ball(s)", state.balls.len());
                state.balls.clear();
            }
            Command::SelectChannel(id) => scene::select_channel(state, id),
            Command::AddChannel { color, instrument } => {
                scene::add_channel(state, color, instrument);
            }
            Command::DeleteChannel => {
                scene::delete_current_channel(state);
            }
            Command::SetChannelColor(color) => scene::set_channel_color(state, color),
            Command::SetChannelInstrument(inst) => scene::set_channel_instrument(state, inst),
            Command::SetStartPitch(p) => scene::set_start_pitch(state, p),
            Command::SetEndPitch(p) => scene::set_end_pitch(state, p),
            Command::SetPitchRange { start, end } => scene::set_pitch_range(state, start, end),
            Command::SetPitchMode(mode) => {
                log::info!("Pitch mode: {}", mode.as_str());
                self.update_settings(Settings {
                    pitch_mode: mode,
                    ..self.settings.clone()
                });
            }
            Command::SetGravity(gravity) => self.update_settings(Settings {
                gravity,
                ..self.settings.clone()
            }),
            Command::SetCollisionThreshold(collision_threshold) => {
                self.update_settings(Settings {
                    collision_threshold,
                    ..self.settings.clone()
                })
            }
            Command::SetDropCadence(drop_cadence_ticks) => self.update_settings(Settings {
                drop_cadence_ticks,
                ..self.settings.clone()
            }),
            Command::SetFrameRate(frame_rate) => self.update_settings(Settings {
                frame_rate,
                ..self.settings.clone()
            }),
            Command::Resize { width, height } => self.update_settings(Settings {
                width,
                height,
                ..self.settings.clone()
            }),
            Command::UpdateSettings(settings) => self.update_settings(settings),
        }
    }

    fn key_down(&mut self, key: Key) {
        // Ignore auto-repeat
        if self.state.held_keys.is_held(key) {
            return;
        }
        self.state.held_keys.set(key, true);

        // Shift is also the edit-mode modifier: with it still held after a
        // pick, Backspace pops a dropper and leaves the pick alone
        match key {
            Key::Space => self.toggle_pause(),
            Key::Backspace if self.state.held_keys.shift() => scene::pop_dropper(&mut self.state),
            Key::Backspace => scene::backspace(&mut self.state),
            Key::Shift => {}
        }
    }

    fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;
        log::info!("{}", if self.state.paused { "Paused" } else { "Resumed" });
    }

    fn update_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        if settings != self.settings {
            log::info!("Settings updated");
        }
        if settings.frame_interval_ms() != self.settings.frame_interval_ms() {
            self.interval_changed = true;
        }
        self.settings = settings;
    }
}
