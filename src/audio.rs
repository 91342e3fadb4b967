//! Notes and the audio-trigger collaborator
//!
//! The simulation only decides *which* note a bounce plays. Sounding it is up
//! to a [`NoteSink`]: WebAudio oscillators in the browser, a recorder in tests
//! and the headless demo.

/// Number of notes in the table (C1..B7)
pub const NOTE_COUNT: u8 = 84;
/// Highest valid note index
pub const MAX_NOTE: u8 = NOTE_COUNT - 1;

/// MIDI number of note index 0 (C1)
const MIDI_OFFSET: i32 = 24;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A note from the table, addressed by index
///
/// Indices outside the table are allowed (slow bounces in logarithmic mode go
/// below the channel range); they still have a frequency but no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note(pub i32);

impl Note {
    #[inline]
    pub fn index(&self) -> i32 {
        self.0
    }

    /// Whether the index is inside the note table
    pub fn in_table(&self) -> bool {
        (0..NOTE_COUNT as i32).contains(&self.0)
    }

    /// Scientific pitch name (`C4`, `F#2`), `None` outside the table
    pub fn name(&self) -> Option<String> {
        if !self.in_table() {
            return None;
        }
        let midi = self.0 + MIDI_OFFSET;
        let octave = midi / 12 - 1;
        Some(format!("{}{}", NOTE_NAMES[(midi % 12) as usize], octave))
    }

    /// Equal-tempered frequency, A4 = 440 Hz
    pub fn frequency_hz(&self) -> f32 {
        let midi = self.0 as f64 + MIDI_OFFSET as f64;
        (440.0 * 2f64.powf((midi - 69.0) / 12.0)) as f32
    }

    /// Label for display: the note name or `--`
    pub fn label(&self) -> String {
        self.name().unwrap_or_else(|| "--".to_string())
    }
}

/// Voice a channel plays through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstrumentId {
    #[default]
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl InstrumentId {
    pub const ALL: [InstrumentId; 4] = [
        InstrumentId::Sine,
        InstrumentId::Triangle,
        InstrumentId::Square,
        InstrumentId::Sawtooth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentId::Sine => "sine",
            InstrumentId::Triangle => "triangle",
            InstrumentId::Square => "square",
            InstrumentId::Sawtooth => "sawtooth",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sine" => Some(InstrumentId::Sine),
            "triangle" | "tri" => Some(InstrumentId::Triangle),
            "square" => Some(InstrumentId::Square),
            "sawtooth" | "saw" => Some(InstrumentId::Sawtooth),
            _ => None,
        }
    }
}

/// Audio-trigger collaborator
///
/// Fire-and-forget: the simulation never waits on playback and never sees
/// backend errors.
pub trait NoteSink {
    fn trigger(&mut self, instrument: InstrumentId, note: Note, duration: f32);
}

/// A single recorded trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggeredNote {
    pub instrument: InstrumentId,
    pub note: Note,
    pub duration: f32,
}

/// Sink that keeps every trigger (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct NoteRecorder {
    pub notes: Vec<TriggeredNote>,
}

impl NoteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far
    pub fn drain(&mut self) -> Vec<TriggeredNote> {
        std::mem::take(&mut self.notes)
    }
}

impl NoteSink for NoteRecorder {
    fn trigger(&mut self, instrument: InstrumentId, note: Note, duration: f32) {
        log::debug!(
            "note {} ({:.1} Hz) on {}",
            note.label(),
            note.frequency_hz(),
            instrument.as_str()
        );
        self.notes.push(TriggeredNote {
            instrument,
            note,
            duration,
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioVoices;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{InstrumentId, Note, NoteSink};

    /// Lowest frequency worth handing to an oscillator
    const MIN_AUDIBLE_HZ: f32 = 16.0;

    /// Oscillator-per-note voices on a shared AudioContext
    pub struct WebAudioVoices {
        ctx: Option<AudioContext>,
        master_volume: f32,
    }

    impl Default for WebAudioVoices {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioVoices {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.6,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        fn oscillator_type(instrument: InstrumentId) -> OscillatorType {
            match instrument {
                InstrumentId::Sine => OscillatorType::Sine,
                InstrumentId::Triangle => OscillatorType::Triangle,
                InstrumentId::Square => OscillatorType::Square,
                InstrumentId::Sawtooth => OscillatorType::Sawtooth,
            }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl NoteSink for WebAudioVoices {
        fn trigger(&mut self, instrument: InstrumentId, note: Note, duration: f32) {
            if self.master_volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            let freq = note.frequency_hz();
            if !freq.is_finite() || freq < MIN_AUDIBLE_HZ {
                log::debug!("Skipping inaudible note index {}", note.index());
                return;
            }

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = Self::create_osc(ctx, freq, Self::oscillator_type(instrument))
            else {
                return;
            };
            let t = ctx.current_time();
            let end = t + duration.max(0.05) as f64;

            gain.gain().set_value_at_time(self.master_volume * 0.3, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();

            osc.start().ok();
            osc.stop_with_when(end + 0.02).ok();
        }
    }
}
