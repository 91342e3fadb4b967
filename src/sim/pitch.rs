//! Collision to note mapping
//!
//! Every mode produces a note index for a channel's inclusive range
//! `[start, end]`. Results above `end` are clamped down; nothing clamps from
//! below, so logarithmic mode can land under `start` for speeds below 1.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::LINE_LENGTH_STEP;

/// How a bounce picks its note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PitchMode {
    /// Uniformly random note in range
    Random,
    /// `|cos(speed)|` across the range
    Cosine,
    /// Longer segments sound lower
    LineLength,
    /// Speed squared, scaled so `max_velocity` reaches the top
    Exponential,
    /// `log10(speed)` across the range
    #[default]
    Logarithmic,
}

impl PitchMode {
    pub const ALL: [PitchMode; 5] = [
        PitchMode::Random,
        PitchMode::Cosine,
        PitchMode::LineLength,
        PitchMode::Exponential,
        PitchMode::Logarithmic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PitchMode::Random => "random",
            PitchMode::Cosine => "cosine",
            PitchMode::LineLength => "line-length",
            PitchMode::Exponential => "exponential",
            PitchMode::Logarithmic => "logarithmic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" => Some(PitchMode::Random),
            "cosine" | "cos" => Some(PitchMode::Cosine),
            "line-length" | "length" => Some(PitchMode::LineLength),
            "exponential" | "exp" => Some(PitchMode::Exponential),
            "logarithmic" | "log" => Some(PitchMode::Logarithmic),
            _ => None,
        }
    }

    /// Mapping function for this mode
    #[inline]
    fn mapper(self) -> MapFn {
        MAPPERS[self as usize]
    }
}

/// Everything a mapping function may look at
#[derive(Debug, Clone, Copy)]
pub struct PitchInput {
    /// Ball speed at the moment of collision
    pub speed: f32,
    /// Length of the segment that was hit
    pub segment_length: f32,
    pub start_pitch: u8,
    pub end_pitch: u8,
    /// Speed at which exponential mode reaches the top of the range
    pub max_velocity: f32,
}

impl PitchInput {
    /// Number of notes in the inclusive range
    #[inline]
    pub fn num_notes(&self) -> i32 {
        self.end_pitch as i32 - self.start_pitch as i32 + 1
    }

    /// `floor(fraction * num_notes) + start`, saturating on non-finite input
    #[inline]
    fn scaled(&self, fraction: f32) -> i32 {
        ((fraction * self.num_notes() as f32).floor() + self.start_pitch as f32) as i32
    }
}

type MapFn = fn(&PitchInput, &mut Pcg32) -> i32;

/// Indexed by `PitchMode as usize`; order must follow the enum declaration
const MAPPERS: [MapFn; 5] = [
    map_random,
    map_cosine,
    map_line_length,
    map_exponential,
    map_logarithmic,
];

fn map_random(input: &PitchInput, rng: &mut Pcg32) -> i32 {
    input.scaled(rng.random::<f32>())
}

fn map_cosine(input: &PitchInput, _rng: &mut Pcg32) -> i32 {
    input.scaled(input.speed.cos().abs())
}

fn map_line_length(input: &PitchInput, _rng: &mut Pcg32) -> i32 {
    let steps = (input.segment_length / LINE_LENGTH_STEP).floor() as i32;
    let idx = steps.clamp(0, input.num_notes() - 1);
    input.end_pitch as i32 - idx
}

fn map_exponential(input: &PitchInput, _rng: &mut Pcg32) -> i32 {
    let alpha = input.num_notes() as f32 / (input.max_velocity * input.max_velocity);
    ((alpha * input.speed * input.speed).floor() + input.start_pitch as f32) as i32
}

fn map_logarithmic(input: &PitchInput, _rng: &mut Pcg32) -> i32 {
    input.scaled(input.speed.log10())
}

/// Note index for a bounce, clamped to the top of the channel range
pub fn map_pitch(mode: PitchMode, input: &PitchInput, rng: &mut Pcg32) -> i32 {
    let raw = (mode.mapper())(input, rng);
    raw.min(input.end_pitch as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn input(speed: f32, segment_length: f32, start: u8, end: u8) -> PitchInput {
        PitchInput {
            speed,
            segment_length,
            start_pitch: start,
            end_pitch: end,
            max_velocity: 10.0,
        }
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_lookup_table_matches_modes() {
        // Line-length is the only mode that counts down from the top
        let i = input(5.0, 0.0, 10, 20);
        assert_eq!(map_pitch(PitchMode::LineLength, &i, &mut rng()), 20);
        for (idx, mode) in PitchMode::ALL.iter().enumerate() {
            assert_eq!(*mode as usize, idx);
        }
    }

    #[test]
    fn test_logarithmic() {
        // log10(10) = 1 -> whole range -> clamped to end
        assert_eq!(map_pitch(PitchMode::Logarithmic, &input(10.0, 0.0, 10, 19), &mut rng()), 19);
        // log10(1) = 0 -> start
        assert_eq!(map_pitch(PitchMode::Logarithmic, &input(1.0, 0.0, 10, 19), &mut rng()), 10);
        // log10(3.5) ~ 0.544 -> just past halfway
        assert_eq!(map_pitch(PitchMode::Logarithmic, &input(3.5, 0.0, 10, 19), &mut rng()), 15);
    }

    #[test]
    fn test_logarithmic_slow_ball_underflows_start() {
        // log10(0.1) = -1 -> one full range below start, left unclamped
        let note = map_pitch(PitchMode::Logarithmic, &input(0.1, 0.0, 30, 39), &mut rng());
        assert_eq!(note, 20);
    }

    #[test]
    fn test_logarithmic_zero_speed_does_not_panic() {
        let note = map_pitch(PitchMode::Logarithmic, &input(0.0, 0.0, 30, 39), &mut rng());
        assert!(note < 30);
    }

    #[test]
    fn test_cosine() {
        // cos(0) = 1 -> num_notes + start, clamped to end
        assert_eq!(map_pitch(PitchMode::Cosine, &input(0.0, 0.0, 5, 9), &mut rng()), 9);
        // cos(pi/2) ~ 0 -> start
        let quarter = std::f32::consts::FRAC_PI_2;
        assert_eq!(map_pitch(PitchMode::Cosine, &input(quarter, 0.0, 5, 9), &mut rng()), 5);
    }

    #[test]
    fn test_line_length() {
        let mode = PitchMode::LineLength;
        assert_eq!(map_pitch(mode, &input(1.0, 7.9, 10, 20), &mut rng()), 20);
        assert_eq!(map_pitch(mode, &input(1.0, 16.0, 10, 20), &mut rng()), 18);
        // Very long lines bottom out at start
        assert_eq!(map_pitch(mode, &input(1.0, 500.0, 10, 20), &mut rng()), 10);
    }

    #[test]
    fn test_exponential() {
        let mode = PitchMode::Exponential;
        assert_eq!(map_pitch(mode, &input(0.0, 0.0, 10, 19), &mut rng()), 10);
        // half of max velocity -> quarter of the range
        assert_eq!(map_pitch(mode, &input(5.0, 0.0, 10, 29), &mut rng()), 15);
        // faster than max -> clamped
        assert_eq!(map_pitch(mode, &input(50.0, 0.0, 10, 29), &mut rng()), 29);
    }

    #[test]
    fn test_random_is_seeded() {
        let i = input(3.0, 10.0, 0, 83);
        let a: Vec<i32> = {
            let mut r = rng();
            (0..16).map(|_| map_pitch(PitchMode::Random, &i, &mut r)).collect()
        };
        let b: Vec<i32> = {
            let mut r = rng();
            (0..16).map(|_| map_pitch(PitchMode::Random, &i, &mut r)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_note_range() {
        for mode in PitchMode::ALL {
            let note = map_pitch(mode, &input(2.0, 40.0, 12, 12), &mut rng());
            assert!(note <= 12, "{mode:?} gave {note}");
        }
    }

    #[test]
    fn test_mode_names_roundtrip() {
        for mode in PitchMode::ALL {
            assert_eq!(PitchMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(PitchMode::from_str("sine"), None);
    }

    proptest! {
        #[test]
        fn prop_never_above_end(
            speed in 0.0f32..100.0,
            length in 0.0f32..700.0,
            start in 0u8..40,
            span in 0u8..40,
            mode_idx in 0usize..5,
            seed in any::<u64>(),
        ) {
            let end = start + span;
            let mut r = Pcg32::seed_from_u64(seed);
            let note = map_pitch(PitchMode::ALL[mode_idx], &input(speed, length, start, end), &mut r);
            prop_assert!(note <= end as i32);
        }

        #[test]
        fn prop_random_within_range(start in 0u8..40, span in 0u8..40, seed in any::<u64>()) {
            let end = start + span;
            let mut r = Pcg32::seed_from_u64(seed);
            let note = map_pitch(PitchMode::Random, &input(1.0, 1.0, start, end), &mut r);
            prop_assert!(note >= start as i32 && note <= end as i32);
        }
    }
}
