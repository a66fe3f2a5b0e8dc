//! Color harmony rules
//!
//! A harmony is a fixed set of hue offsets (degrees) around the channel's
//! primary hue. Every harmony-based effect picks its colors from one of
//! these tables, with a small analogous jitter so neighbouring pixels of
//! the same group never look perfectly flat.
//!
//! The primary hue (offset 0) always desaturates to white; secondary hues
//! are fully saturated.

use rand::Rng;
use rand_core::RngCore;

use crate::color::{Hsv, hsv};
use crate::math8::hue8;

/// Analogous spread width in degrees (jitter is `±ANGLE_WIDTH / 2`)
pub const ANGLE_WIDTH: i32 = 10;

/// Saturation used whenever the primary hue is chosen
pub const PRIMARY_HUE_SAT: u8 = 0;

const SPREAD_SAMPLES: i32 = 6;

const OFFSETS_MONOCHROMATIC: [i32; 1] = [0];
const OFFSETS_COMPLEMENTARY: [i32; 2] = [0, 180];
const OFFSETS_SPLIT_COMPLEMENTARY: [i32; 3] = [0, 150, 210];
const OFFSETS_TRIADIC: [i32; 3] = [0, 120, 240];
const OFFSETS_SQUARE: [i32; 4] = [0, 90, 180, 270];
const OFFSETS_TETRADIC: [i32; 4] = [0, 60, 180, 240];

/// Known harmony tables
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Harmony {
    Monochromatic,
    Complementary,
    SplitComplementary,
    Triadic,
    Square,
    Tetradic,
}

impl Harmony {
    /// Hue offsets from the primary hue, primary first
    pub const fn offsets(self) -> &'static [i32] {
        match self {
            Self::Monochromatic => &OFFSETS_MONOCHROMATIC,
            Self::Complementary => &OFFSETS_COMPLEMENTARY,
            Self::SplitComplementary => &OFFSETS_SPLIT_COMPLEMENTARY,
            Self::Triadic => &OFFSETS_TRIADIC,
            Self::Square => &OFFSETS_SQUARE,
            Self::Tetradic => &OFFSETS_TETRADIC,
        }
    }

    /// Number of hues in the harmony
    pub const fn hue_count(self) -> usize {
        self.offsets().len()
    }
}

/// Analogous spread offset in degrees.
///
/// Mean of six uniform draws over `0..=ANGLE_WIDTH`, re-centered on zero:
/// an Irwin-Hall approximation of a normal distribution bounded to
/// `[-ANGLE_WIDTH / 2, ANGLE_WIDTH / 2]`.
pub fn generate_spread<R: RngCore>(rng: &mut R) -> i32 {
    let mut sum = 0;
    for _ in 0..SPREAD_SAMPLES {
        sum += rng.gen_range(0..=ANGLE_WIDTH);
    }
    sum / SPREAD_SAMPLES - ANGLE_WIDTH / 2
}

/// Pick one color from a harmony table.
///
/// One offset is chosen uniformly; the resulting hue gets a
/// [`generate_spread`] jitter. Value is always full.
pub fn pick_color<R: RngCore>(primary_degrees: u16, offsets: &[i32], rng: &mut R) -> Hsv {
    debug_assert!(!offsets.is_empty(), "harmony table must not be empty");

    let offset = offsets[rng.gen_range(0..offsets.len())];
    let hue = i32::from(primary_degrees) + offset + generate_spread(rng);
    let sat = if offset == 0 { PRIMARY_HUE_SAT } else { 255 };

    hsv(hue8(hue), sat, 255)
}

/// How pooled actors (runners, raindrops) choose their color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorPalette {
    /// Pick from the harmony table with [`pick_color`]
    Harmony(Harmony),
    /// Fifty-fifty black or white, ignoring the channel hue
    BlackOrWhite,
}

impl ActorPalette {
    /// Pick a color for a freshly spawned actor
    pub fn pick<R: RngCore>(self, primary_degrees: u16, rng: &mut R) -> Hsv {
        match self {
            Self::Harmony(harmony) => pick_color(primary_degrees, harmony.offsets(), rng),
            Self::BlackOrWhite => {
                if rng.gen_range(0..2) == 0 {
                    hsv(0, 0, 0)
                } else {
                    hsv(0, 0, 255)
                }
            }
        }
    }
}
