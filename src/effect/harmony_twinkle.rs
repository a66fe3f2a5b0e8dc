//! Harmony twinkle effect
//!
//! Twinkles over a fixed set of harmony hues. Instead of re-rolling the
//! hue every frame, each pixel gets a hue once (on activation and whenever
//! the channel hue or brightness changes):
//!
//! 1. the primary hue takes a brightness-scaled share of the strip
//! 2. the rest is split evenly among the secondary hues
//! 3. the whole assignment is shuffled so the groups are scattered
//!
//! The primary hue renders desaturated (white), so brighter settings look
//! whiter and dim settings show more color.

use embassy_time::Duration;
use rand::Rng;
use rand_core::RngCore;

use super::twinkle::{TwinkleField, TwinkleReroll};
use super::{ChannelInputs, Effect, FrameClock};
use crate::color::{Harmony, PRIMARY_HUE_SAT, generate_spread, hsv, hsv2rgb};
use crate::math8::{hue8, lerp_percent};
use crate::strip::{CHANNEL_COUNT, PixelFrame};

/// Largest harmony table size
pub const MAX_HARMONY_HUES: usize = 4;

const HARMONY_DENSITY: u8 = 16;
const HARMONY_FADE_STEP: u8 = 8;

/// Primary hue share of the strip, linear in channel brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryShare {
    /// Share at brightness 0
    pub min_percent: u8,
    /// Share at brightness 100
    pub max_percent: u8,
}

impl Default for PrimaryShare {
    fn default() -> Self {
        Self::new(5, 95)
    }
}

impl PrimaryShare {
    pub const fn new(min_percent: u8, max_percent: u8) -> Self {
        Self {
            min_percent,
            max_percent,
        }
    }

    /// Share in per-mille for a brightness percent (clamped to 100)
    #[allow(clippy::cast_sign_loss, clippy::cast_lossless)]
    pub const fn permille(&self, brightness: u8) -> u32 {
        let min = self.min_percent as i32 * 10;
        let max = self.max_percent as i32 * 10;
        let permille = lerp_percent(min, max, brightness);
        if permille < 0 {
            0
        } else if permille > 1000 {
            1000
        } else {
            permille as u32
        }
    }
}

/// Split `len` pixels into harmony groups, primary first.
///
/// The primary group gets `round(len · permille / 1000)` pixels, the others
/// get an even share of the rest and the division remainder goes back to
/// the primary. Groups past `hue_count` are 0, and the groups always sum
/// to `len`.
#[allow(clippy::cast_possible_truncation)]
pub fn partition_counts(
    len: usize,
    hue_count: usize,
    primary_permille: u32,
) -> [usize; MAX_HARMONY_HUES] {
    debug_assert!(
        (1..=MAX_HARMONY_HUES).contains(&hue_count),
        "harmony must have 1..=4 hues"
    );

    let mut counts = [0; MAX_HARMONY_HUES];
    let hue_count = hue_count.clamp(1, MAX_HARMONY_HUES);
    let permille = primary_permille.min(1000) as usize;

    if hue_count == 1 {
        counts[0] = len;
        return counts;
    }

    let primary = ((len * permille + 500) / 1000).min(len);
    let secondaries = hue_count - 1;
    let secondary = (len - primary) / secondaries;

    counts[0] = len - secondary * secondaries;
    for count in &mut counts[1..hue_count] {
        *count = secondary;
    }
    counts
}

/// Twinkle over pre-assigned, shuffled harmony hues
#[derive(Debug, Clone)]
pub struct HarmonyTwinkleEffect<const N: usize> {
    field: TwinkleField<N>,
    harmony: Harmony,
    share: PrimaryShare,
    inputs: ChannelInputs,
    hues: [[u8; N]; CHANNEL_COUNT],
    sats: [[u8; N]; CHANNEL_COUNT],
    clock: FrameClock,
}

impl<const N: usize> HarmonyTwinkleEffect<N> {
    pub fn new(harmony: Harmony, share: PrimaryShare, frame_duration: Duration) -> Self {
        Self {
            field: TwinkleField::new(HARMONY_DENSITY, HARMONY_FADE_STEP, TwinkleReroll::Cubic),
            harmony,
            share,
            inputs: ChannelInputs::default(),
            hues: [[0; N]; CHANNEL_COUNT],
            sats: [[0; N]; CHANNEL_COUNT],
            clock: FrameClock::new(frame_duration),
        }
    }

    pub const fn harmony(&self) -> Harmony {
        self.harmony
    }

    /// Assigned (hue, saturation) of a pixel
    pub fn assignment(&self, channel: usize, index: usize) -> (u8, u8) {
        (self.hues[channel][index], self.sats[channel][index])
    }

    /// Number of pixels of a channel assigned to the desaturated primary
    pub fn primary_count(&self, channel: usize) -> usize {
        self.sats[channel]
            .iter()
            .filter(|&&sat| sat == PRIMARY_HUE_SAT)
            .count()
    }

    pub fn brightness(&self, channel: usize, index: usize) -> u8 {
        self.field.brightness(channel, index)
    }

    fn assign<R: RngCore>(&mut self, channel: usize, rng: &mut R) {
        let offsets = self.harmony.offsets();
        let permille = self.share.permille(self.inputs.brightnesses[channel]);
        let counts = partition_counts(N, offsets.len(), permille);
        let primary = i32::from(self.inputs.hues[channel]);

        let hues = &mut self.hues[channel];
        let sats = &mut self.sats[channel];

        let mut index = 0;
        for (&offset, &count) in offsets.iter().zip(counts.iter()) {
            let sat = if offset == 0 { PRIMARY_HUE_SAT } else { 255 };
            for _ in 0..count {
                hues[index] = hue8(primary + offset + generate_spread(rng));
                sats[index] = sat;
                index += 1;
            }
        }

        // Fisher-Yates, hue and saturation move together
        for i in (1..N).rev() {
            let j = rng.gen_range(0..=i);
            hues.swap(i, j);
            sats.swap(i, j);
        }
    }
}

impl<const N: usize> Effect<N> for HarmonyTwinkleEffect<N> {
    fn name(&self) -> &'static str {
        match self.harmony {
            Harmony::Monochromatic => "Monochromatic Twinkle",
            Harmony::Complementary => "Complementary Twinkle",
            Harmony::SplitComplementary => "Split-Complementary Twinkle",
            Harmony::Triadic => "Triadic Twinkle",
            Harmony::Square => "Square Twinkle",
            Harmony::Tetradic => "Tetradic Twinkle",
        }
    }

    fn begin<R: RngCore>(&mut self, rng: &mut R) {
        self.reset();
        for channel in 0..CHANNEL_COUNT {
            self.assign(channel, rng);
        }
    }

    fn update<R: RngCore>(&mut self, delta: Duration, rng: &mut R) -> bool {
        if !self.clock.advance(delta) {
            return false;
        }
        self.field.step(rng);
        true
    }

    fn render<R: RngCore>(&mut self, frame: &mut PixelFrame<N>, _rng: &mut R) {
        for (channel, leds) in frame.channels_mut().iter_mut().enumerate() {
            for (i, led) in leds.iter_mut().enumerate() {
                let level = self.field.brightness(channel, i);
                *led = hsv2rgb(hsv(self.hues[channel][i], self.sats[channel][i], level));
            }
        }
    }

    fn reset(&mut self) {
        self.field.reset();
        self.hues = [[0; N]; CHANNEL_COUNT];
        self.sats = [[0; N]; CHANNEL_COUNT];
        self.clock.reset();
    }

    fn set_channel_hues<R: RngCore>(&mut self, hues: [u16; CHANNEL_COUNT], rng: &mut R) {
        for (channel, &hue) in hues.iter().enumerate() {
            if self.inputs.hues[channel] != hue {
                self.inputs.hues[channel] = hue;
                self.assign(channel, rng);
            }
        }
    }

    fn set_channel_brightnesses<R: RngCore>(
        &mut self,
        brightnesses: [u8; CHANNEL_COUNT],
        rng: &mut R,
    ) {
        for (channel, &brightness) in brightnesses.iter().enumerate() {
            if self.inputs.brightnesses[channel] != brightness {
                self.inputs.brightnesses[channel] = brightness;
                self.assign(channel, rng);
            }
        }
    }
}
