//! Twinkle effect
//!
//! Every pixel fades toward its own target brightness. Each frame a pixel
//! has a `1 / density` chance to pick a new target, so the strip sparkles
//! without any pixel ever jumping.
//!
//! This module holds the shared brightness field and the plain
//! (single-hue) variant. The plain variant re-rolls a small analogous
//! jitter for every pixel on every render, so the hue shimmers as well.

use embassy_time::Duration;
use rand::Rng;
use rand_core::RngCore;

use super::{ChannelInputs, Effect, FrameClock};
use crate::color::{generate_spread, hsv, hsv2rgb};
use crate::math8::hue8;
use crate::strip::{CHANNEL_COUNT, PixelFrame};

/// Dimmest twinkle level, a pixel is never fully dark
pub const TWINKLE_BASE_BRIGHTNESS: u8 = 20;

/// Brightest twinkle level
pub const TWINKLE_MAX_BRIGHTNESS: u8 = 255;

const PLAIN_DENSITY: u8 = 8;
const PLAIN_FADE_STEP: u8 = 15;

/// How a pixel draws its next target brightness
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwinkleReroll {
    /// Uniform over `[BASE, MAX)`
    Uniform,
    /// `BASE + r³ · (MAX - BASE)` with `r` uniform in `[0, 1)`
    Cubic,
}

impl TwinkleReroll {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw<R: RngCore>(self, rng: &mut R) -> u8 {
        match self {
            Self::Uniform => rng.gen_range(TWINKLE_BASE_BRIGHTNESS..TWINKLE_MAX_BRIGHTNESS),
            Self::Cubic => {
                let r = rng.gen_range(0..1000_u16) as f32 / 1000.0;
                let range = f32::from(TWINKLE_MAX_BRIGHTNESS - TWINKLE_BASE_BRIGHTNESS);
                TWINKLE_BASE_BRIGHTNESS + (r * r * r * range) as u8
            }
        }
    }
}

/// Move `current` one fade step toward `target`, never past it
#[inline]
pub fn fade_toward(current: u8, target: u8, step: u8) -> u8 {
    if current < target {
        current.saturating_add(step).min(target)
    } else if current > target {
        current.saturating_sub(step).max(target)
    } else {
        current
    }
}

/// Current/target brightness of every pixel on every channel
#[derive(Debug, Clone)]
pub struct TwinkleField<const N: usize> {
    current: [[u8; N]; CHANNEL_COUNT],
    target: [[u8; N]; CHANNEL_COUNT],
    density: u8,
    fade_step: u8,
    reroll: TwinkleReroll,
}

impl<const N: usize> TwinkleField<N> {
    pub const fn new(density: u8, fade_step: u8, reroll: TwinkleReroll) -> Self {
        Self {
            current: [[TWINKLE_BASE_BRIGHTNESS; N]; CHANNEL_COUNT],
            target: [[TWINKLE_BASE_BRIGHTNESS; N]; CHANNEL_COUNT],
            density,
            fade_step,
            reroll,
        }
    }

    /// Every pixel back to the base level, not fading
    pub fn reset(&mut self) {
        self.current = [[TWINKLE_BASE_BRIGHTNESS; N]; CHANNEL_COUNT];
        self.target = [[TWINKLE_BASE_BRIGHTNESS; N]; CHANNEL_COUNT];
    }

    /// Advance one frame: maybe re-roll targets, then fade
    pub fn step<R: RngCore>(&mut self, rng: &mut R) {
        for (current, target) in self.current.iter_mut().zip(self.target.iter_mut()) {
            for (level, goal) in current.iter_mut().zip(target.iter_mut()) {
                if rng.gen_range(0..self.density) == 0 {
                    *goal = self.reroll.draw(rng);
                }
                *level = fade_toward(*level, *goal, self.fade_step);
            }
        }
    }

    pub fn brightness(&self, channel: usize, index: usize) -> u8 {
        self.current[channel][index]
    }

    pub fn target(&self, channel: usize, index: usize) -> u8 {
        self.target[channel][index]
    }
}

/// Single-hue twinkle with per-frame analogous jitter
#[derive(Debug, Clone)]
pub struct TwinkleEffect<const N: usize> {
    field: TwinkleField<N>,
    inputs: ChannelInputs,
    clock: FrameClock,
}

impl<const N: usize> TwinkleEffect<N> {
    pub fn new(frame_duration: Duration) -> Self {
        Self {
            field: TwinkleField::new(PLAIN_DENSITY, PLAIN_FADE_STEP, TwinkleReroll::Uniform),
            inputs: ChannelInputs::default(),
            clock: FrameClock::new(frame_duration),
        }
    }

    /// Current twinkle level of a pixel
    pub fn brightness(&self, channel: usize, index: usize) -> u8 {
        self.field.brightness(channel, index)
    }

    pub const fn inputs(&self) -> &ChannelInputs {
        &self.inputs
    }
}

impl<const N: usize> Effect<N> for TwinkleEffect<N> {
    fn name(&self) -> &'static str {
        "Monochromatic Twinkle"
    }

    fn update<R: RngCore>(&mut self, delta: Duration, rng: &mut R) -> bool {
        if !self.clock.advance(delta) {
            return false;
        }
        self.field.step(rng);
        true
    }

    fn render<R: RngCore>(&mut self, frame: &mut PixelFrame<N>, rng: &mut R) {
        for (channel, leds) in frame.channels_mut().iter_mut().enumerate() {
            let base_hue = i32::from(self.inputs.hues[channel]);
            for (i, led) in leds.iter_mut().enumerate() {
                let hue = hue8(base_hue + generate_spread(rng));
                *led = hsv2rgb(hsv(hue, 255, self.field.brightness(channel, i)));
            }
        }
    }

    fn reset(&mut self) {
        self.field.reset();
        self.clock.reset();
    }

    fn set_channel_hues<R: RngCore>(&mut self, hues: [u16; CHANNEL_COUNT], _rng: &mut R) {
        self.inputs.hues = hues;
    }

    fn set_channel_brightnesses<R: RngCore>(
        &mut self,
        brightnesses: [u8; CHANNEL_COUNT],
        _rng: &mut R,
    ) {
        self.inputs.brightnesses = brightnesses;
    }
}
