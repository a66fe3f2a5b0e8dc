//! Markov undulation layer
//!
//! Continuous, organic-looking base glow beneath the actor effects. Every
//! pixel of every channel runs two independent bounded random walks:
//!
//! - hue offset around the channel hue, `±ANGLE_WIDTH / 2` degrees, with
//!   momentum (60% continue, 20% stop, 20% reverse)
//! - brightness between [`BASE_BRIGHTNESS`] and [`MAX_BRIGHTNESS`], biased
//!   upward, with a small chance to flicker out when it hits the ceiling
//!
//! At a bound the next direction is re-rolled as if the pixel had been
//! moving away from the wall, so pixels never stay pinned.

use rand::Rng;
use rand_core::RngCore;

use crate::color::{ANGLE_WIDTH, Rgb, hsv, hsv2rgb};
use crate::math8::hue8;
use crate::strip::CHANNEL_COUNT;

/// Lower bound of the brightness walk
pub const BASE_BRIGHTNESS: u8 = 40;

/// Upper bound of the brightness walk
pub const MAX_BRIGHTNESS: u8 = 220;

/// Brightness units moved per frame
pub const BRIGHTNESS_STEP: i16 = 2;

/// Chance (percent) per frame at the ceiling to flicker out
pub const KNOCK_ZERO_PERCENT: u8 = 5;

#[allow(clippy::cast_possible_truncation)]
const HUE_LIMIT: i8 = (ANGLE_WIDTH / 2) as i8;

/// Direction of a 1-D walk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Step {
    Down,
    #[default]
    Hold,
    Up,
}

impl Step {
    pub const fn delta(self) -> i8 {
        match self {
            Self::Down => -1,
            Self::Hold => 0,
            Self::Up => 1,
        }
    }
}

/// Symmetric transition with momentum.
///
/// From `Hold` the outcome is uniform (33/34/33). While moving, 60% keep
/// the direction, 20% stop and 20% reverse.
pub fn markov_transition<R: RngCore>(current: Step, rng: &mut R) -> Step {
    let roll: u8 = rng.gen_range(0..100);
    match current {
        Step::Hold => match roll {
            0..33 => Step::Down,
            33..67 => Step::Hold,
            _ => Step::Up,
        },
        Step::Up => match roll {
            0..60 => Step::Up,
            60..80 => Step::Hold,
            _ => Step::Down,
        },
        Step::Down => match roll {
            0..60 => Step::Down,
            60..80 => Step::Hold,
            _ => Step::Up,
        },
    }
}

/// Transition with an upward drift, used for brightness.
///
/// From `Hold`: 60% up, 20% stay, 20% down. Moving up: 70/15/15.
/// Moving down: 40% continue, 30% stay, 30% reverse.
pub fn markov_transition_brightness_biased<R: RngCore>(current: Step, rng: &mut R) -> Step {
    let roll: u8 = rng.gen_range(0..100);
    match current {
        Step::Hold => match roll {
            0..60 => Step::Up,
            60..80 => Step::Hold,
            _ => Step::Down,
        },
        Step::Up => match roll {
            0..70 => Step::Up,
            70..85 => Step::Hold,
            _ => Step::Down,
        },
        Step::Down => match roll {
            0..40 => Step::Down,
            40..70 => Step::Hold,
            _ => Step::Up,
        },
    }
}

/// Walk state of a single pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelWalk {
    hue_offset: i8,
    hue_dir: Step,
    brightness: u8,
    brightness_dir: Step,
    /// Flickered out this frame, renders black
    knocked: bool,
}

impl Default for PixelWalk {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelWalk {
    pub const fn new() -> Self {
        Self {
            hue_offset: 0,
            hue_dir: Step::Hold,
            brightness: BASE_BRIGHTNESS,
            brightness_dir: Step::Hold,
            knocked: false,
        }
    }

    /// Advance both walks by one frame
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn step<R: RngCore>(&mut self, rng: &mut R) {
        self.knocked = false;

        let mut next = markov_transition(self.hue_dir, rng);
        if self.hue_offset >= HUE_LIMIT && next == Step::Up {
            next = markov_transition(Step::Down, rng);
        } else if self.hue_offset <= -HUE_LIMIT && next == Step::Down {
            next = markov_transition(Step::Up, rng);
        }
        self.hue_dir = next;
        self.hue_offset = (self.hue_offset + next.delta()).clamp(-HUE_LIMIT, HUE_LIMIT);

        let mut next = markov_transition_brightness_biased(self.brightness_dir, rng);
        if self.brightness >= MAX_BRIGHTNESS && next == Step::Up {
            if rng.gen_range(0..100) < KNOCK_ZERO_PERCENT {
                self.brightness = BASE_BRIGHTNESS;
                self.brightness_dir = Step::Hold;
                self.knocked = true;
                return;
            }
            next = markov_transition_brightness_biased(Step::Down, rng);
        } else if self.brightness <= BASE_BRIGHTNESS && next == Step::Down {
            next = markov_transition_brightness_biased(Step::Up, rng);
        }
        self.brightness_dir = next;
        let stepped = i16::from(self.brightness) + i16::from(next.delta()) * BRIGHTNESS_STEP;
        self.brightness = stepped.clamp(i16::from(BASE_BRIGHTNESS), i16::from(MAX_BRIGHTNESS)) as u8;
    }

    /// Hue offset in degrees, always within `±ANGLE_WIDTH / 2`
    pub const fn hue_offset(&self) -> i8 {
        self.hue_offset
    }

    pub const fn hue_dir(&self) -> Step {
        self.hue_dir
    }

    /// Stored walk brightness, always within the walk bounds
    pub const fn base_brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn brightness_dir(&self) -> Step {
        self.brightness_dir
    }

    /// Brightness to render (0 for a frame after a flicker-out)
    pub const fn brightness(&self) -> u8 {
        if self.knocked { 0 } else { self.brightness }
    }

    pub const fn is_knocked(&self) -> bool {
        self.knocked
    }
}

/// Base layer for all four channels
#[derive(Debug, Clone)]
pub struct MarkovLayer<const N: usize> {
    pixels: [[PixelWalk; N]; CHANNEL_COUNT],
}

impl<const N: usize> Default for MarkovLayer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MarkovLayer<N> {
    pub const fn new() -> Self {
        Self {
            pixels: [[PixelWalk::new(); N]; CHANNEL_COUNT],
        }
    }

    /// Put every pixel back to offset 0 at base brightness, not moving
    pub fn reset(&mut self) {
        self.pixels = [[PixelWalk::new(); N]; CHANNEL_COUNT];
    }

    /// Advance every pixel of every channel by one frame
    pub fn update<R: RngCore>(&mut self, rng: &mut R) {
        for channel in &mut self.pixels {
            for pixel in channel.iter_mut() {
                pixel.step(rng);
            }
        }
    }

    pub fn pixel(&self, channel: usize, index: usize) -> &PixelWalk {
        &self.pixels[channel][index]
    }

    /// Base color of a pixel for the given channel hue
    pub fn color(&self, channel: usize, index: usize, channel_hue: u16) -> Rgb {
        let pixel = &self.pixels[channel][index];
        let hue = i32::from(channel_hue) + i32::from(pixel.hue_offset);
        hsv2rgb(hsv(hue8(hue), 255, pixel.brightness()))
    }
}
