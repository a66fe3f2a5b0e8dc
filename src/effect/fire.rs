//! Fire effect
//!
//! Classic heat-map flame, one simulation per channel, colored by the
//! channel hue. Each frame every pixel cools a little, heat drifts up the
//! strip and occasionally a spark ignites near the start.
//!
//! Heat to color is a three band ramp:
//! - `0..=85`: value ramps up at full saturation (black to hue)
//! - `86..=170`: full value and saturation
//! - `171..=255`: full value, saturation ramps down (hue to white)

use embassy_time::Duration;
use rand::Rng;
use rand_core::RngCore;

use super::{ChannelInputs, Effect, FrameClock};
use crate::color::{Hsv, Rgb, hsv, hsv2rgb};
use crate::math8::{hue8, map_range};
use crate::strip::{CHANNEL_COUNT, PixelFrame};

/// Cooling strength, higher burns out faster
pub const COOLING: usize = 55;

/// Spark chance out of 255 per frame
pub const SPARKING: u8 = 120;

/// Sparks ignite within the first `SPARK_ZONE` pixels
pub const SPARK_ZONE: usize = 7;

const WARM_FROM: u8 = 86;
const HOT_FROM: u8 = 171;

/// Map a heat value to a flame color around `hue`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn heat_to_hsv(temperature: u8, hue: u8) -> Hsv {
    let t = i32::from(temperature);
    match temperature {
        t8 if t8 < WARM_FROM => hsv(hue, 255, map_range(t, 0, 85, 0, 255) as u8),
        t8 if t8 < HOT_FROM => hsv(hue, 255, 255),
        _ => hsv(hue, map_range(t, 171, 255, 255, 0) as u8, 255),
    }
}

#[inline]
pub fn heat_to_color(temperature: u8, hue: u8) -> Rgb {
    hsv2rgb(heat_to_hsv(temperature, hue))
}

/// Heat-map flame on every channel
#[derive(Debug, Clone)]
pub struct FireEffect<const N: usize> {
    heat: [[u8; N]; CHANNEL_COUNT],
    inputs: ChannelInputs,
    clock: FrameClock,
}

impl<const N: usize> FireEffect<N> {
    pub fn new(frame_duration: Duration) -> Self {
        Self {
            heat: [[0; N]; CHANNEL_COUNT],
            inputs: ChannelInputs::default(),
            clock: FrameClock::new(frame_duration),
        }
    }

    /// Heat map of a channel, index 0 = flame base
    pub fn heat(&self, channel: usize) -> &[u8; N] {
        &self.heat[channel]
    }

    #[allow(clippy::cast_possible_truncation)]
    fn step<R: RngCore>(&mut self, rng: &mut R) {
        let max_cooldown = (COOLING * 10 / N + 2).min(256) as u16;

        for heat in &mut self.heat {
            for cell in heat.iter_mut() {
                let cooldown = rng.gen_range(0..max_cooldown);
                *cell = cell.saturating_sub(cooldown.min(255) as u8);
            }

            for i in (2..N).rev() {
                let sum = u16::from(heat[i - 1]) + 2 * u16::from(heat[i - 2]);
                heat[i] = (sum / 3) as u8;
            }

            if rng.gen_range(0..255) < SPARKING {
                let position = rng.gen_range(0..SPARK_ZONE.min(N));
                heat[position] = heat[position].saturating_add(rng.gen_range(160..255));
            }
        }
    }
}

impl<const N: usize> Effect<N> for FireEffect<N> {
    fn name(&self) -> &'static str {
        "Fire"
    }

    fn update<R: RngCore>(&mut self, delta: Duration, rng: &mut R) -> bool {
        if !self.clock.advance(delta) {
            return false;
        }
        self.step(rng);
        true
    }

    fn render<R: RngCore>(&mut self, frame: &mut PixelFrame<N>, _rng: &mut R) {
        for (channel, leds) in frame.channels_mut().iter_mut().enumerate() {
            let hue = hue8(i32::from(self.inputs.hues[channel]));
            for (led, &heat) in leds.iter_mut().zip(self.heat[channel].iter()) {
                *led = heat_to_color(heat, hue);
            }
        }
    }

    fn reset(&mut self) {
        self.heat = [[0; N]; CHANNEL_COUNT];
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
