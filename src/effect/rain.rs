//! Rain effect
//!
//! Stationary raindrops appear at random spots over the Markov base glow,
//! start as a sharp bright point and dissolve outward while fading. Drops
//! never overlap at spawn: a candidate center closer than one drop length
//! to a live drop is rejected, and after a few failed attempts the spawn
//! simply waits for a later frame.
//!
//! Dim settings show busier rain (18 drops), full brightness calmer rain (6).

use embassy_time::Duration;
use rand::Rng;
use rand_core::RngCore;

use super::{ChannelInputs, Effect, FrameClock};
use crate::color::{ActorPalette, Harmony, Rgb, blend_colors, hsv2rgb};
use crate::gaussian::gaussian_weight;
use crate::markov::MarkovLayer;
use crate::math8::lerp_percent;
use crate::pool::{SlotPool, spawn_chance};
use crate::strip::{CHANNEL_COUNT, PixelFrame};

/// Pixels covered by a drop, odd so it has a center
pub const RAINDROP_LENGTH: usize = 11;

/// Drop lifetime in frames
pub const RAINDROP_MAX_FRAMES: u8 = 30;

/// Drops allowed at brightness 100
pub const MIN_RAINDROPS: usize = 6;

/// Drops allowed at brightness 0
pub const MAX_RAINDROPS: usize = 18;

/// Drop pool size per channel
pub const RAINDROP_SLOTS: usize = 18;

/// Candidate centers tried per frame before giving up
pub const MAX_SPAWN_ATTEMPTS: usize = 10;

const MIN_GAUSSIAN_VARIANCE: f32 = 0.1;
const MAX_GAUSSIAN_VARIANCE: f32 = 10.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const DROP_LENGTH: i16 = RAINDROP_LENGTH as i16;
const HALF_LENGTH: i16 = DROP_LENGTH / 2;

/// A stationary drop with a bounded lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Raindrop {
    center: i16,
    frame: u8,
    color: Rgb,
}

impl Raindrop {
    pub const fn center(&self) -> i16 {
        self.center
    }

    /// Frames lived so far, `0..RAINDROP_MAX_FRAMES`
    pub const fn frame(&self) -> u8 {
        self.frame
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    pub const fn covers(&self, i: i16) -> bool {
        i >= self.center - HALF_LENGTH && i <= self.center + HALF_LENGTH
    }
}

/// Blend weight (0-255) of a drop at pixel `i`.
///
/// Spatial variance widens linearly from 0.1 at birth to 10.0 at death and
/// the whole bell fades out with `1 - progress`.
pub fn raindrop_blend(drop: &Raindrop, i: i16) -> u8 {
    let progress = f32::from(drop.frame) / f32::from(RAINDROP_MAX_FRAMES);
    let variance =
        MIN_GAUSSIAN_VARIANCE + progress * (MAX_GAUSSIAN_VARIANCE - MIN_GAUSSIAN_VARIANCE);

    gaussian_weight(i32::from(i - drop.center), variance, 1.0 - progress)
}

/// Drops allowed for a channel brightness, 18 when dim down to 6 at full
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub const fn max_raindrops(brightness: u8) -> usize {
    lerp_percent(MAX_RAINDROPS as i32, MIN_RAINDROPS as i32, brightness) as usize
}

#[derive(Debug, Clone, Default)]
struct RainLane {
    pool: SlotPool<Raindrop, RAINDROP_SLOTS>,
    frames_since_spawn: u32,
}

impl RainLane {
    fn collides(&self, position: i16) -> bool {
        self.pool
            .iter()
            .any(|drop| (position - drop.center).abs() < DROP_LENGTH)
    }

    /// Random collision-free center, `None` once the attempts run out
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn find_spawn_position<R: RngCore>(&self, len: usize, rng: &mut R) -> Option<i16> {
        (0..MAX_SPAWN_ATTEMPTS)
            .map(|_| rng.gen_range(0..len) as i16)
            .find(|&position| !self.collides(position))
    }
}

/// Raindrops over the Markov base layer
#[derive(Debug, Clone)]
pub struct RainEffect<const N: usize> {
    base: MarkovLayer<N>,
    lanes: [RainLane; CHANNEL_COUNT],
    harmony: Harmony,
    inputs: ChannelInputs,
    clock: FrameClock,
}

impl<const N: usize> RainEffect<N> {
    pub fn new(harmony: Harmony, frame_duration: Duration) -> Self {
        Self {
            base: MarkovLayer::new(),
            lanes: Default::default(),
            harmony,
            inputs: ChannelInputs::default(),
            clock: FrameClock::new(frame_duration),
        }
    }

    pub const fn harmony(&self) -> Harmony {
        self.harmony
    }

    pub const fn base_layer(&self) -> &MarkovLayer<N> {
        &self.base
    }

    /// Live drops of a channel
    pub fn drops(&self, channel: usize) -> impl Iterator<Item = &Raindrop> {
        self.lanes[channel].pool.iter()
    }

    pub fn active_drops(&self, channel: usize) -> usize {
        self.lanes[channel].pool.active_count()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn step_drops<R: RngCore>(&mut self, rng: &mut R) {
        let palette = ActorPalette::Harmony(self.harmony);

        for (channel, lane) in self.lanes.iter_mut().enumerate() {
            lane.pool.retain(|drop| {
                drop.frame += 1;
                drop.frame < RAINDROP_MAX_FRAMES
            });

            lane.frames_since_spawn = lane.frames_since_spawn.saturating_add(1);

            let allowed = max_raindrops(self.inputs.brightnesses[channel]);
            if lane.pool.active_count() >= allowed {
                continue;
            }

            let interval = ((N + RAINDROP_LENGTH) / allowed) as u32;
            if rng.gen_range(0..100) >= spawn_chance(lane.frames_since_spawn, interval) {
                continue;
            }

            let Some(center) = lane.find_spawn_position(N, rng) else {
                continue;
            };
            let color = hsv2rgb(palette.pick(self.inputs.hues[channel], rng));
            if lane
                .pool
                .spawn(Raindrop {
                    center,
                    frame: 0,
                    color,
                })
                .is_ok()
            {
                lane.frames_since_spawn = 0;
            }
        }
    }
}

impl<const N: usize> Effect<N> for RainEffect<N> {
    fn name(&self) -> &'static str {
        match self.harmony {
            Harmony::Monochromatic => "Monochromatic Rain",
            Harmony::Complementary => "Complementary Rain",
            Harmony::SplitComplementary => "Split-Complementary Rain",
            Harmony::Triadic => "Triadic Rain",
            Harmony::Square => "Square Rain",
            Harmony::Tetradic => "Tetradic Rain",
        }
    }

    fn update<R: RngCore>(&mut self, delta: Duration, rng: &mut R) -> bool {
        if !self.clock.advance(delta) {
            return false;
        }
        self.base.update(rng);
        self.step_drops(rng);
        true
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn render<R: RngCore>(&mut self, frame: &mut PixelFrame<N>, _rng: &mut R) {
        for (channel, leds) in frame.channels_mut().iter_mut().enumerate() {
            let hue = self.inputs.hues[channel];
            let pool = &self.lanes[channel].pool;

            for (i, led) in leds.iter_mut().enumerate() {
                let base = self.base.color(channel, i, hue);
                let i = i as i16;
                *led = match pool.iter().find(|drop| drop.covers(i)) {
                    Some(drop) => blend_colors(base, drop.color, raindrop_blend(drop, i)),
                    None => base,
                };
            }
        }
    }

    fn reset(&mut self) {
        self.base.reset();
        for lane in &mut self.lanes {
            lane.pool.clear();
            lane.frames_since_spawn = 0;
        }
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
