//! Runner effect
//!
//! Soft blobs of color travel along each strip at one pixel per frame over
//! the Markov base glow. A new runner only enters once the previous one has
//! fully cleared the strip start, and the spawn chance ramps up with the
//! time since the last spawn. Brighter settings show fewer runners.

use embassy_time::Duration;
use rand::Rng;
use rand_core::RngCore;

use super::{ChannelInputs, Effect, FrameClock};
use crate::color::{ActorPalette, Harmony, Rgb, blend_colors, hsv2rgb};
use crate::gaussian::GaussianBlendTable;
use crate::markov::MarkovLayer;
use crate::math8::lerp_percent;
use crate::pool::{SlotPool, spawn_chance};
use crate::strip::{CHANNEL_COUNT, PixelFrame};

/// Window length of a runner in pixels
pub const RUNNER_LENGTH: usize = 30;

/// Runner pool size per channel
pub const RUNNER_SLOTS: usize = 6;

/// Runners allowed at brightness 0
pub const MAX_RUNNERS: usize = 6;

/// Runners allowed at brightness 100
pub const MIN_RUNNERS: usize = 1;

/// Blend curve width, ~6-8 visible pixels
pub const GAUSSIAN_VARIANCE: f32 = 2.5;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const WINDOW: i16 = RUNNER_LENGTH as i16;

/// A traveling window of `RUNNER_LENGTH` pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Runner {
    head: i16,
    color: Rgb,
}

impl Runner {
    /// Leading pixel position, may be past the strip end while leaving
    pub const fn head(&self) -> i16 {
        self.head
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Position of pixel `i` inside the window, if covered
    #[allow(clippy::cast_sign_loss)]
    pub fn window_index(&self, i: i16) -> Option<usize> {
        let tail = self.head - (WINDOW - 1);
        if i < tail || i > self.head {
            return None;
        }
        Some((i - tail) as usize)
    }

    /// Still occupying the first `RUNNER_LENGTH` pixels
    const fn blocks_start(&self) -> bool {
        self.head < WINDOW
    }
}

/// Runners allowed for a channel brightness, 6 when dim down to 1 at full
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub const fn max_runners(brightness: u8) -> usize {
    lerp_percent(MAX_RUNNERS as i32, MIN_RUNNERS as i32, brightness) as usize
}

#[derive(Debug, Clone, Default)]
struct RunnerLane {
    pool: SlotPool<Runner, RUNNER_SLOTS>,
    frames_since_spawn: u32,
}

/// Runners over the Markov base layer
#[derive(Debug, Clone)]
pub struct RunnerEffect<const N: usize> {
    base: MarkovLayer<N>,
    lanes: [RunnerLane; CHANNEL_COUNT],
    lut: GaussianBlendTable<RUNNER_LENGTH>,
    palette: ActorPalette,
    inputs: ChannelInputs,
    clock: FrameClock,
}

impl<const N: usize> RunnerEffect<N> {
    pub fn new(palette: ActorPalette, frame_duration: Duration) -> Self {
        Self {
            base: MarkovLayer::new(),
            lanes: Default::default(),
            lut: GaussianBlendTable::new(GAUSSIAN_VARIANCE),
            palette,
            inputs: ChannelInputs::default(),
            clock: FrameClock::new(frame_duration),
        }
    }

    pub const fn palette(&self) -> ActorPalette {
        self.palette
    }

    pub const fn base_layer(&self) -> &MarkovLayer<N> {
        &self.base
    }

    /// Live runners of a channel
    pub fn runners(&self, channel: usize) -> impl Iterator<Item = &Runner> {
        self.lanes[channel].pool.iter()
    }

    pub fn active_runners(&self, channel: usize) -> usize {
        self.lanes[channel].pool.active_count()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn step_runners<R: RngCore>(&mut self, rng: &mut R) {
        let exit = (N + RUNNER_LENGTH) as i16;

        for (channel, lane) in self.lanes.iter_mut().enumerate() {
            lane.pool.retain(|runner| {
                runner.head += 1;
                runner.head < exit
            });

            if lane.pool.iter().any(Runner::blocks_start) {
                lane.frames_since_spawn = 0;
                continue;
            }
            lane.frames_since_spawn = lane.frames_since_spawn.saturating_add(1);

            let allowed = max_runners(self.inputs.brightnesses[channel]);
            if lane.pool.active_count() >= allowed {
                continue;
            }

            let interval = ((N + RUNNER_LENGTH) / allowed) as u32;
            if rng.gen_range(0..100) < spawn_chance(lane.frames_since_spawn, interval) {
                let color = hsv2rgb(self.palette.pick(self.inputs.hues[channel], rng));
                if lane.pool.spawn(Runner { head: 0, color }).is_ok() {
                    lane.frames_since_spawn = 0;
                }
            }
        }
    }
}

impl<const N: usize> Effect<N> for RunnerEffect<N> {
    fn name(&self) -> &'static str {
        match self.palette {
            ActorPalette::BlackOrWhite | ActorPalette::Harmony(Harmony::Monochromatic) => {
                "Monochromatic Runner"
            }
            ActorPalette::Harmony(Harmony::Complementary) => "Complementary Runner",
            ActorPalette::Harmony(Harmony::SplitComplementary) => "Split-Complementary Runner",
            ActorPalette::Harmony(Harmony::Triadic) => "Triadic Runner",
            ActorPalette::Harmony(Harmony::Square) => "Square Runner",
            ActorPalette::Harmony(Harmony::Tetradic) => "Tetradic Runner",
        }
    }

    fn update<R: RngCore>(&mut self, delta: Duration, rng: &mut R) -> bool {
        if !self.clock.advance(delta) {
            return false;
        }
        self.base.update(rng);
        self.step_runners(rng);
        true
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn render<R: RngCore>(&mut self, frame: &mut PixelFrame<N>, _rng: &mut R) {
        for (channel, leds) in frame.channels_mut().iter_mut().enumerate() {
            let hue = self.inputs.hues[channel];
            let pool = &self.lanes[channel].pool;

            for (i, led) in leds.iter_mut().enumerate() {
                let base = self.base.color(channel, i, hue);
                // First covering runner wins
                *led = pool
                    .iter()
                    .find_map(|runner| {
                        runner
                            .window_index(i as i16)
                            .map(|k| blend_colors(base, runner.color, self.lut.get(k)))
                    })
                    .unwrap_or(base);
            }
        }
    }

    fn reset(&mut self) {
        self.base.reset();
        for lane in &mut self.lanes {
            lane.pool.clear();
            lane.frames_since_spawn = 0;
        }
        self.lut.compute(GAUSSIAN_VARIANCE);
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
