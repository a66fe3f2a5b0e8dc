//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait and renders all four
//! channels at once.

mod fire;
mod harmony_twinkle;
mod rain;
mod runner;
mod twinkle;

use embassy_time::Duration;
use rand_core::RngCore;

pub use fire::{COOLING, FireEffect, SPARK_ZONE, SPARKING, heat_to_color, heat_to_hsv};
pub use harmony_twinkle::{HarmonyTwinkleEffect, MAX_HARMONY_HUES, PrimaryShare, partition_counts};
pub use rain::{
    MAX_RAINDROPS, MAX_SPAWN_ATTEMPTS, MIN_RAINDROPS, RAINDROP_LENGTH, RAINDROP_MAX_FRAMES,
    RAINDROP_SLOTS, RainEffect, Raindrop, max_raindrops, raindrop_blend,
};
pub use runner::{
    GAUSSIAN_VARIANCE, MAX_RUNNERS, MIN_RUNNERS, RUNNER_LENGTH, RUNNER_SLOTS, Runner,
    RunnerEffect, max_runners,
};
pub use twinkle::{
    TWINKLE_BASE_BRIGHTNESS, TWINKLE_MAX_BRIGHTNESS, TwinkleEffect, TwinkleField, TwinkleReroll,
    fade_toward,
};

use crate::color::{ActorPalette, Harmony};
use crate::strip::{CHANNEL_COUNT, PixelFrame};

/// Default effect frame period (20 fps)
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(50);

const MODE_NAME_NONE: &str = "none";
const MODE_NAME_MONOCHROMATIC_RUNNER: &str = "monochromatic_runner";
const MODE_NAME_COMPLEMENTARY_RUNNER: &str = "complementary_runner";
const MODE_NAME_SPLIT_COMPLEMENTARY_RUNNER: &str = "split_complementary_runner";
const MODE_NAME_TRIADIC_RUNNER: &str = "triadic_runner";
const MODE_NAME_SQUARE_RUNNER: &str = "square_runner";
const MODE_NAME_MONOCHROMATIC_TWINKLE: &str = "monochromatic_twinkle";
const MODE_NAME_COMPLEMENTARY_TWINKLE: &str = "complementary_twinkle";
const MODE_NAME_SPLIT_COMPLEMENTARY_TWINKLE: &str = "split_complementary_twinkle";
const MODE_NAME_TRIADIC_TWINKLE: &str = "triadic_twinkle";
const MODE_NAME_SQUARE_TWINKLE: &str = "square_twinkle";
const MODE_NAME_TETRADIC_TWINKLE: &str = "tetradic_twinkle";
const MODE_NAME_MONOCHROMATIC_RAIN: &str = "monochromatic_rain";
const MODE_NAME_COMPLEMENTARY_RAIN: &str = "complementary_rain";
const MODE_NAME_SPLIT_COMPLEMENTARY_RAIN: &str = "split_complementary_rain";
const MODE_NAME_TRIADIC_RAIN: &str = "triadic_rain";
const MODE_NAME_SQUARE_RAIN: &str = "square_rain";
const MODE_NAME_FIRE: &str = "fire";

const MODE_ID_NONE: u8 = 0;
const MODE_ID_MONOCHROMATIC_RUNNER: u8 = 1;
const MODE_ID_COMPLEMENTARY_RUNNER: u8 = 2;
const MODE_ID_SPLIT_COMPLEMENTARY_RUNNER: u8 = 3;
const MODE_ID_TRIADIC_RUNNER: u8 = 4;
const MODE_ID_SQUARE_RUNNER: u8 = 5;
const MODE_ID_MONOCHROMATIC_TWINKLE: u8 = 6;
const MODE_ID_COMPLEMENTARY_TWINKLE: u8 = 7;
const MODE_ID_SPLIT_COMPLEMENTARY_TWINKLE: u8 = 8;
const MODE_ID_TRIADIC_TWINKLE: u8 = 9;
const MODE_ID_SQUARE_TWINKLE: u8 = 10;
const MODE_ID_TETRADIC_TWINKLE: u8 = 11;
const MODE_ID_MONOCHROMATIC_RAIN: u8 = 12;
const MODE_ID_COMPLEMENTARY_RAIN: u8 = 13;
const MODE_ID_SPLIT_COMPLEMENTARY_RAIN: u8 = 14;
const MODE_ID_TRIADIC_RAIN: u8 = 15;
const MODE_ID_SQUARE_RAIN: u8 = 16;
const MODE_ID_FIRE: u8 = 17;

pub trait Effect<const N: usize> {
    /// Human readable effect name
    fn name(&self) -> &'static str;

    /// Start the effect from a clean state
    fn begin<R: RngCore>(&mut self, _rng: &mut R) {
        self.reset();
    }

    /// Accumulate elapsed time, advancing the simulation when a frame is due
    ///
    /// Returns true if a frame boundary was crossed and the effect should render.
    fn update<R: RngCore>(&mut self, delta: Duration, rng: &mut R) -> bool;

    /// Render the current state into all four channels
    fn render<R: RngCore>(&mut self, frame: &mut PixelFrame<N>, rng: &mut R);

    /// Reinitialize every per-pixel and per-actor state
    fn reset(&mut self);

    /// Update the cached channel hues (degrees)
    fn set_channel_hues<R: RngCore>(&mut self, hues: [u16; CHANNEL_COUNT], rng: &mut R);

    /// Update the cached channel brightnesses (percent)
    fn set_channel_brightnesses<R: RngCore>(
        &mut self,
        brightnesses: [u8; CHANNEL_COUNT],
        rng: &mut R,
    );
}

/// Accumulates elapsed time and reports frame boundaries.
///
/// The period is subtracted on every boundary (not reset to zero) so the
/// effect keeps its nominal rate without drifting.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    accumulated: Duration,
}

impl FrameClock {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::from_ticks(0),
        }
    }

    /// Add elapsed time, returns true if a frame is due
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.accumulated += delta;
        if self.accumulated >= self.period {
            self.accumulated -= self.period;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::from_ticks(0);
    }

    pub const fn period(&self) -> Duration {
        self.period
    }
}

/// Last hue/brightness pushed by the controller, per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelInputs {
    pub hues: [u16; CHANNEL_COUNT],
    pub brightnesses: [u8; CHANNEL_COUNT],
}

impl Default for ChannelInputs {
    fn default() -> Self {
        Self {
            hues: [0; CHANNEL_COUNT],
            brightnesses: [100; CHANNEL_COUNT],
        }
    }
}

/// Settings shared by every effect constructed by the engine
#[derive(Debug, Clone, Copy)]
pub struct EffectConfig {
    /// Simulation frame period
    pub frame_duration: Duration,
    /// Primary hue share for harmony twinkles
    pub primary_share: PrimaryShare,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            frame_duration: DEFAULT_FRAME_DURATION,
            primary_share: PrimaryShare::default(),
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot<const N: usize> {
    /// Single-hue twinkle with per-frame analogous jitter
    Twinkle(TwinkleEffect<N>),
    /// Twinkle over pre-assigned harmony hues
    HarmonyTwinkle(HarmonyTwinkleEffect<N>),
    /// Traveling runners over the Markov base layer
    Runner(RunnerEffect<N>),
    /// Stationary fading raindrops over the Markov base layer
    Rain(RainEffect<N>),
    /// Heat-map flame
    Fire(FireEffect<N>),
}

/// Known animation modes. The raw value is what gets persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModeId {
    /// No animation, the channel owners render
    #[default]
    None = MODE_ID_NONE,
    MonochromaticRunner = MODE_ID_MONOCHROMATIC_RUNNER,
    ComplementaryRunner = MODE_ID_COMPLEMENTARY_RUNNER,
    SplitComplementaryRunner = MODE_ID_SPLIT_COMPLEMENTARY_RUNNER,
    TriadicRunner = MODE_ID_TRIADIC_RUNNER,
    SquareRunner = MODE_ID_SQUARE_RUNNER,
    MonochromaticTwinkle = MODE_ID_MONOCHROMATIC_TWINKLE,
    ComplementaryTwinkle = MODE_ID_COMPLEMENTARY_TWINKLE,
    SplitComplementaryTwinkle = MODE_ID_SPLIT_COMPLEMENTARY_TWINKLE,
    TriadicTwinkle = MODE_ID_TRIADIC_TWINKLE,
    SquareTwinkle = MODE_ID_SQUARE_TWINKLE,
    TetradicTwinkle = MODE_ID_TETRADIC_TWINKLE,
    MonochromaticRain = MODE_ID_MONOCHROMATIC_RAIN,
    ComplementaryRain = MODE_ID_COMPLEMENTARY_RAIN,
    SplitComplementaryRain = MODE_ID_SPLIT_COMPLEMENTARY_RAIN,
    TriadicRain = MODE_ID_TRIADIC_RAIN,
    SquareRain = MODE_ID_SQUARE_RAIN,
    Fire = MODE_ID_FIRE,
}

impl ModeId {
    /// Number of modes, `None` included
    pub const COUNT: u8 = MODE_ID_FIRE + 1;

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_NONE => Self::None,
            MODE_ID_MONOCHROMATIC_RUNNER => Self::MonochromaticRunner,
            MODE_ID_COMPLEMENTARY_RUNNER => Self::ComplementaryRunner,
            MODE_ID_SPLIT_COMPLEMENTARY_RUNNER => Self::SplitComplementaryRunner,
            MODE_ID_TRIADIC_RUNNER => Self::TriadicRunner,
            MODE_ID_SQUARE_RUNNER => Self::SquareRunner,
            MODE_ID_MONOCHROMATIC_TWINKLE => Self::MonochromaticTwinkle,
            MODE_ID_COMPLEMENTARY_TWINKLE => Self::ComplementaryTwinkle,
            MODE_ID_SPLIT_COMPLEMENTARY_TWINKLE => Self::SplitComplementaryTwinkle,
            MODE_ID_TRIADIC_TWINKLE => Self::TriadicTwinkle,
            MODE_ID_SQUARE_TWINKLE => Self::SquareTwinkle,
            MODE_ID_TETRADIC_TWINKLE => Self::TetradicTwinkle,
            MODE_ID_MONOCHROMATIC_RAIN => Self::MonochromaticRain,
            MODE_ID_COMPLEMENTARY_RAIN => Self::ComplementaryRain,
            MODE_ID_SPLIT_COMPLEMENTARY_RAIN => Self::SplitComplementaryRain,
            MODE_ID_TRIADIC_RAIN => Self::TriadicRain,
            MODE_ID_SQUARE_RAIN => Self::SquareRain,
            MODE_ID_FIRE => Self::Fire,
            _ => return None,
        })
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Next mode in cycling order, wrapping back to `None`
    pub fn next(self) -> Self {
        Self::from_raw((self.raw() + 1) % Self::COUNT).unwrap_or(Self::None)
    }

    /// Build a fresh effect for this mode. `None` has no effect.
    pub fn to_slot<const N: usize>(self, config: &EffectConfig) -> Option<EffectSlot<N>> {
        let frame = config.frame_duration;
        let runner = |palette| EffectSlot::Runner(RunnerEffect::new(palette, frame));
        let rain = |harmony| EffectSlot::Rain(RainEffect::new(harmony, frame));
        let twinkle = |harmony| {
            EffectSlot::HarmonyTwinkle(HarmonyTwinkleEffect::new(
                harmony,
                config.primary_share,
                frame,
            ))
        };

        Some(match self {
            Self::None => return None,
            Self::MonochromaticRunner => runner(ActorPalette::BlackOrWhite),
            Self::ComplementaryRunner => runner(ActorPalette::Harmony(Harmony::Complementary)),
            Self::SplitComplementaryRunner => {
                runner(ActorPalette::Harmony(Harmony::SplitComplementary))
            }
            Self::TriadicRunner => runner(ActorPalette::Harmony(Harmony::Triadic)),
            Self::SquareRunner => runner(ActorPalette::Harmony(Harmony::Square)),
            Self::MonochromaticTwinkle => EffectSlot::Twinkle(TwinkleEffect::new(frame)),
            Self::ComplementaryTwinkle => twinkle(Harmony::Complementary),
            Self::SplitComplementaryTwinkle => twinkle(Harmony::SplitComplementary),
            Self::TriadicTwinkle => twinkle(Harmony::Triadic),
            Self::SquareTwinkle => twinkle(Harmony::Square),
            Self::TetradicTwinkle => twinkle(Harmony::Tetradic),
            Self::MonochromaticRain => rain(Harmony::Monochromatic),
            Self::ComplementaryRain => rain(Harmony::Complementary),
            Self::SplitComplementaryRain => rain(Harmony::SplitComplementary),
            Self::TriadicRain => rain(Harmony::Triadic),
            Self::SquareRain => rain(Harmony::Square),
            Self::Fire => EffectSlot::Fire(FireEffect::new(frame)),
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => MODE_NAME_NONE,
            Self::MonochromaticRunner => MODE_NAME_MONOCHROMATIC_RUNNER,
            Self::ComplementaryRunner => MODE_NAME_COMPLEMENTARY_RUNNER,
            Self::SplitComplementaryRunner => MODE_NAME_SPLIT_COMPLEMENTARY_RUNNER,
            Self::TriadicRunner => MODE_NAME_TRIADIC_RUNNER,
            Self::SquareRunner => MODE_NAME_SQUARE_RUNNER,
            Self::MonochromaticTwinkle => MODE_NAME_MONOCHROMATIC_TWINKLE,
            Self::ComplementaryTwinkle => MODE_NAME_COMPLEMENTARY_TWINKLE,
            Self::SplitComplementaryTwinkle => MODE_NAME_SPLIT_COMPLEMENTARY_TWINKLE,
            Self::TriadicTwinkle => MODE_NAME_TRIADIC_TWINKLE,
            Self::SquareTwinkle => MODE_NAME_SQUARE_TWINKLE,
            Self::TetradicTwinkle => MODE_NAME_TETRADIC_TWINKLE,
            Self::MonochromaticRain => MODE_NAME_MONOCHROMATIC_RAIN,
            Self::ComplementaryRain => MODE_NAME_COMPLEMENTARY_RAIN,
            Self::SplitComplementaryRain => MODE_NAME_SPLIT_COMPLEMENTARY_RAIN,
            Self::TriadicRain => MODE_NAME_TRIADIC_RAIN,
            Self::SquareRain => MODE_NAME_SQUARE_RAIN,
            Self::Fire => MODE_NAME_FIRE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        (0..Self::COUNT)
            .filter_map(Self::from_raw)
            .find(|mode| mode.as_str() == s)
    }

    /// Display name for logs and UIs
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::None => "Manual",
            Self::MonochromaticRunner => "Monochromatic Runner",
            Self::ComplementaryRunner => "Complementary Runner",
            Self::SplitComplementaryRunner => "Split-Complementary Runner",
            Self::TriadicRunner => "Triadic Runner",
            Self::SquareRunner => "Square Runner",
            Self::MonochromaticTwinkle => "Monochromatic Twinkle",
            Self::ComplementaryTwinkle => "Complementary Twinkle",
            Self::SplitComplementaryTwinkle => "Split-Complementary Twinkle",
            Self::TriadicTwinkle => "Triadic Twinkle",
            Self::SquareTwinkle => "Square Twinkle",
            Self::TetradicTwinkle => "Tetradic Twinkle",
            Self::MonochromaticRain => "Monochromatic Rain",
            Self::ComplementaryRain => "Complementary Rain",
            Self::SplitComplementaryRain => "Split-Complementary Rain",
            Self::TriadicRain => "Triadic Rain",
            Self::SquareRain => "Square Rain",
            Self::Fire => "Fire",
        }
    }
}

impl<const N: usize> EffectSlot<N> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Twinkle(effect) => effect.name(),
            Self::HarmonyTwinkle(effect) => effect.name(),
            Self::Runner(effect) => effect.name(),
            Self::Rain(effect) => effect.name(),
            Self::Fire(effect) => effect.name(),
        }
    }

    pub fn begin<R: RngCore>(&mut self, rng: &mut R) {
        match self {
            Self::Twinkle(effect) => effect.begin(rng),
            Self::HarmonyTwinkle(effect) => effect.begin(rng),
            Self::Runner(effect) => effect.begin(rng),
            Self::Rain(effect) => effect.begin(rng),
            Self::Fire(effect) => effect.begin(rng),
        }
    }

    pub fn update<R: RngCore>(&mut self, delta: Duration, rng: &mut R) -> bool {
        match self {
            Self::Twinkle(effect) => effect.update(delta, rng),
            Self::HarmonyTwinkle(effect) => effect.update(delta, rng),
            Self::Runner(effect) => effect.update(delta, rng),
            Self::Rain(effect) => effect.update(delta, rng),
            Self::Fire(effect) => effect.update(delta, rng),
        }
    }

    /// Render the current effect
    pub fn render<R: RngCore>(&mut self, frame: &mut PixelFrame<N>, rng: &mut R) {
        match self {
            Self::Twinkle(effect) => effect.render(frame, rng),
            Self::HarmonyTwinkle(effect) => effect.render(frame, rng),
            Self::Runner(effect) => effect.render(frame, rng),
            Self::Rain(effect) => effect.render(frame, rng),
            Self::Fire(effect) => effect.render(frame, rng),
        }
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Twinkle(effect) => Effect::reset(effect),
            Self::HarmonyTwinkle(effect) => Effect::reset(effect),
            Self::Runner(effect) => Effect::reset(effect),
            Self::Rain(effect) => Effect::reset(effect),
            Self::Fire(effect) => Effect::reset(effect),
        }
    }

    pub fn set_channel_hues<R: RngCore>(&mut self, hues: [u16; CHANNEL_COUNT], rng: &mut R) {
        match self {
            Self::Twinkle(effect) => effect.set_channel_hues(hues, rng),
            Self::HarmonyTwinkle(effect) => effect.set_channel_hues(hues, rng),
            Self::Runner(effect) => effect.set_channel_hues(hues, rng),
            Self::Rain(effect) => effect.set_channel_hues(hues, rng),
            Self::Fire(effect) => effect.set_channel_hues(hues, rng),
        }
    }

    pub fn set_channel_brightnesses<R: RngCore>(
        &mut self,
        brightnesses: [u8; CHANNEL_COUNT],
        rng: &mut R,
    ) {
        match self {
            Self::Twinkle(effect) => effect.set_channel_brightnesses(brightnesses, rng),
            Self::HarmonyTwinkle(effect) => effect.set_channel_brightnesses(brightnesses, rng),
            Self::Runner(effect) => effect.set_channel_brightnesses(brightnesses, rng),
            Self::Rain(effect) => effect.set_channel_brightnesses(brightnesses, rng),
            Self::Fire(effect) => effect.set_channel_brightnesses(brightnesses, rng),
        }
    }
}
