//! Channels and their pixel buffers

use crate::color::{Rgb, fill_solid};
use crate::math8::wrap_degrees;

/// Number of independently addressed LED strips
pub const CHANNEL_COUNT: usize = 4;

/// Hardware maximum of LEDs per strip
pub const MAX_LEDS: usize = 200;

/// Brightness used when a channel has no stored state yet
pub const DEFAULT_BRIGHTNESS: u8 = 80;

/// Desired state of one channel, as owned by the external controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    /// Hue in degrees, `0..360`
    pub hue: u16,
    /// Brightness in percent, `0..=100`
    pub brightness: u8,
    pub power: bool,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new(0, 100, true)
    }
}

impl ChannelState {
    /// Create a channel state, wrapping the hue and clamping brightness
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn new(hue: i32, brightness: i32, power: bool) -> Self {
        let brightness = if brightness < 0 {
            0
        } else if brightness > 100 {
            100
        } else {
            brightness
        };
        Self {
            hue: wrap_degrees(hue),
            brightness: brightness as u8,
            power,
        }
    }

    /// Factory default for a channel: hues spaced 90° apart, dimmed, on
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn factory_default(channel: usize) -> Self {
        Self::new(
            (channel % CHANNEL_COUNT) as i32 * 90,
            DEFAULT_BRIGHTNESS as i32,
            true,
        )
    }
}

/// Four pixel buffers of `N` LEDs, index 0 = physical start of a strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame<const N: usize> {
    channels: [[Rgb; N]; CHANNEL_COUNT],
}

impl<const N: usize> Default for PixelFrame<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PixelFrame<N> {
    /// Create an all-black frame
    pub const fn new() -> Self {
        const {
            assert!(N > 0 && N <= MAX_LEDS, "strip length must be 1..=200");
        }
        Self {
            channels: [[Rgb { r: 0, g: 0, b: 0 }; N]; CHANNEL_COUNT],
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn channel(&self, index: usize) -> &[Rgb; N] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [Rgb; N] {
        &mut self.channels[index]
    }

    pub fn channels_mut(&mut self) -> &mut [[Rgb; N]; CHANNEL_COUNT] {
        &mut self.channels
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Rgb; N]> {
        self.channels.iter()
    }

    /// Fill all four strips with one color
    pub fn fill(&mut self, color: Rgb) {
        for channel in &mut self.channels {
            fill_solid(channel, color);
        }
    }
}

/// External owner of a channel's desired state
///
/// While an animation runs the engine reads `desired()` once per rendered
/// frame and owns the pixel buffer; the owner is told when control passes
/// back and forth.
pub trait ChannelOwner {
    /// Current desired hue/brightness/power, never mutated by the engine
    fn desired(&self) -> ChannelState;

    /// The engine took over rendering of this channel
    fn yield_to_animation(&mut self);

    /// Rendering is handed back to the owner
    fn resume_from_animation(&mut self);
}

/// A fixed state acts as an owner that never changes its mind
impl ChannelOwner for ChannelState {
    fn desired(&self) -> ChannelState {
        *self
    }

    fn yield_to_animation(&mut self) {}

    fn resume_from_animation(&mut self) {}
}
