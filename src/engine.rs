use embassy_time::Duration;
use rand_core::RngCore;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{BLACK, fill_solid};
use crate::effect::{DEFAULT_FRAME_DURATION, EffectConfig, EffectSlot, ModeId, PrimaryShare};
use crate::store::ModeStore;
use crate::strip::{CHANNEL_COUNT, ChannelOwner, ChannelState, PixelFrame};

/// Configuration for the animation engine
#[derive(Debug, Clone)]
pub struct AnimationEngineConfig {
    /// Initial cached state of every channel
    pub channels: [ChannelState; CHANNEL_COUNT],
    /// Effect frame period
    pub frame_duration: Duration,
    /// Harmony twinkle primary hue share
    pub primary_share: PrimaryShare,
}

impl Default for AnimationEngineConfig {
    fn default() -> Self {
        Self {
            channels: [
                ChannelState::factory_default(0),
                ChannelState::factory_default(1),
                ChannelState::factory_default(2),
                ChannelState::factory_default(3),
            ],
            frame_duration: DEFAULT_FRAME_DURATION,
            primary_share: PrimaryShare::default(),
        }
    }
}

/// Animation Engine - the mode manager
///
/// Owns the four pixel buffers and at most one live effect. When a mode is
/// entered the buffers are snapshotted and the channel owners step aside;
/// leaving the mode restores the snapshot exactly and hands control back.
///
/// Construction is two-phase: the engine loads the saved mode right away
/// but only enters it once the channel owners are attached.
pub struct AnimationEngine<R: RngCore, S: ModeStore, O: ChannelOwner, const N: usize> {
    rng: R,
    store: S,
    owners: Option<[O; CHANNEL_COUNT]>,
    channels: [ChannelState; CHANNEL_COUNT],
    effect_config: EffectConfig,

    mode: ModeId,
    effect: Option<EffectSlot<N>>,
    frame: PixelFrame<N>,
    snapshot: PixelFrame<N>,
}

impl<R: RngCore, S: ModeStore, O: ChannelOwner, const N: usize> AnimationEngine<R, S, O, N> {
    /// Create an engine, loading the last selected mode from `store`
    ///
    /// The loaded mode stays pending until [`Self::attach_owners`] or
    /// [`Self::restore_mode`] is called.
    pub fn new(rng: R, mut store: S, config: &AnimationEngineConfig) -> Self {
        let mode = match store.load_mode() {
            Ok(Some(raw)) => ModeId::from_raw(raw).unwrap_or_else(|| {
                #[cfg(feature = "esp32-log")]
                println!("[AnimationEngine.new] ignoring unknown saved mode {}", raw);
                ModeId::None
            }),
            Ok(None) => ModeId::None,
            Err(_err) => {
                #[cfg(feature = "esp32-log")]
                println!("[AnimationEngine.new] failed to load mode: {:?}", _err);
                ModeId::None
            }
        };

        Self {
            rng,
            store,
            owners: None,
            channels: config.channels,
            effect_config: EffectConfig {
                frame_duration: config.frame_duration,
                primary_share: config.primary_share,
            },
            mode,
            effect: None,
            frame: PixelFrame::new(),
            snapshot: PixelFrame::new(),
        }
    }

    /// Attach the channel owners and enter the saved mode
    pub fn attach_owners(&mut self, owners: [O; CHANNEL_COUNT]) {
        self.owners = Some(owners);
        self.restore_mode();
    }

    /// Enter the current (loaded) mode without saving it again
    pub fn restore_mode(&mut self) {
        if self.effect.is_some() {
            self.stop();
        }
        #[cfg(feature = "esp32-log")]
        println!(
            "[AnimationEngine.restore_mode] restoring {}",
            self.mode.display_name()
        );
        self.start();
    }

    /// Switch to a new mode and persist it
    pub fn set_mode(&mut self, mode: ModeId) {
        if self.effect.is_some() {
            self.stop();
        }
        #[cfg(feature = "esp32-log")]
        println!(
            "[AnimationEngine.set_mode] {} -> {}",
            self.mode.display_name(),
            mode.display_name()
        );
        self.mode = mode;
        self.persist_mode();
        self.start();
    }

    /// Advance to the next mode, wrapping back to `None`
    pub fn cycle_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    /// Advance the active effect by `delta`
    ///
    /// Returns true if a frame was rendered into the pixel buffers.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(effect) = self.effect.as_mut() else {
            return false;
        };
        if !effect.update(delta, &mut self.rng) {
            return false;
        }

        if let Some(owners) = &self.owners {
            for (state, owner) in self.channels.iter_mut().zip(owners.iter()) {
                *state = owner.desired();
            }
        }
        effect.set_channel_hues(hues_of(self.channels), &mut self.rng);
        effect.set_channel_brightnesses(brightnesses_of(self.channels), &mut self.rng);
        effect.render(&mut self.frame, &mut self.rng);

        // Power-off always wins over the effect output
        for (channel, state) in self.channels.iter().enumerate() {
            if !state.power {
                fill_solid(self.frame.channel_mut(channel), BLACK);
            }
        }
        true
    }

    /// Cache new channel hues (degrees, wrapped into `0..360`)
    pub fn set_channel_hues(&mut self, hues: [u16; CHANNEL_COUNT]) {
        for (state, hue) in self.channels.iter_mut().zip(hues) {
            state.hue = hue % 360;
        }
        if let Some(effect) = self.effect.as_mut() {
            effect.set_channel_hues(hues_of(self.channels), &mut self.rng);
        }
    }

    /// Cache new channel brightnesses (percent, clamped to 100)
    pub fn set_channel_brightnesses(&mut self, brightnesses: [u8; CHANNEL_COUNT]) {
        for (state, brightness) in self.channels.iter_mut().zip(brightnesses) {
            state.brightness = brightness.min(100);
        }
        if let Some(effect) = self.effect.as_mut() {
            effect.set_channel_brightnesses(brightnesses_of(self.channels), &mut self.rng);
        }
    }

    /// Cache channel power flags
    ///
    /// Overwritten on the next rendered frame when owners are attached.
    pub fn set_channel_powers(&mut self, powers: [bool; CHANNEL_COUNT]) {
        for (state, power) in self.channels.iter_mut().zip(powers) {
            state.power = power;
        }
    }

    /// Forget the persisted mode (factory reset)
    pub fn clear_storage(&mut self) -> Result<(), S::Error> {
        #[cfg(feature = "esp32-log")]
        println!("[AnimationEngine.clear_storage] clearing saved mode");
        self.store.clear()
    }

    /// An effect currently owns the pixel buffers
    pub const fn is_active(&self) -> bool {
        self.effect.is_some()
    }

    pub const fn current_mode(&self) -> ModeId {
        self.mode
    }

    pub const fn effect(&self) -> Option<&EffectSlot<N>> {
        self.effect.as_ref()
    }

    pub const fn channels(&self) -> &[ChannelState; CHANNEL_COUNT] {
        &self.channels
    }

    /// Pixel buffers, as last rendered
    pub const fn frame(&self) -> &PixelFrame<N> {
        &self.frame
    }

    /// Pixel buffers for the channel owners to draw into while no mode runs
    pub fn frame_mut(&mut self) -> &mut PixelFrame<N> {
        &mut self.frame
    }

    pub const fn owners(&self) -> Option<&[O; CHANNEL_COUNT]> {
        self.owners.as_ref()
    }

    pub fn owners_mut(&mut self) -> Option<&mut [O; CHANNEL_COUNT]> {
        self.owners.as_mut()
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Leave the running effect: restore buffers, hand channels back
    fn stop(&mut self) {
        self.effect = None;
        self.frame.clone_from(&self.snapshot);
        if let Some(owners) = self.owners.as_mut() {
            for owner in owners.iter_mut() {
                owner.resume_from_animation();
            }
        }
    }

    /// Enter `self.mode`: snapshot, take channels over, start the effect
    fn start(&mut self) {
        let Some(mut effect) = self.mode.to_slot::<N>(&self.effect_config) else {
            return;
        };

        self.snapshot.clone_from(&self.frame);
        if let Some(owners) = self.owners.as_mut() {
            for (state, owner) in self.channels.iter_mut().zip(owners.iter_mut()) {
                owner.yield_to_animation();
                *state = owner.desired();
            }
        }

        effect.set_channel_hues(hues_of(self.channels), &mut self.rng);
        effect.set_channel_brightnesses(brightnesses_of(self.channels), &mut self.rng);
        effect.begin(&mut self.rng);
        self.effect = Some(effect);
    }

    fn persist_mode(&mut self) {
        if let Err(_err) = self.store.save_mode(self.mode.raw()) {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationEngine.set_mode] failed to save mode: {:?}", _err);
        }
    }
}

fn hues_of(channels: [ChannelState; CHANNEL_COUNT]) -> [u16; CHANNEL_COUNT] {
    channels.map(|state| state.hue)
}

fn brightnesses_of(channels: [ChannelState; CHANNEL_COUNT]) -> [u8; CHANNEL_COUNT] {
    channels.map(|state| state.brightness)
}
