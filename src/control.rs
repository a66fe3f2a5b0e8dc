//! Control intents
//!
//! Other tasks (button handler, smart-home bridge) never touch the engine
//! directly; they queue intents which the frame pump applies between frames.

use rand_core::RngCore;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::effect::ModeId;
use crate::engine::AnimationEngine;
use crate::queue::IntentReceiver;
use crate::store::ModeStore;
use crate::strip::{CHANNEL_COUNT, ChannelOwner};

/// A request to change the engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlIntent {
    /// New hue (degrees) for every channel
    SetHues([u16; CHANNEL_COUNT]),
    /// New brightness (percent) for every channel
    SetBrightnesses([u8; CHANNEL_COUNT]),
    /// New power flag for every channel
    SetPowers([bool; CHANNEL_COUNT]),
    SetMode(ModeId),
    /// Advance to the next mode
    CycleMode,
}

impl ControlIntent {
    /// `next` carries the whole state this intent would set
    ///
    /// Only the setters qualify. Mode intents never coalesce because
    /// `CycleMode` is relative and every `SetMode` is persisted.
    pub const fn is_superseded_by(&self, next: &Self) -> bool {
        matches!(
            (self, next),
            (Self::SetHues(_), Self::SetHues(_))
                | (Self::SetBrightnesses(_), Self::SetBrightnesses(_))
                | (Self::SetPowers(_), Self::SetPowers(_))
        )
    }
}

/// Drains queued intents into an engine
pub struct IntentProcessor<'a, const SIZE: usize> {
    intents: IntentReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> IntentProcessor<'a, SIZE> {
    pub const fn new(intents: IntentReceiver<'a, SIZE>) -> Self {
        Self { intents }
    }

    /// Apply every pending intent in order (non-blocking)
    ///
    /// Returns the number of intents applied.
    pub fn process_pending<R, S, O, const N: usize>(
        &mut self,
        engine: &mut AnimationEngine<R, S, O, N>,
    ) -> usize
    where
        R: RngCore,
        S: ModeStore,
        O: ChannelOwner,
    {
        let mut applied = 0;
        while let Ok(intent) = self.intents.try_receive() {
            Self::apply(engine, intent);
            applied += 1;
        }
        applied
    }

    fn apply<R, S, O, const N: usize>(engine: &mut AnimationEngine<R, S, O, N>, intent: ControlIntent)
    where
        R: RngCore,
        S: ModeStore,
        O: ChannelOwner,
    {
        #[cfg(feature = "esp32-log")]
        println!("[IntentProcessor.apply] {:?}", intent);

        match intent {
            ControlIntent::SetHues(hues) => engine.set_channel_hues(hues),
            ControlIntent::SetBrightnesses(brightnesses) => {
                engine.set_channel_brightnesses(brightnesses);
            }
            ControlIntent::SetPowers(powers) => engine.set_channel_powers(powers),
            ControlIntent::SetMode(mode) => engine.set_mode(mode),
            ControlIntent::CycleMode => engine.cycle_mode(),
        }
    }
}
