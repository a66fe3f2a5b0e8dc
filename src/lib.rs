#![no_std]

pub mod color;
pub mod control;
pub mod effect;
pub mod engine;
pub mod frame_scheduler;
pub mod gaussian;
pub mod markov;
pub mod math8;
pub mod pool;
pub mod queue;
pub mod store;
pub mod strip;

pub use control::{ControlIntent, IntentProcessor};
pub use effect::{Effect, EffectConfig, EffectSlot, ModeId, PrimaryShare};
pub use engine::{AnimationEngine, AnimationEngineConfig};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use gaussian::GaussianBlendTable;
pub use markov::MarkovLayer;
pub use pool::SlotPool;
pub use queue::{IntentQueue, IntentReceiver, IntentSender};
pub use store::{MemoryModeStore, ModeStore};
pub use strip::{CHANNEL_COUNT, ChannelOwner, ChannelState, MAX_LEDS, PixelFrame};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write colors to one LED strip
    fn write(&mut self, channel: usize, colors: &[Rgb]);
}
