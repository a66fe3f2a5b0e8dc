//! Frame pump and timing utilities.
//!
//! Drives the engine from wall-clock instants without async/await or
//! platform timers. The caller is responsible for sleeping between ticks.

use embassy_time::{Duration, Instant};
use rand_core::RngCore;

use crate::OutputDriver;
use crate::control::IntentProcessor;
use crate::engine::AnimationEngine;
use crate::store::ModeStore;
use crate::strip::ChannelOwner;

/// Default polling period. Effects pace themselves, this only bounds latency.
pub const DEFAULT_TICK_DURATION: Duration = Duration::from_millis(10);

/// Backlog allowed before the schedule resets, in ticks
pub const MAX_DRIFT_TICKS: u32 = 2;

/// Gaps longer than this are a stall and do not advance the effects
pub const MAX_FRAME_GAP: Duration = Duration::from_secs(1);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule).
    pub sleep_duration: Duration,
    /// The engine rendered a new animation frame during this tick.
    pub rendered: bool,
}

/// Portable frame pump.
///
/// Every tick it:
/// - applies pending control intents
/// - advances the engine by the time elapsed since the previous tick
/// - writes all four channel buffers to the output driver
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(engine, processor, driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct FrameScheduler<'a, R, S, O, D, const N: usize, const SIZE: usize>
where
    R: RngCore,
    S: ModeStore,
    O: ChannelOwner,
    D: OutputDriver,
{
    engine: AnimationEngine<R, S, O, N>,
    intents: IntentProcessor<'a, SIZE>,
    output: D,
    last_tick: Option<Instant>,
    next_tick: Instant,
    tick_duration: Duration,
}

impl<'a, R, S, O, D, const N: usize, const SIZE: usize> FrameScheduler<'a, R, S, O, D, N, SIZE>
where
    R: RngCore,
    S: ModeStore,
    O: ChannelOwner,
    D: OutputDriver,
{
    /// Create a scheduler polling at [`DEFAULT_TICK_DURATION`].
    pub fn new(
        engine: AnimationEngine<R, S, O, N>,
        intents: IntentProcessor<'a, SIZE>,
        output: D,
    ) -> Self {
        Self::with_tick_duration(engine, intents, output, DEFAULT_TICK_DURATION)
    }

    pub fn with_tick_duration(
        engine: AnimationEngine<R, S, O, N>,
        intents: IntentProcessor<'a, SIZE>,
        output: D,
        tick_duration: Duration,
    ) -> Self {
        Self {
            engine,
            intents,
            output,
            last_tick: None,
            next_tick: Instant::from_ticks(0),
            tick_duration,
        }
    }

    /// Run one tick and return timing information.
    ///
    /// A late wake-up passes its whole elapsed time to the engine, so the
    /// effects keep their rate whatever the polling period. A gap longer
    /// than [`MAX_FRAME_GAP`] is dropped instead of replayed, and a
    /// deadline more than [`MAX_DRIFT_TICKS`] ticks behind restarts from `now`.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.tick_duration * MAX_DRIFT_TICKS;
        if now > self.next_tick + max_drift {
            self.next_tick = now;
        }

        let elapsed = self
            .last_tick
            .and_then(|last| now.checked_duration_since(last))
            .filter(|gap| *gap <= MAX_FRAME_GAP)
            .unwrap_or(Duration::from_ticks(0));
        self.last_tick = Some(now);

        self.intents.process_pending(&mut self.engine);
        let rendered = self.engine.tick(elapsed);

        for (channel, colors) in self.engine.frame().iter().enumerate() {
            self.output.write(channel, colors);
        }

        self.next_tick += self.tick_duration;
        let sleep_duration = self
            .next_tick
            .checked_duration_since(now)
            .unwrap_or(Duration::from_ticks(0));

        FrameResult {
            next_deadline: self.next_tick,
            sleep_duration,
            rendered,
        }
    }

    pub const fn engine(&self) -> &AnimationEngine<R, S, O, N> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AnimationEngine<R, S, O, N> {
        &mut self.engine
    }

    pub const fn output(&self) -> &D {
        &self.output
    }
}
