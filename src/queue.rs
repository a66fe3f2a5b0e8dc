//! Coalescing control queue
//!
//! Button handlers and smart-home bridges may fire setter intents much
//! faster than the frame pump drains them. Hue, brightness and power
//! intents carry the full state of all four channels, so a newer one makes
//! a pending one of the same kind obsolete: it overwrites it in place
//! instead of taking a new slot. Mode intents always queue.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::control::ControlIntent;

/// No free slot and nothing to coalesce with; the intent is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub ControlIntent);

/// Nothing pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Pending intents, oldest first
///
/// Holds at most one intent of each setter kind plus the mode intents, in
/// `SIZE` slots.
pub struct IntentQueue<const SIZE: usize> {
    pending: Mutex<RefCell<Deque<ControlIntent, SIZE>>>,
}

impl<const SIZE: usize> IntentQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> IntentSender<'_, SIZE> {
        IntentSender { queue: self }
    }

    /// Handle for the frame pump
    pub const fn receiver(&self) -> IntentReceiver<'_, SIZE> {
        IntentReceiver { queue: self }
    }

    /// Queue `intent`, replacing a pending intent it supersedes.
    ///
    /// A replaced intent keeps its position, so it is still applied before
    /// any mode change queued after it.
    pub fn try_send(&self, intent: ControlIntent) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut pending = self.pending.borrow(cs).borrow_mut();
            if let Some(stale) = pending
                .iter_mut()
                .find(|queued| queued.is_superseded_by(&intent))
            {
                *stale = intent;
                return Ok(());
            }
            pending.push_back(intent).map_err(TrySendError)
        })
    }

    pub fn try_receive(&self) -> Result<ControlIntent, TryReceiveError> {
        critical_section::with(|cs| {
            self.pending
                .borrow(cs)
                .borrow_mut()
                .pop_front()
                .ok_or(TryReceiveError)
        })
    }

    /// Number of pending intents
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.pending.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for IntentQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle, any number may exist at once
#[derive(Clone, Copy)]
pub struct IntentSender<'a, const SIZE: usize> {
    queue: &'a IntentQueue<SIZE>,
}

impl<const SIZE: usize> IntentSender<'_, SIZE> {
    pub fn try_send(&self, intent: ControlIntent) -> Result<(), TrySendError> {
        self.queue.try_send(intent)
    }
}

/// Consumer handle
#[derive(Clone, Copy)]
pub struct IntentReceiver<'a, const SIZE: usize> {
    queue: &'a IntentQueue<SIZE>,
}

impl<const SIZE: usize> IntentReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Result<ControlIntent, TryReceiveError> {
        self.queue.try_receive()
    }
}
