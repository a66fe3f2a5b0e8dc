//! Persistence of the selected animation mode
//!
//! Only the raw mode id is stored, a single small integer.

use core::convert::Infallible;

/// Key-value persistence of the last selected mode
pub trait ModeStore {
    type Error: core::fmt::Debug;

    /// Raw id of the last saved mode, if any
    fn load_mode(&mut self) -> Result<Option<u8>, Self::Error>;

    fn save_mode(&mut self, raw: u8) -> Result<(), Self::Error>;

    /// Forget the saved mode (factory reset)
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// In-RAM mode store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryModeStore {
    raw: Option<u8>,
    writes: u32,
}

impl MemoryModeStore {
    pub const fn new() -> Self {
        Self {
            raw: None,
            writes: 0,
        }
    }

    /// Store pre-seeded with a raw mode id
    pub const fn with_mode(raw: u8) -> Self {
        Self {
            raw: Some(raw),
            writes: 0,
        }
    }

    pub const fn raw(&self) -> Option<u8> {
        self.raw
    }

    /// Number of successful `save_mode` calls
    pub const fn writes(&self) -> u32 {
        self.writes
    }
}

impl ModeStore for MemoryModeStore {
    type Error = Infallible;

    fn load_mode(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.raw)
    }

    fn save_mode(&mut self, raw: u8) -> Result<(), Self::Error> {
        self.raw = Some(raw);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.raw = None;
        Ok(())
    }
}
