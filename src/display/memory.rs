use super::{DisplayDevice, Frame};
use crate::{Error, Result};

/// In-memory panel that records every flushed frame; used in tests.
#[derive(Debug, Default)]
pub struct MemoryDevice {
    frames: Vec<Frame>,
    clears: usize,
    fail_clear: bool,
}

impl MemoryDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose `clear` always errors, for exercising best-effort cleanup.
    pub fn with_failing_clear() -> Self {
        Self {
            fail_clear: true,
            ..Self::default()
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn flush_count(&self) -> usize {
        self.frames.len()
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl DisplayDevice for MemoryDevice {
    fn clear(&mut self) -> Result<()> {
        if self.fail_clear {
            return Err(Error::Display("panel went away".into()));
        }
        self.clears += 1;
        Ok(())
    }

    fn flush(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
