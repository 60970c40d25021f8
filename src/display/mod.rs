//! Bitmap, layout and device plumbing for the OLED panel.

use crate::Result;

pub mod frame;
pub mod memory;
pub mod oled;
pub mod renderer;
pub mod scroll;

pub use frame::Frame;
pub use memory::MemoryDevice;
pub use oled::OledDevice;
pub use renderer::{render, Fonts, RenderReport};
pub use scroll::ScrollState;

pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

/// What the render loop needs from a panel once it is initialized.
pub trait DisplayDevice {
    fn clear(&mut self) -> Result<()>;
    fn flush(&mut self, frame: &Frame) -> Result<()>;
}

impl<D: DisplayDevice + ?Sized> DisplayDevice for &mut D {
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn flush(&mut self, frame: &Frame) -> Result<()> {
        (**self).flush(frame)
    }
}
