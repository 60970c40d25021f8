//! SSD1306 panel over Linux i2c-dev, in buffered graphics mode.

use super::{DisplayDevice, Frame};
use crate::{config::OledAddr, Error, Result};

#[cfg(target_os = "linux")]
use {
    crate::config::OLED_ADDR_CANDIDATES,
    embedded_graphics::{pixelcolor::BinaryColor, prelude::*},
    embedded_hal::i2c::I2c,
    linux_embedded_hal::I2cdev,
    ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306},
};

#[cfg(target_os = "linux")]
type Panel =
    Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

#[cfg(target_os = "linux")]
pub struct OledDevice {
    panel: Panel,
    addr: u8,
}

#[cfg(target_os = "linux")]
impl OledDevice {
    /// Open the bus, locate the panel and run the SSD1306 init sequence.
    /// The panel is blanked before this returns.
    pub fn open(bus_path: &str, addr: OledAddr) -> Result<Self> {
        let mut i2c = I2cdev::new(bus_path)
            .map_err(|e| Error::Display(format!("cannot open {bus_path}: {e}")))?;
        let addr = match addr {
            OledAddr::Addr(a) => a,
            OledAddr::Auto => detect_address(&mut i2c, &OLED_ADDR_CANDIDATES).ok_or_else(|| {
                Error::Display(format!("no SSD1306 answered on {bus_path} at 0x3c or 0x3d"))
            })?,
        };

        let interface = I2CDisplayInterface::new_custom_address(i2c, addr);
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel
            .init()
            .map_err(|e| Error::Display(format!("init at {addr:#04x} failed: {e:?}")))?;

        let mut device = Self { panel, addr };
        device.clear()?;
        Ok(device)
    }

    pub fn addr(&self) -> u8 {
        self.addr
    }
}

#[cfg(target_os = "linux")]
impl DisplayDevice for OledDevice {
    fn clear(&mut self) -> Result<()> {
        self.panel.clear_buffer();
        self.panel
            .flush()
            .map_err(|e| Error::Display(format!("flush failed: {e:?}")))
    }

    fn flush(&mut self, frame: &Frame) -> Result<()> {
        if frame.size() != self.panel.size() {
            return Err(Error::Display(format!(
                "frame is {}x{}, panel is {}x{}",
                frame.width(),
                frame.height(),
                self.panel.size().width,
                self.panel.size().height
            )));
        }
        let pixels = frame
            .iter_pixels()
            .map(|(x, y, on)| Pixel(Point::new(x as i32, y as i32), BinaryColor::from(on)));
        self.panel
            .draw_iter(pixels)
            .map_err(|e| Error::Display(format!("draw failed: {e:?}")))?;
        self.panel
            .flush()
            .map_err(|e| Error::Display(format!("flush failed: {e:?}")))
    }
}

/// First candidate address that ACKs a bare control byte.
#[cfg(target_os = "linux")]
fn detect_address(i2c: &mut I2cdev, candidates: &[u8]) -> Option<u8> {
    candidates
        .iter()
        .copied()
        .find(|&addr| i2c.write(addr, &[0x00]).is_ok())
}

/// Non-Linux stub so the crate builds on dev hosts; opening always fails.
#[cfg(not(target_os = "linux"))]
pub struct OledDevice;

#[cfg(not(target_os = "linux"))]
impl OledDevice {
    pub fn open(bus_path: &str, addr: OledAddr) -> Result<Self> {
        Err(Error::Display(format!(
            "SSD1306 at {addr} on {bus_path} needs Linux i2c-dev"
        )))
    }

    pub fn addr(&self) -> u8 {
        0
    }
}

#[cfg(not(target_os = "linux"))]
impl DisplayDevice for OledDevice {
    fn clear(&mut self) -> Result<()> {
        Err(Error::Display("SSD1306 output needs Linux i2c-dev".into()))
    }

    fn flush(&mut self, _frame: &Frame) -> Result<()> {
        Err(Error::Display("SSD1306 output needs Linux i2c-dev".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bus_is_an_init_error() {
        let err = OledDevice::open("/dev/i2c-does-not-exist", OledAddr::Addr(0x3c))
            .err()
            .expect("open should fail without a bus");
        assert!(matches!(err, Error::Display(_)));
    }
}
