//! APA102 (DotStar) LED strip driver.
//!
//! Frame layout on the SPI bus:
//!
//! ```text
//! ┌────────────┬──────────────────────────────┬──────────────────┐
//! │ start      │ one quad per LED             │ end              │
//! │ 00 00 00 00│ E0|bri  B  G  R   (× N)      │ FF × max(4,N/16) │
//! └────────────┴──────────────────────────────┴──────────────────┘
//! ```
//!
//! The reference flower wires its strip in BGR order with global
//! brightness 31.  A write sends the whole frame in one `SpiBus::write`,
//! so the strip either latches the new frame or keeps the old one.

use embedded_hal::spi::SpiBus;
use log::warn;

use crate::app::ports::LedPort;
use crate::color::{MAX_LEDS, Rgb};
use crate::error::ActuatorError;

/// Maximum global brightness (5-bit field).
pub const MAX_BRIGHTNESS: u8 = 31;

const START_FRAME_LEN: usize = 4;
const BUF_CAP: usize = START_FRAME_LEN + MAX_LEDS * 4 + MAX_LEDS / 16 + 4;

/// Channel order of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrder {
    Rgb,
    Bgr,
}

pub struct Apa102<S> {
    spi: S,
    led_count: usize,
    brightness: u8,
    order: PixelOrder,
    buf: heapless::Vec<u8, BUF_CAP>,
}

impl<S: SpiBus<u8>> Apa102<S> {
    /// `led_count` is capped at [`MAX_LEDS`], brightness at [`MAX_BRIGHTNESS`].
    pub fn new(spi: S, led_count: usize, brightness: u8, order: PixelOrder) -> Self {
        Self {
            spi,
            led_count: led_count.min(MAX_LEDS),
            brightness: brightness.min(MAX_BRIGHTNESS),
            order,
            buf: heapless::Vec::new(),
        }
    }

    /// Encode `colors` into the internal frame buffer and return it.
    pub fn encode(&mut self, colors: &[Rgb]) -> Result<&[u8], ActuatorError> {
        if colors.len() != self.led_count {
            return Err(ActuatorError::LedCountMismatch {
                expected: self.led_count,
                got: colors.len(),
            });
        }

        self.buf.clear();
        let header = 0xE0 | self.brightness;
        let end_len = (self.led_count.div_ceil(16)).max(4);

        // Lengths are bounded by BUF_CAP for any led_count <= MAX_LEDS.
        let _ = self.buf.extend_from_slice(&[0u8; START_FRAME_LEN]);
        for &(r, g, b) in colors {
            let quad = match self.order {
                PixelOrder::Bgr => [header, b, g, r],
                PixelOrder::Rgb => [header, r, g, b],
            };
            let _ = self.buf.extend_from_slice(&quad);
        }
        for _ in 0..end_len {
            let _ = self.buf.push(0xFF);
        }
        Ok(&self.buf)
    }

    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiBus<u8> + Send> LedPort for Apa102<S> {
    fn led_count(&self) -> usize {
        self.led_count
    }

    fn set_colors(&mut self, colors: &[Rgb]) -> Result<(), ActuatorError> {
        self.encode(colors)?;
        let spi_result = self
            .spi
            .write(&self.buf)
            .and_then(|()| self.spi.flush());
        spi_result.map_err(|e| {
            warn!("APA102: SPI write failed: {:?}", e);
            ActuatorError::SpiWriteFailed
        })
    }
}
