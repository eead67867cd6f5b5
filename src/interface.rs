//! The display interface for US2066 OLED controllers.
//!
//! The controller's serial mode looks like SPI but is not byte aligned, so it is
//! bit-banged over plain output pins. Every frame on the wire is:
//!
//! ```text
//! 1 1 1 1 1 R/W D/C 0 | D0 D1 D2 D3 0 0 0 0 | D4 D5 D6 D7 0 0 0 0
//!   start byte        |  low nybble + fill  |  high nybble + fill
//! ```
//!
//! Each slot is put on the data line and then latched by one clock pulse.

use core::convert::Infallible;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;

/// Time the clock line is held at each level, in microseconds.
///
/// The US2066 needs >= 1us; delays below 3us are unreliable on most HALs.
pub const CLOCK_SETTLE_US: u32 = 3;

/// Clocked bit slots in one frame: start byte plus the padded payload.
pub const FRAME_BITS: usize = 24;

/// Clocked bit slots used by one payload byte.
pub const PAYLOAD_BITS: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    DataError,
    ClockError,
    CSError,
    ResetError,
    /// Row count outside 1..=4
    InvalidRows(u8),
    /// Column count outside 1..=20
    InvalidColumns(u8),
}

/// The two frame shapes the controller accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// D/C = 0, payload goes to the instruction register
    Command,
    /// D/C = 1, payload goes to DDRAM/CGRAM or is a command operand
    Data,
}

impl FrameKind {
    /// The start byte: 5 high bits, then R/W, D/C and the end bit.
    ///
    /// R/W is always 0 (write), there is no read path.
    pub const fn start_bits(self) -> [bool; 8] {
        let dc = matches!(self, FrameKind::Data);
        [true, true, true, true, true, false, dc, false]
    }
}

/// Line levels for one payload byte, in clock order.
///
/// Low nybble LSB first, four low filler bits, high nybble, four more filler bits.
pub fn payload_bits(byte: u8) -> [bool; PAYLOAD_BITS] {
    let mut bits = [false; PAYLOAD_BITS];
    for i in 0..4 {
        bits[i] = byte & (0x01 << i) != 0;
        bits[8 + i] = byte & (0x10 << i) != 0;
    }
    bits
}

/// Line levels for a whole frame, in clock order.
pub fn frame_bits(kind: FrameKind, byte: u8) -> [bool; FRAME_BITS] {
    let mut bits = [false; FRAME_BITS];
    bits[..8].copy_from_slice(&kind.start_bits());
    bits[8..].copy_from_slice(&payload_bits(byte));
    bits
}

/// Trait implemented by displays to provide implemenation of core functionality.
pub trait DisplayInterface {
    /// Send a command to the controller.
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError>;

    /// Send one data byte.
    fn send_data(&mut self, data: u8) -> Result<(), DisplayError>;

    /// Send data via iter, one frame per byte
    fn send_data_from_iter<'a, I>(&mut self, iter: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = &'a u8>,
    {
        let mut n = 0;
        for &d in iter {
            self.send_data(d)?;
            n += 1;
        }
        Ok(n)
    }

    /// Drive every connected line to its idle level.
    ///
    /// Data low, clock high, chip select high, reset high.
    fn set_idle(&mut self) -> Result<(), DisplayError>;

    /// Blocking pause, used after clear and at power on.
    fn delay_ms(&mut self, ms: u32);
}

/// Placeholder for a line that is hardwired instead of connected to a pin.
///
/// Chip select tied low, or reset tied high. It is never driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPin;

impl OutputPin for NoPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The lines wired between the MCU and the display.
///
/// `chip_select` and `reset` are optional; `None` means the signal is hardwired
/// and the driver never touches it.
#[derive(Debug)]
pub struct LinkConfig<SDI, SCLK, CS = NoPin, RST = NoPin> {
    /// SID, display pin 8
    pub data: SDI,
    /// SCLK, display pin 7
    pub clock: SCLK,
    /// /CS, display pin 15
    pub chip_select: Option<CS>,
    /// /RES, display pin 16
    pub reset: Option<RST>,
}

impl<SDI, SCLK> LinkConfig<SDI, SCLK> {
    /// Data and clock only, chip select tied low and reset tied high.
    pub fn new(data: SDI, clock: SCLK) -> Self {
        LinkConfig {
            data,
            clock,
            chip_select: None,
            reset: None,
        }
    }
}

impl<SDI, SCLK, CS, RST> LinkConfig<SDI, SCLK, CS, RST> {
    pub fn with_chip_select<P>(self, chip_select: P) -> LinkConfig<SDI, SCLK, P, RST> {
        LinkConfig {
            data: self.data,
            clock: self.clock,
            chip_select: Some(chip_select),
            reset: self.reset,
        }
    }

    pub fn with_reset<P>(self, reset: P) -> LinkConfig<SDI, SCLK, CS, P> {
        LinkConfig {
            data: self.data,
            clock: self.clock,
            chip_select: self.chip_select,
            reset: Some(reset),
        }
    }
}

/// US2066 bit-banged serial interface.
pub struct BitBangInterface<SDI, SCLK, CS, RST, DELAY> {
    link: LinkConfig<SDI, SCLK, CS, RST>,
    delay: DELAY,
}

impl<SDI, SCLK, CS, RST, DELAY> BitBangInterface<SDI, SCLK, CS, RST, DELAY>
where
    SDI: OutputPin,
    SCLK: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32> + DelayMs<u32>,
{
    pub fn new(link: LinkConfig<SDI, SCLK, CS, RST>, delay: DELAY) -> Self {
        BitBangInterface { link, delay }
    }

    /// Consume the display interface and return
    /// the GPIO pins and the delay used by it
    pub fn release(self) -> (LinkConfig<SDI, SCLK, CS, RST>, DELAY) {
        (self.link, self.delay)
    }

    /// One falling then rising edge on SCLK; the controller latches SID here.
    fn clock_pulse(&mut self) -> Result<(), DisplayError> {
        self.link
            .clock
            .set_low()
            .map_err(|_| DisplayError::ClockError)?;
        self.delay.delay_us(CLOCK_SETTLE_US);
        self.link
            .clock
            .set_high()
            .map_err(|_| DisplayError::ClockError)?;
        self.delay.delay_us(CLOCK_SETTLE_US);
        Ok(())
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), DisplayError> {
        let ret = if bit {
            self.link.data.set_high()
        } else {
            self.link.data.set_low()
        };
        ret.map_err(|_| DisplayError::DataError)?;
        self.clock_pulse()
    }

    /// Send one payload byte as 16 clocked slots.
    pub fn transmit_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        for bit in payload_bits(byte) {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    fn transmit_frame(&mut self, kind: FrameKind, byte: u8) -> Result<(), DisplayError> {
        for bit in kind.start_bits() {
            self.write_bit(bit)?;
        }
        self.transmit_byte(byte)
    }

    fn send_frame(&mut self, kind: FrameKind, byte: u8) -> Result<(), DisplayError> {
        // Assert chip select pin
        if let Some(cs) = self.link.chip_select.as_mut() {
            cs.set_low().map_err(|_| DisplayError::CSError)?;
        }

        let ret = self.transmit_frame(kind, byte);

        // Deassert chip select pin, even when the frame failed half way
        if let Some(cs) = self.link.chip_select.as_mut() {
            let released = cs.set_high().map_err(|_| DisplayError::CSError);
            ret?;
            return released;
        }

        ret
    }
}

impl<SDI, SCLK, CS, RST, DELAY> DisplayInterface for BitBangInterface<SDI, SCLK, CS, RST, DELAY>
where
    SDI: OutputPin,
    SCLK: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32> + DelayMs<u32>,
{
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.send_frame(FrameKind::Command, command)
    }

    fn send_data(&mut self, data: u8) -> Result<(), DisplayError> {
        self.send_frame(FrameKind::Data, data)
    }

    fn set_idle(&mut self) -> Result<(), DisplayError> {
        if let Some(rst) = self.link.reset.as_mut() {
            rst.set_high().map_err(|_| DisplayError::ResetError)?;
        }
        if let Some(cs) = self.link.chip_select.as_mut() {
            cs.set_high().map_err(|_| DisplayError::CSError)?;
        }
        self.link
            .data
            .set_low()
            .map_err(|_| DisplayError::DataError)?;
        self.link
            .clock
            .set_high()
            .map_err(|_| DisplayError::ClockError)?;
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
