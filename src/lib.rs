//! Driver for character OLED displays built on the US2066 controller
//! (Newhaven NHD-0216CW, NHD-0220CW, NHD-0420CW and friends).
//!
//! The display is driven over its serial interface, bit-banged on plain output
//! pins, so it can share a board with hardware SPI devices. Chip select and reset
//! are optional: tie /CS low and /RES high and leave them out of the [`LinkConfig`].
//!
//! ```ignore
//! let link = LinkConfig::new(sid, sclk).with_chip_select(cs);
//! let mut oled = Us2066::bit_banged(link, delay, DisplayGeometry::NHD_0216);
//! oled.init()?;
//!
//! let mut text = CharacterDisplay::new(oled);
//! write!(text, "Hello, world!")?;
//! ```
//!
//! The transport is write only. Nothing is read back, so a lost frame can not be
//! detected; re-run [`Us2066::init`] if a pin write fails.

#![no_std]

pub mod command;
pub mod display;
pub mod interface;
pub mod text;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;

pub use command::{Command, Operand};
pub use display::{DisplayGeometry, LineMode, RowAddressTable};
pub use interface::{BitBangInterface, DisplayError, DisplayInterface, LinkConfig, NoPin};
pub use text::CharacterDisplay;

/// Pause after a clear display instruction.
pub const CLEAR_DELAY_MS: u32 = 2;

/// Stabilization pause after the display is switched on at init.
pub const POWER_ON_DELAY_MS: u32 = 250;

pub struct Us2066<DI: DisplayInterface> {
    pub interface: DI,
    geometry: DisplayGeometry,
}

impl<SDI, SCLK, CS, RST, DELAY> Us2066<BitBangInterface<SDI, SCLK, CS, RST, DELAY>>
where
    SDI: OutputPin,
    SCLK: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32> + DelayMs<u32>,
{
    pub fn bit_banged(
        link: LinkConfig<SDI, SCLK, CS, RST>,
        delay: DELAY,
        geometry: DisplayGeometry,
    ) -> Self {
        Self::new(BitBangInterface::new(link, delay), geometry)
    }
}

impl<DI: DisplayInterface> Us2066<DI> {
    pub fn new(interface: DI, geometry: DisplayGeometry) -> Self {
        Self {
            interface,
            geometry,
        }
    }

    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// Consume the driver and return the interface
    pub fn release(self) -> DI {
        self.interface
    }

    /// Send a raw command byte.
    pub fn command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.interface.send_command(command)
    }

    /// Send a raw data byte.
    pub fn data(&mut self, data: u8) -> Result<(), DisplayError> {
        self.interface.send_data(data)
    }

    /// Send an instruction and its operand, if any.
    pub fn send(&mut self, command: Command) -> Result<(), DisplayError> {
        self.interface.send_command(command.opcode())?;
        match command.operand() {
            Some(Operand::Command(a)) => self.interface.send_command(a),
            Some(Operand::Data(a)) => self.interface.send_data(a),
            None => Ok(()),
        }
    }

    fn function_set(&mut self, extended: bool) -> Result<(), DisplayError> {
        let lines = self.geometry.line_mode();
        self.send(Command::FunctionSet { extended, lines })
    }

    /// Bring the controller from reset to a cleared, switched on display.
    ///
    /// Blocks for about 252 ms.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "us2066 init {}x{}",
            self.geometry.columns(),
            self.geometry.rows()
        );

        self.interface.set_idle()?;

        self.function_set(true)?;
        self.send(Command::FunctionSelectA {
            internal_regulator: true,
        })?;
        self.function_set(false)?;
        self.set_display(false, false, false)?;

        self.function_set(true)?;
        self.send(Command::OledCharacterization { enabled: true })?;
        self.send(Command::ClockDivider(command::DEFAULT_CLOCK_DIVIDER))?;
        self.send(Command::OledCharacterization { enabled: false })?;

        self.send(Command::ExtendedFunctionSet {
            six_dot_font: false,
            inverting_cursor: false,
            four_line: self.geometry.is_four_line(),
        })?;
        // COM0 -> COM31, SEG99 -> SEG0
        self.send(Command::ScanDirection {
            com_forward: true,
            seg_forward: false,
        })?;
        self.send(Command::FunctionSelectB(command::DEFAULT_ROM_SELECTION))?;

        self.send(Command::OledCharacterization { enabled: true })?;
        self.send(Command::SegPinConfig(command::DEFAULT_SEG_CONFIG))?;
        self.send(Command::FunctionSelectC(command::DEFAULT_FUNCTION_C))?;
        self.send(Command::Contrast(command::DEFAULT_CONTRAST))?;
        self.send(Command::PhaseLength(command::DEFAULT_PHASE_LENGTH))?;
        self.send(Command::VcomhDeselect(command::DEFAULT_VCOMH_DESELECT))?;
        self.send(Command::OledCharacterization { enabled: false })?;
        self.function_set(false)?;

        self.clear()?;
        self.home()?;
        self.set_display(true, false, false)?;
        self.interface.delay_ms(POWER_ON_DELAY_MS);

        #[cfg(feature = "defmt")]
        defmt::debug!("us2066 ready");
        Ok(())
    }

    /// Switch the display off and park every line at its idle level.
    pub fn shutdown(&mut self) -> Result<(), DisplayError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("us2066 shutdown");

        self.function_set(false)?;
        self.set_display(false, false, false)?;
        self.interface.set_idle()
    }

    /// Clear DDRAM and home the address counter. Blocks for 2 ms.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.send(Command::ClearDisplay)?;
        self.interface.delay_ms(CLEAR_DELAY_MS);
        Ok(())
    }

    /// Move the address counter to DDRAM 0 without touching its content.
    pub fn home(&mut self) -> Result<(), DisplayError> {
        self.set_ddram_address(0)
    }

    pub fn set_ddram_address(&mut self, address: u8) -> Result<(), DisplayError> {
        self.send(Command::SetDdramAddress(address))
    }

    /// Display ON/OFF control. Expects the fundamental instruction set (RE=0).
    pub fn set_display(
        &mut self,
        display: bool,
        cursor: bool,
        blink: bool,
    ) -> Result<(), DisplayError> {
        self.send(Command::DisplayControl {
            display,
            cursor,
            blink,
        })
    }

    /// Set the OLED contrast, 0x00..=0xFF.
    ///
    /// Passes through the OLED command set and returns to RE=0.
    pub fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("us2066 contrast {=u8}", level);

        self.function_set(true)?;
        self.send(Command::OledCharacterization { enabled: true })?;
        self.send(Command::Contrast(level))?;
        self.send(Command::OledCharacterization { enabled: false })?;
        self.function_set(false)
    }
}
