//! Cursor addressed text output on top of [`Us2066`].
//!
//! The cursor lives here, not in the controller driver. Every character is
//! written with an explicit set-DDRAM-address first, so the layer never depends
//! on the controller's own address counter.
//!
//! Positions outside the panel are ignored rather than reported.

use core::fmt;

use crate::display::RowAddressTable;
use crate::interface::{DisplayError, DisplayInterface};
use crate::{Command, Us2066};

pub struct CharacterDisplay<DI: DisplayInterface> {
    driver: Us2066<DI>,
    rows: RowAddressTable,
    column: u8,
    row: u8,
}

impl<DI: DisplayInterface> CharacterDisplay<DI> {
    /// Wrap an initialized driver. The cursor starts at (0, 0).
    pub fn new(driver: Us2066<DI>) -> Self {
        let rows = driver.geometry().row_addresses();
        CharacterDisplay {
            driver,
            rows,
            column: 0,
            row: 0,
        }
    }

    pub fn driver(&mut self) -> &mut Us2066<DI> {
        &mut self.driver
    }

    pub fn release(self) -> Us2066<DI> {
        self.driver
    }

    /// Current (column, row).
    pub fn cursor(&self) -> (u8, u8) {
        (self.column, self.row)
    }

    /// Clear the panel and home the cursor. Blocks for 2 ms.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.driver.clear()?;
        self.column = 0;
        self.row = 0;
        Ok(())
    }

    /// Move the cursor without writing. Out of range positions are ignored.
    pub fn set_cursor(&mut self, column: u8, row: u8) {
        if self.driver.geometry().contains(column, row) {
            self.column = column;
            self.row = row;
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("cursor ({=u8}, {=u8}) off panel, ignored", column, row);
        }
    }

    /// Write one character at (column, row) and advance the cursor past it.
    ///
    /// Returns the number of characters written, 0 when the position is off the
    /// panel (nothing is sent and the cursor stays put).
    pub fn write_at(&mut self, column: u8, row: u8, c: u8) -> Result<u8, DisplayError> {
        if !self.driver.geometry().contains(column, row) {
            #[cfg(feature = "defmt")]
            defmt::warn!("write at ({=u8}, {=u8}) off panel, ignored", column, row);
            return Ok(0);
        }
        self.column = column;
        self.row = row;
        self.write_byte(c)?;
        Ok(1)
    }

    /// Write one character at the cursor and advance it, wrapping to the next row
    /// and from the last row back to the first.
    pub fn write_byte(&mut self, c: u8) -> Result<(), DisplayError> {
        self.move_to(self.column, self.row)?;
        self.driver.data(c)?;
        self.advance();
        Ok(())
    }

    /// Fill the whole panel row by row.
    ///
    /// Input beyond rows * columns is ignored, short input is padded with spaces.
    /// The cursor ends at (0, 0). Returns the number of cells written.
    pub fn write_screen(&mut self, s: &[u8]) -> Result<u16, DisplayError> {
        let geometry = self.driver.geometry();
        let columns = geometry.columns() as usize;

        self.clear()?;
        for row in 0..geometry.rows() {
            self.move_to(0, row)?;
            let start = row as usize * columns;
            let line = s.get(start..).unwrap_or(&[]);
            let line = &line[..line.len().min(columns)];
            self.driver.interface.send_data_from_iter(line)?;
            for _ in line.len()..columns {
                self.driver.data(b' ')?;
            }
        }
        self.column = 0;
        self.row = 0;

        Ok(geometry.rows() as u16 * geometry.columns() as u16)
    }

    fn move_to(&mut self, column: u8, row: u8) -> Result<(), DisplayError> {
        // rows beyond the table never pass `contains`
        let base = self.rows.base(row).unwrap_or(0x80);
        self.driver.send(Command::SetDdramAddress(base + column))
    }

    fn advance(&mut self) {
        let geometry = self.driver.geometry();
        self.column += 1;
        if self.column >= geometry.columns() {
            self.column = 0;
            self.row += 1;
        }
        if self.row >= geometry.rows() {
            self.row = 0;
        }
    }
}

impl<DI: DisplayInterface> fmt::Write for CharacterDisplay<DI> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            self.write_byte(b).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}
