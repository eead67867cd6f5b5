//! Character geometry of the panel.

use crate::interface::DisplayError;

/// The N bit of the function set instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    /// 1 or 3 line panels
    OneOrThree,
    /// 2 or 4 line panels
    TwoOrFour,
}

impl LineMode {
    pub const fn function_set_bit(self) -> u8 {
        match self {
            LineMode::OneOrThree => 0x00,
            LineMode::TwoOrFour => 0x08,
        }
    }
}

/// Rows and columns of a character panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayGeometry {
    rows: u8,
    columns: u8,
}

impl DisplayGeometry {
    pub const MAX_ROWS: u8 = 4;
    /// The US2066 drives 100 SEG lines, 20 characters of 5 dots.
    pub const MAX_COLUMNS: u8 = 20;

    /// NHD-0216CW
    pub const NHD_0216: Self = DisplayGeometry {
        rows: 2,
        columns: 16,
    };
    /// NHD-0220CW
    pub const NHD_0220: Self = DisplayGeometry {
        rows: 2,
        columns: 20,
    };
    /// NHD-0420CW
    pub const NHD_0420: Self = DisplayGeometry {
        rows: 4,
        columns: 20,
    };

    pub fn new(rows: u8, columns: u8) -> Result<Self, DisplayError> {
        if rows == 0 || rows > Self::MAX_ROWS {
            return Err(DisplayError::InvalidRows(rows));
        }
        if columns == 0 || columns > Self::MAX_COLUMNS {
            return Err(DisplayError::InvalidColumns(columns));
        }
        Ok(DisplayGeometry { rows, columns })
    }

    pub const fn rows(&self) -> u8 {
        self.rows
    }

    pub const fn columns(&self) -> u8 {
        self.columns
    }

    pub const fn line_mode(&self) -> LineMode {
        match self.rows {
            2 | 4 => LineMode::TwoOrFour,
            _ => LineMode::OneOrThree,
        }
    }

    /// NW bit of the extended function set: 3/4 line addressing.
    pub const fn is_four_line(&self) -> bool {
        self.rows > 2
    }

    pub const fn contains(&self, column: u8, row: u8) -> bool {
        column < self.columns && row < self.rows
    }

    pub const fn row_addresses(&self) -> RowAddressTable {
        RowAddressTable::for_rows(self.rows)
    }
}

/// Set-DDRAM-address instruction for the first column of every row.
///
/// In 3/4 line mode rows start 0x20 apart. A 2 line panel runs in 1/2 line mode,
/// where the second row starts at DDRAM 0x40.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowAddressTable([u8; 4]);

impl RowAddressTable {
    pub const fn for_rows(rows: u8) -> Self {
        if rows == 2 {
            RowAddressTable([0x80, 0xc0, 0xc0, 0xe0])
        } else {
            RowAddressTable([0x80, 0xa0, 0xc0, 0xe0])
        }
    }

    pub fn base(&self, row: u8) -> Option<u8> {
        self.0.get(row as usize).copied()
    }
}
