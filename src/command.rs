//! Command Table
//!
//! The US2066 instruction set is modal: the same opcode means different things
//! depending on the RE (extended) and SD (OLED characterization) flags, so the table
//! is a typed enum rather than a flat list of opcodes. Every variant notes which
//! mode it must be sent in.

use crate::display::LineMode;

/// Default oscillator setting, divide ratio=1, frequency=7
pub const DEFAULT_CLOCK_DIVIDER: u8 = 0x70;
/// ROM C, CGROM=250, CGRAM=6 (ROM=10, OPR=10)
pub const DEFAULT_ROM_SELECTION: u8 = 0x0a;
/// Alternative odd/even SEG pins, no left/right remap
pub const DEFAULT_SEG_CONFIG: u8 = 0x10;
/// Internal VSL, GPIO input disabled
pub const DEFAULT_FUNCTION_C: u8 = 0x00;
pub const DEFAULT_CONTRAST: u8 = 0x7f;
/// phase2=15, phase1=1
pub const DEFAULT_PHASE_LENGTH: u8 = 0xf1;
/// 1 x Vcc
pub const DEFAULT_VCOMH_DESELECT: u8 = 0x40;

/// Internal Vdd regulator on, 5V I/O
const REGULATOR_ENABLED: u8 = 0x5c;
/// Internal Vdd regulator off, 2.8V I/O
const REGULATOR_DISABLED: u8 = 0x00;

/// Second byte of a two byte instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operand {
    /// Sent as a command frame
    Command(u8),
    /// Sent as a data frame
    Data(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Write 0x20 to all DDRAM and set the address counter to 0.
    ///
    /// Needs 1-2 ms before the next instruction. Any mode.
    ClearDisplay,
    /// <<1:b1, A:b7>>, A = DDRAM address. RE=0.
    SetDdramAddress(u8),
    /// <<0:b4, 1:b1, D:b1, C:b1, B:b1>>. RE=0.
    ///
    /// D = display on, C = cursor on, B = cursor blink on
    DisplayControl {
        display: bool,
        cursor: bool,
        blink: bool,
    },
    /// <<0:b2, 1:b1, 0:b1, N:b1, DH:b1, RE:b1, IS:b1>>
    ///
    /// N selects 2/4 line (1) or 1/3 line (0) operation. RE switches between the
    /// fundamental (0) and extended (1) instruction sets. DH and IS are left 0.
    FunctionSet { extended: bool, lines: LineMode },
    /// <<0:b4, 1:b1, FW:b1, B/W:b1, NW:b1>>. RE=1.
    ///
    /// FW = 6-dot font, B/W = inverting cursor, NW = 3/4 line display
    ExtendedFunctionSet {
        six_dot_font: bool,
        inverting_cursor: bool,
        four_line: bool,
    },
    /// <<0:b5, 1:b1, BDC:b1, BDS:b1>>. RE=1.
    ///
    /// BDC=1: COM0 -> COM31, BDS=1: SEG0 -> SEG99
    ScanDirection { com_forward: bool, seg_forward: bool },
    /// 0x71, data A. RE=1.
    ///
    /// Enable (5V I/O) or disable (2.8V I/O) the internal Vdd regulator.
    FunctionSelectA { internal_regulator: bool },
    /// 0x72, data A. RE=1.
    ///
    /// ## A
    /// <<0:b4, ROM:b2, OPR:b2>>, CGROM/CGRAM split and ROM A/B/C
    FunctionSelectB(u8),
    /// <<0:b4, 1:b1, 0:b2, SD:b1>>. RE=1.
    ///
    /// SD=1 enables the OLED command set (0x81, 0xD5, 0xD9, 0xDA, 0xDB, 0xDC).
    OledCharacterization { enabled: bool },
    /// 0xD5, A. RE=1, SD=1.
    ///
    /// <<F:b4, D:b4>>, oscillator frequency and divide ratio
    ClockDivider(u8),
    /// 0xDA, A. RE=1, SD=1.
    ///
    /// <<0:b2, L/R:b1, ALT:b1, 0:b4>>, SEG pin hardware configuration
    SegPinConfig(u8),
    /// 0xDC, A. RE=1, SD=1.
    ///
    /// <<VSL:b1, 0:b5, GPIO:b2>>
    FunctionSelectC(u8),
    /// 0x81, A. RE=1, SD=1. 256 steps, POR 0x7F
    Contrast(u8),
    /// 0xD9, A. RE=1, SD=1.
    ///
    /// <<P2:b4, P1:b4>>
    PhaseLength(u8),
    /// 0xDB, A. RE=1, SD=1.
    ///
    /// <<0:b1, V:b3, 0:b4>>
    VcomhDeselect(u8),
}

impl Command {
    /// First byte on the wire, always a command frame.
    pub const fn opcode(self) -> u8 {
        match self {
            Command::ClearDisplay => 0x01,
            Command::SetDdramAddress(addr) => 0x80 | (addr & 0x7f),
            Command::DisplayControl {
                display,
                cursor,
                blink,
            } => 0x08 | (display as u8) << 2 | (cursor as u8) << 1 | blink as u8,
            Command::FunctionSet { extended, lines } => {
                0x20 | lines.function_set_bit() | (extended as u8) << 1
            }
            Command::ExtendedFunctionSet {
                six_dot_font,
                inverting_cursor,
                four_line,
            } => {
                0x08 | (six_dot_font as u8) << 2 | (inverting_cursor as u8) << 1 | four_line as u8
            }
            Command::ScanDirection {
                com_forward,
                seg_forward,
            } => 0x04 | (com_forward as u8) << 1 | seg_forward as u8,
            Command::FunctionSelectA { .. } => 0x71,
            Command::FunctionSelectB(_) => 0x72,
            Command::OledCharacterization { enabled } => 0x78 | enabled as u8,
            Command::ClockDivider(_) => 0xd5,
            Command::SegPinConfig(_) => 0xda,
            Command::FunctionSelectC(_) => 0xdc,
            Command::Contrast(_) => 0x81,
            Command::PhaseLength(_) => 0xd9,
            Command::VcomhDeselect(_) => 0xdb,
        }
    }

    /// Second byte, if the instruction takes one.
    pub const fn operand(self) -> Option<Operand> {
        match self {
            Command::FunctionSelectA { internal_regulator } => Some(Operand::Data(
                if internal_regulator {
                    REGULATOR_ENABLED
                } else {
                    REGULATOR_DISABLED
                },
            )),
            Command::FunctionSelectB(a) => Some(Operand::Data(a)),
            Command::ClockDivider(a)
            | Command::SegPinConfig(a)
            | Command::FunctionSelectC(a)
            | Command::Contrast(a)
            | Command::PhaseLength(a)
            | Command::VcomhDeselect(a) => Some(Operand::Command(a)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_set_carries_line_bit() {
        let two = LineMode::TwoOrFour;
        let one = LineMode::OneOrThree;
        assert_eq!(Command::FunctionSet { extended: true, lines: two }.opcode(), 0x2a);
        assert_eq!(Command::FunctionSet { extended: false, lines: two }.opcode(), 0x28);
        assert_eq!(Command::FunctionSet { extended: true, lines: one }.opcode(), 0x22);
        assert_eq!(Command::FunctionSet { extended: false, lines: one }.opcode(), 0x20);
    }

    #[test]
    fn bitfield_opcodes() {
        let off = Command::DisplayControl {
            display: false,
            cursor: false,
            blink: false,
        };
        let on = Command::DisplayControl {
            display: true,
            cursor: false,
            blink: false,
        };
        assert_eq!(off.opcode(), 0x08);
        assert_eq!(on.opcode(), 0x0c);

        let ext = |four_line| Command::ExtendedFunctionSet {
            six_dot_font: false,
            inverting_cursor: false,
            four_line,
        };
        assert_eq!(ext(false).opcode(), 0x08);
        assert_eq!(ext(true).opcode(), 0x09);

        let scan = Command::ScanDirection {
            com_forward: true,
            seg_forward: false,
        };
        assert_eq!(scan.opcode(), 0x06);
        assert_eq!(Command::OledCharacterization { enabled: true }.opcode(), 0x79);
        assert_eq!(Command::OledCharacterization { enabled: false }.opcode(), 0x78);
        assert_eq!(Command::SetDdramAddress(0x00).opcode(), 0x80);
        assert_eq!(Command::SetDdramAddress(0xc0).opcode(), 0xc0);
    }

    #[test]
    fn operands() {
        assert_eq!(
            Command::FunctionSelectA {
                internal_regulator: true
            }
            .operand(),
            Some(Operand::Data(0x5c))
        );
        assert_eq!(
            Command::FunctionSelectB(DEFAULT_ROM_SELECTION).operand(),
            Some(Operand::Data(0x0a))
        );
        assert_eq!(
            Command::Contrast(DEFAULT_CONTRAST).operand(),
            Some(Operand::Command(0x7f))
        );
        assert_eq!(Command::ClearDisplay.operand(), None);
    }
}
