//! Recording fakes for the display lines and the delay provider.
//!
//! Every level change and delay request is appended to one shared trace, so the
//! tests can replay exactly what the controller would have seen.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;
use us2066::interface::{FrameKind, FRAME_BITS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Data,
    Clock,
    ChipSelect,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Set(Line, bool),
    DelayUs(u32),
    DelayMs(u32),
}

#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Event>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, line: Line) -> ProbePin {
        ProbePin {
            line,
            trace: self.clone(),
        }
    }

    pub fn delay(&self) -> ProbeDelay {
        ProbeDelay {
            trace: self.clone(),
        }
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn reset(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn writes_to(&self, line: Line) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Set(l, _) if *l == line))
            .count()
    }

    /// Last level requested on a line.
    pub fn level(&self, line: Line) -> Option<bool> {
        self.events().iter().rev().find_map(|e| match *e {
            Event::Set(l, level) if l == line => Some(level),
            _ => None,
        })
    }

    pub fn delays_ms(&self) -> Vec<u32> {
        self.events()
            .iter()
            .filter_map(|e| match *e {
                Event::DelayMs(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    /// Data line level at every rising clock edge.
    pub fn clocked_bits(&self) -> Vec<bool> {
        let mut bits = Vec::new();
        let mut data = false;
        let mut clock = None;
        for event in self.events() {
            match event {
                Event::Set(Line::Data, level) => data = level,
                Event::Set(Line::Clock, level) => {
                    if level && clock == Some(false) {
                        bits.push(data);
                    }
                    clock = Some(level);
                }
                _ => {}
            }
        }
        bits
    }

    /// Decode the clocked bits as back to back frames.
    pub fn frames(&self) -> Vec<(FrameKind, u8)> {
        let bits = self.clocked_bits();
        assert_eq!(bits.len() % FRAME_BITS, 0, "partial frame on the wire");
        bits.chunks(FRAME_BITS).map(decode_frame).collect()
    }
}

pub fn decode_frame(bits: &[bool]) -> (FrameKind, u8) {
    assert_eq!(bits.len(), FRAME_BITS);
    assert_eq!(bits[..5], [true; 5], "bad start pattern");
    assert!(!bits[5], "read bit set");
    assert!(!bits[7], "end bit set");
    assert_eq!(bits[12..16], [false; 4], "low filler not zero");
    assert_eq!(bits[20..24], [false; 4], "high filler not zero");

    let kind = if bits[6] {
        FrameKind::Data
    } else {
        FrameKind::Command
    };
    let mut byte = 0u8;
    for i in 0..4 {
        byte |= (bits[8 + i] as u8) << i;
        byte |= (bits[16 + i] as u8) << (4 + i);
    }
    (kind, byte)
}

pub struct ProbePin {
    line: Line,
    trace: Trace,
}

impl OutputPin for ProbePin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.trace.push(Event::Set(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.trace.push(Event::Set(self.line, true));
        Ok(())
    }
}

pub struct ProbeDelay {
    trace: Trace,
}

impl DelayUs<u32> for ProbeDelay {
    fn delay_us(&mut self, us: u32) {
        self.trace.push(Event::DelayUs(us));
    }
}

impl DelayMs<u32> for ProbeDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.trace.push(Event::DelayMs(ms));
    }
}

/// A pin whose every write fails.
pub struct BrokenPin;

impl OutputPin for BrokenPin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(())
    }
}

/// Frames `init` sends for a panel with `rows` rows, in order.
pub fn expected_init(rows: u8) -> Vec<(FrameKind, u8)> {
    use FrameKind::{Command as C, Data as D};

    let n = if rows == 2 || rows == 4 { 0x08 } else { 0x00 };
    let nw = if rows > 2 { 0x09 } else { 0x08 };
    vec![
        (C, 0x22 | n),
        (C, 0x71),
        (D, 0x5c),
        (C, 0x20 | n),
        (C, 0x08),
        (C, 0x22 | n),
        (C, 0x79),
        (C, 0xd5),
        (C, 0x70),
        (C, 0x78),
        (C, nw),
        (C, 0x06),
        (C, 0x72),
        (D, 0x0a),
        (C, 0x79),
        (C, 0xda),
        (C, 0x10),
        (C, 0xdc),
        (C, 0x00),
        (C, 0x81),
        (C, 0x7f),
        (C, 0xd9),
        (C, 0xf1),
        (C, 0xdb),
        (C, 0x40),
        (C, 0x78),
        (C, 0x20 | n),
        (C, 0x01),
        (C, 0x80),
        (C, 0x0c),
    ]
}
