//! Six-digit multiplexed seven-segment display.
//!
//! Only one digit is lit at a time. Each display tick blanks the segment bus,
//! selects the next digit through the address decoder and puts that digit's
//! pattern on the bus; at a 1 ms tick the eye fuses the six digits.

use core::sync::atomic::{AtomicU8, Ordering};

use embedded_hal::digital::v2::OutputPin;

use crate::config::DIGITS;
use crate::phase::Phase;

/// Segment patterns for 0-9. Bit 0 is segment a, bit 6 is g, bit 7 the
/// decimal point. The bus is active low, so a cleared bit lights a segment.
pub const SEGMENTS: [u8; 10] = [
    !0b0011_1111,
    !0b0000_0110,
    !0b0101_1011,
    !0b0100_1111,
    !0b0110_0110,
    !0b0110_1101,
    !0b0111_1101,
    !0b0000_0111,
    !0b0111_1111,
    !0b0110_1111,
];

/// All segments off.
pub const BLANK: u8 = 0xFF;

/// Where on the display the countdown is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Positions 4 and 5.
    Upper,
    /// Positions 2 and 3.
    Middle,
    /// All six positions, least significant digit at position 0.
    Full,
}

impl Zone {
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Red => Zone::Upper,
            Phase::Yellow => Zone::Middle,
            Phase::Green => Zone::Full,
        }
    }
}

/// Renders `value` into per-position patterns.
///
/// Digits are taken least significant first, so position 0 holds the units.
/// Zeros above the most significant non-zero digit are blanked, the units
/// digit never is. Values above 999 999 keep their lower six digits. The
/// two-digit zones move the units and tens into their positions and blank
/// the rest.
pub fn layout(value: u32, zone: Zone) -> [u8; DIGITS] {
    let mut digits = [0u8; DIGITS];
    let mut rest = value;
    for digit in digits.iter_mut() {
        *digit = (rest % 10) as u8;
        rest /= 10;
    }

    let significant = digits.iter().rposition(|&d| d != 0).unwrap_or(0);
    let mut natural = [BLANK; DIGITS];
    for (slot, &digit) in natural.iter_mut().zip(&digits).take(significant + 1) {
        *slot = SEGMENTS[usize::from(digit)];
    }

    match zone {
        Zone::Upper => [BLANK, BLANK, BLANK, BLANK, natural[0], natural[1]],
        Zone::Middle => [BLANK, BLANK, natural[0], natural[1], BLANK, BLANK],
        Zone::Full => natural,
    }
}

/// Per-position patterns shared between the idle loop (writer) and the
/// refresh in the display tick (reader).
pub struct DigitBuffer {
    cells: [AtomicU8; DIGITS],
}

#[allow(clippy::declare_interior_mutable_const)]
const BLANK_CELL: AtomicU8 = AtomicU8::new(BLANK);

impl DigitBuffer {
    pub const fn new() -> Self {
        Self {
            cells: [BLANK_CELL; DIGITS],
        }
    }

    /// Rewrites the whole buffer for `value` shown in `zone`.
    pub fn recompute(&self, value: u32, zone: Zone) {
        for (cell, pattern) in self.cells.iter().zip(layout(value, zone)) {
            cell.store(pattern, Ordering::Relaxed);
        }
    }

    pub fn pattern(&self, position: usize) -> u8 {
        self.cells[position].load(Ordering::Relaxed)
    }

    pub fn patterns(&self) -> [u8; DIGITS] {
        core::array::from_fn(|position| self.pattern(position))
    }
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// The eight segment lines, bit 0 on `pins[0]`.
pub struct SegmentBus<P> {
    pins: [P; 8],
}

impl<P: OutputPin> SegmentBus<P> {
    pub fn new(pins: [P; 8]) -> Self {
        let mut bus = Self { pins };
        bus.write(BLANK);
        bus
    }

    pub fn write(&mut self, pattern: u8) {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if pattern & (1 << bit) != 0 {
                let _ = pin.set_high();
            } else {
                let _ = pin.set_low();
            }
        }
    }

    pub fn blank(&mut self) {
        self.write(BLANK);
    }
}

/// Address lines into the digit decoder, plus its active-low output enable.
pub struct SelectBus<P> {
    address: [P; 3],
    enable: P,
}

impl<P: OutputPin> SelectBus<P> {
    /// The decoder starts disabled.
    pub fn new(address: [P; 3], mut enable: P) -> Self {
        let _ = enable.set_high();
        Self { address, enable }
    }

    /// Turns on the decoder outputs.
    pub fn enable(&mut self) {
        let _ = self.enable.set_low();
    }

    pub fn select(&mut self, channel: usize) {
        for (bit, pin) in self.address.iter_mut().enumerate() {
            if channel & (1 << bit) != 0 {
                let _ = pin.set_high();
            } else {
                let _ = pin.set_low();
            }
        }
    }
}

pub struct Multiplexer<P> {
    segments: SegmentBus<P>,
    select: SelectBus<P>,
    cursor: usize,
}

impl<P: OutputPin> Multiplexer<P> {
    pub fn new(segments: SegmentBus<P>, select: SelectBus<P>) -> Self {
        Self {
            segments,
            select,
            cursor: 0,
        }
    }

    /// Enables the digit decoder. Part of start-up, before the first refresh.
    pub fn enable(&mut self) {
        self.select.enable();
    }

    /// Lights the digit under the cursor and moves the cursor on.
    ///
    /// Returns the channel selected and the pattern written. Blanking the
    /// segments first keeps the previous pattern from ghosting onto the newly
    /// selected digit.
    pub fn refresh(&mut self, buffer: &DigitBuffer) -> (usize, u8) {
        let channel = self.cursor;
        let pattern = buffer.pattern(channel);

        self.segments.blank();
        self.select.select(channel);
        self.segments.write(pattern);

        self.cursor = (self.cursor + 1) % DIGITS;
        (channel, pattern)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
