//! Buzzer timing and output.
//!
//! Timing and output live in different contexts: [`BuzzerState`] counts
//! display ticks inside the interrupt handler, [`Buzzer`] flips the line from
//! the idle loop once the handler has raised `buzzer_due`.

use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};

use crate::config::{BUZZER_FAST_TICKS, BUZZER_NORMAL_TICKS};
use crate::phase::Phase;

#[derive(Debug, Clone)]
pub struct BuzzerState {
    tick_counter: u16,
    tick_threshold: u16,
}

impl BuzzerState {
    pub const fn new() -> Self {
        Self {
            tick_counter: 0,
            tick_threshold: BUZZER_NORMAL_TICKS,
        }
    }

    /// Counts one display tick.
    pub fn advance(&mut self) {
        self.tick_counter += 1;
    }

    /// Whether the threshold has been reached; restarts the count if so.
    pub fn take_due(&mut self) -> bool {
        if self.tick_counter >= self.tick_threshold {
            self.tick_counter = 0;
            true
        } else {
            false
        }
    }

    /// Counts one display tick and reports whether a toggle is due.
    pub fn on_tick(&mut self) -> bool {
        self.advance();
        self.take_due()
    }

    /// Beeps fast during green, at the normal rate otherwise. Restarts the
    /// count so the new rate takes effect from the phase boundary.
    pub fn retune(&mut self, phase: Phase) {
        self.tick_threshold = match phase {
            Phase::Green => BUZZER_FAST_TICKS,
            Phase::Red | Phase::Yellow => BUZZER_NORMAL_TICKS,
        };
        self.tick_counter = 0;
    }

    pub fn tick_counter(&self) -> u16 {
        self.tick_counter
    }

    pub fn tick_threshold(&self) -> u16 {
        self.tick_threshold
    }
}

impl Default for BuzzerState {
    fn default() -> Self {
        Self::new()
    }
}

/// The buzzer output line.
pub struct Buzzer<P> {
    pin: P,
    enabled: bool,
}

impl<P> Buzzer<P>
where
    P: OutputPin + ToggleableOutputPin,
{
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            enabled: false,
        }
    }

    /// Drives the line to its idle (low) level and allows toggling.
    pub fn enable(&mut self) {
        let _ = self.pin.set_low();
        self.enabled = true;
    }

    /// Flips the line. Does nothing before [`Buzzer::enable`].
    pub fn switch(&mut self) {
        if self.enabled {
            let _ = self.pin.toggle();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
