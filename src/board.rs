//! RP2040 specifics: output pin type and the alarm adapter.

use rp_pico::hal::fugit::ExtU32;
use rp_pico::hal::gpio::{DynPinId, FunctionSioOutput, Pin, PullDown};
use rp_pico::hal::timer::Alarm;
use traffic_countdown::tick::{Interval, TickSource};
use traffic_countdown::Error;

/// Any push-pull GPIO output, with the pin number erased so buses can be
/// built from arrays.
pub type OutputLine = Pin<DynPinId, FunctionSioOutput, PullDown>;

/// One of the timer's four alarms as a tick source.
pub struct AlarmTick<A>(A);

impl<A: Alarm> AlarmTick<A> {
    pub fn new(alarm: A) -> Self {
        Self(alarm)
    }
}

impl<A: Alarm> TickSource for AlarmTick<A> {
    fn enable_interrupt(&mut self) {
        self.0.enable_interrupt();
    }

    fn arm(&mut self, interval: Interval) -> Result<(), Error> {
        self.0
            .schedule(interval.as_micros().micros())
            .map_err(|_| Error::Schedule)
    }

    fn acknowledge(&mut self) {
        self.0.clear_interrupt();
    }

    fn has_fired(&self) -> bool {
        self.0.finished()
    }

    fn disarm(&mut self) {
        let _ = self.0.cancel();
    }
}
