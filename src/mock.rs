//! Host-side stand-ins for pins and alarms.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};

use crate::tick::{Interval, TickSource};
use crate::Error;

/// An output pin whose level stays observable after it is moved into a driver.
#[derive(Clone, Default)]
pub struct MockPin {
    high: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MockPin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.high.set(high);
        pin
    }

    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl ToggleableOutputPin for MockPin {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.high.set(!self.high.get());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Packs pin levels into a byte, pin 0 in bit 0.
pub fn levels(pins: &[MockPin]) -> u8 {
    pins.iter()
        .enumerate()
        .fold(0, |acc, (bit, pin)| acc | (u8::from(pin.is_high()) << bit))
}

pub fn pins<const N: usize>() -> ([MockPin; N], [MockPin; N]) {
    let pins: [MockPin; N] = core::array::from_fn(|_| MockPin::new(false));
    (pins.clone(), pins)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCall {
    EnableInterrupt,
    Arm(u32),
    Acknowledge,
    Disarm,
}

/// A tick source that fires after a fixed number of polls.
#[derive(Clone, Default)]
pub struct MockTick {
    calls: Rc<RefCell<Vec<TickCall>>>,
    polls_per_period: usize,
    polls: Rc<Cell<usize>>,
    reject: bool,
}

impl MockTick {
    pub fn new(polls_per_period: usize) -> Self {
        Self {
            polls_per_period,
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TickCall> {
        self.calls.borrow().clone()
    }
}

impl TickSource for MockTick {
    fn enable_interrupt(&mut self) {
        self.calls.borrow_mut().push(TickCall::EnableInterrupt);
    }

    fn arm(&mut self, interval: Interval) -> Result<(), Error> {
        if self.reject {
            return Err(Error::Schedule);
        }
        self.polls.set(0);
        self.calls
            .borrow_mut()
            .push(TickCall::Arm(interval.as_micros()));
        Ok(())
    }

    fn acknowledge(&mut self) {
        self.calls.borrow_mut().push(TickCall::Acknowledge);
    }

    fn has_fired(&self) -> bool {
        self.polls.set(self.polls.get() + 1);
        self.polls.get() >= self.polls_per_period
    }

    fn disarm(&mut self) {
        self.calls.borrow_mut().push(TickCall::Disarm);
    }
}
