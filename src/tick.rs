//! Periodic tick sources.
//!
//! The alarms behind a tick source are one-shot: every firing has to be
//! acknowledged and armed again in software. [`PeriodicTimer`] does that
//! reload before it hands control to the tick handler, so both tick sources
//! share one implementation regardless of what their handlers do.

use crate::config::{MAX_COUNTDOWN_TICKS, TIMER_TICKS_PER_MS};
use crate::Error;

/// A tick period that is known to fit the alarm's counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    micros: u32,
}

impl Interval {
    /// Builds an interval of `ms` milliseconds.
    ///
    /// Panics when the period is zero or does not fit the counter. Use it to
    /// initialise a `const` so the check happens at build time.
    pub const fn from_millis(ms: u32) -> Self {
        assert!(ms > 0, "tick interval must be at least one millisecond");
        assert!(
            ms <= MAX_COUNTDOWN_TICKS / TIMER_TICKS_PER_MS,
            "tick interval does not fit the alarm counter"
        );
        Self {
            micros: ms * TIMER_TICKS_PER_MS,
        }
    }

    pub const fn as_micros(&self) -> u32 {
        self.micros
    }
}

/// One hardware alarm able to raise a periodic interrupt.
pub trait TickSource {
    /// Unmask the interrupt of this source.
    fn enable_interrupt(&mut self);

    /// Schedule the next firing `interval` from now.
    fn arm(&mut self, interval: Interval) -> Result<(), Error>;

    /// Clear the pending firing.
    fn acknowledge(&mut self);

    /// Whether the armed countdown has elapsed.
    fn has_fired(&self) -> bool;

    /// Stop the countdown without firing.
    fn disarm(&mut self);
}

/// A tick source reloaded in software after every firing.
pub struct PeriodicTimer<S> {
    source: S,
    interval: Interval,
}

impl<S: TickSource> PeriodicTimer<S> {
    /// Enables the interrupt of `source` and arms the first firing.
    pub fn configure(mut source: S, interval: Interval) -> Result<Self, Error> {
        source.enable_interrupt();
        source.arm(interval)?;
        Ok(Self { source, interval })
    }

    /// Acknowledges the current firing, arms the next one, then runs `handler`.
    ///
    /// Call this from the one interrupt handler bound to this source.
    pub fn on_fire<R>(&mut self, handler: impl FnOnce() -> R) -> Result<R, Error> {
        self.source.acknowledge();
        self.source.arm(self.interval)?;
        Ok(handler())
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }
}

/// Counts ticks up to a fixed period.
#[derive(Debug, Clone)]
pub struct SubTickCounter {
    count: u16,
    period: u16,
}

impl SubTickCounter {
    pub const fn new(period: u16) -> Self {
        assert!(period > 0, "sub-tick period must be positive");
        Self { count: 0, period }
    }

    /// Counts one tick. Returns `true` on every `period`-th call.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u16 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTick, TickCall};

    #[test]
    fn interval_in_timer_ticks() {
        const ONE_MS: Interval = Interval::from_millis(1);
        assert_eq!(ONE_MS.as_micros(), 1000);
        assert_eq!(Interval::from_millis(250).as_micros(), 250_000);
    }

    #[test]
    #[should_panic]
    fn zero_interval_is_rejected() {
        Interval::from_millis(0);
    }

    #[test]
    #[should_panic]
    fn oversized_interval_is_rejected() {
        Interval::from_millis(MAX_COUNTDOWN_TICKS / TIMER_TICKS_PER_MS + 1);
    }

    #[test]
    fn configure_enables_then_arms() {
        let source = MockTick::new(1);
        let _timer = PeriodicTimer::configure(source.clone(), Interval::from_millis(1)).unwrap();
        assert_eq!(
            source.calls(),
            [TickCall::EnableInterrupt, TickCall::Arm(1000)]
        );
    }

    #[test]
    fn fire_reloads_before_running_handler() {
        let source = MockTick::new(1);
        let mut timer = PeriodicTimer::configure(source.clone(), Interval::from_millis(2)).unwrap();

        let seen = timer.on_fire(|| source.calls().len()).unwrap();
        assert_eq!(seen, 4);
        assert_eq!(
            &source.calls()[2..],
            [TickCall::Acknowledge, TickCall::Arm(2000)]
        );
    }

    #[test]
    fn rejected_schedule_is_reported() {
        let result = PeriodicTimer::configure(MockTick::rejecting(), Interval::from_millis(1));
        assert_eq!(result.err(), Some(Error::Schedule));
    }

    #[test]
    fn sub_tick_counter_fires_once_per_period() {
        let mut counter = SubTickCounter::new(1000);
        let fired = (0..3000).filter(|_| counter.tick()).count();
        assert_eq!(fired, 3);
        assert_eq!(counter.count(), 0);

        assert!(!counter.tick());
        assert_eq!(counter.count(), 1);
    }
}
