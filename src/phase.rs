//! Traffic-light phases and the per-second countdown.

use core::sync::atomic::{AtomicI16, AtomicU8, Ordering};

use crate::config::{PHASE_SECONDS, TICKS_PER_SECOND};
use crate::tick::SubTickCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(test), derive(defmt::Format))]
pub enum Phase {
    Red,
    Yellow,
    Green,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Red, Phase::Yellow, Phase::Green];

    pub const fn index(self) -> u8 {
        match self {
            Phase::Red => 0,
            Phase::Yellow => 1,
            Phase::Green => 2,
        }
    }

    /// Maps an index onto a phase, modulo the number of phases.
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % 3) as usize]
    }

    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Countdown length of this phase.
    pub const fn seconds(self) -> i16 {
        PHASE_SECONDS[self.index() as usize]
    }
}

/// What a single display tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Still inside the current second.
    Idle,
    /// A second elapsed inside the current phase.
    Second,
    /// A second elapsed and the countdown underflowed into a new phase.
    Changed(Phase),
}

pub struct PhaseController {
    phase: Phase,
    remaining: i16,
    sub_ticks: SubTickCounter,
}

impl PhaseController {
    /// Starts at the first phase with its full countdown.
    pub const fn new() -> Self {
        Self::starting_at(Phase::Red, Phase::Red.seconds())
    }

    pub const fn starting_at(phase: Phase, remaining: i16) -> Self {
        Self {
            phase,
            remaining,
            sub_ticks: SubTickCounter::new(TICKS_PER_SECOND),
        }
    }

    /// Counts one display tick; every `TICKS_PER_SECOND` ticks the countdown
    /// drops by one. Dropping below zero moves to the next phase and reloads
    /// the countdown from the duration table.
    pub fn on_tick(&mut self) -> TickEvent {
        if !self.sub_ticks.tick() {
            return TickEvent::Idle;
        }

        self.remaining -= 1;
        if self.remaining < 0 {
            self.phase = self.phase.next();
            self.remaining = self.phase.seconds();
            TickEvent::Changed(self.phase)
        } else {
            TickEvent::Second
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> i16 {
        self.remaining
    }

    /// Copies the observable state into `snapshot` for the other contexts.
    pub fn publish(&self, snapshot: &PhaseSnapshot) {
        snapshot.store(self.phase, self.remaining);
    }
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the countdown for the lamp handler and the idle loop.
///
/// Written only by the display tick. Both fields are plain loads and stores,
/// so this works on cores without atomic read-modify-write.
pub struct PhaseSnapshot {
    phase: AtomicU8,
    remaining: AtomicI16,
}

impl PhaseSnapshot {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Red.index()),
            remaining: AtomicI16::new(Phase::Red.seconds()),
        }
    }

    fn store(&self, phase: Phase, remaining: i16) {
        self.remaining.store(remaining, Ordering::Relaxed);
        self.phase.store(phase.index(), Ordering::Release);
    }

    pub fn phase(&self) -> Phase {
        Phase::from_index(self.phase.load(Ordering::Acquire))
    }

    pub fn remaining(&self) -> i16 {
        self.remaining.load(Ordering::Relaxed)
    }
}

impl Default for PhaseSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs one full second of display ticks.
    fn second(controller: &mut PhaseController) -> TickEvent {
        for _ in 1..TICKS_PER_SECOND {
            assert_eq!(controller.on_tick(), TickEvent::Idle);
        }
        controller.on_tick()
    }

    #[test]
    fn phases_cycle() {
        assert_eq!(Phase::Red.next(), Phase::Yellow);
        assert_eq!(Phase::Yellow.next(), Phase::Green);
        assert_eq!(Phase::Green.next(), Phase::Red);
        assert_eq!(Phase::from_index(5), Phase::Green);
    }

    #[test]
    fn countdown_decrements_once_per_second() {
        let mut controller = PhaseController::new();
        assert_eq!(controller.remaining(), 15);

        for _ in 0..TICKS_PER_SECOND - 1 {
            controller.on_tick();
        }
        assert_eq!(controller.remaining(), 15);

        assert_eq!(controller.on_tick(), TickEvent::Second);
        assert_eq!(controller.remaining(), 14);
    }

    #[test]
    fn red_moves_to_yellow_after_its_countdown() {
        let mut controller = PhaseController::new();

        for expected in (0..15).rev() {
            assert_eq!(second(&mut controller), TickEvent::Second);
            assert_eq!(controller.remaining(), expected);
            assert_eq!(controller.phase(), Phase::Red);
        }

        assert_eq!(second(&mut controller), TickEvent::Changed(Phase::Yellow));
        assert_eq!(controller.remaining(), 10);
    }

    #[test]
    fn yellow_underflow_enters_green() {
        let mut controller = PhaseController::starting_at(Phase::Yellow, 0);
        assert_eq!(second(&mut controller), TickEvent::Changed(Phase::Green));
        assert_eq!(controller.phase(), Phase::Green);
        assert_eq!(controller.remaining(), 5);
    }

    #[test]
    fn full_cycle_has_expected_lengths() {
        let mut controller = PhaseController::new();
        let mut seconds_in_phase = [0u32; 3];
        let mut changes = 0;

        while changes < 6 {
            assert!(controller.remaining() >= 0);
            seconds_in_phase[controller.phase().index() as usize] += 1;
            if let TickEvent::Changed(_) = second(&mut controller) {
                changes += 1;
            }
        }

        // Each phase shows N..=0, i.e. N + 1 seconds, twice over.
        assert_eq!(seconds_in_phase, [32, 22, 12]);
        assert_eq!(controller.phase(), Phase::Red);
    }

    #[test]
    fn snapshot_follows_publish() {
        let snapshot = PhaseSnapshot::new();
        assert_eq!(snapshot.phase(), Phase::Red);
        assert_eq!(snapshot.remaining(), 15);

        let controller = PhaseController::starting_at(Phase::Green, 3);
        controller.publish(&snapshot);
        assert_eq!(snapshot.phase(), Phase::Green);
        assert_eq!(snapshot.remaining(), 3);
    }
}
