//! The bodies of the two tick handlers and of the idle loop.
//!
//! Work that must happen on every tick (counting, display and lamp refresh)
//! stays in the handlers. Anything that may take longer, such as rewriting
//! the digit buffer or toggling the buzzer, is flagged and picked up by
//! [`DeferredWork::poll`] outside interrupt context.

use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};

use crate::buzzer::{Buzzer, BuzzerState};
use crate::config::AUX_TICKS;
use crate::display::{DigitBuffer, Zone};
use crate::flags::DeferredFlags;
use crate::phase::{PhaseController, PhaseSnapshot, TickEvent};
use crate::tick::SubTickCounter;

/// State owned by the display tick.
pub struct Countdown {
    phase: PhaseController,
    buzzer: BuzzerState,
}

impl Countdown {
    pub const fn new() -> Self {
        Self::from_parts(PhaseController::new(), BuzzerState::new())
    }

    pub const fn from_parts(phase: PhaseController, buzzer: BuzzerState) -> Self {
        Self { phase, buzzer }
    }

    /// One display tick, minus the display refresh that follows it.
    ///
    /// Raises `display_dirty` once per second and `buzzer_due` whenever the
    /// buzzer count reaches its threshold. A phase change retunes the buzzer
    /// before the threshold is checked, so the boundary tick restarts the
    /// count instead of toggling.
    pub fn on_display_tick(&mut self, flags: &DeferredFlags, snapshot: &PhaseSnapshot) -> TickEvent {
        self.buzzer.advance();

        let event = self.phase.on_tick();
        match event {
            TickEvent::Idle => {}
            TickEvent::Second => flags.display_dirty.raise(),
            TickEvent::Changed(phase) => {
                self.buzzer.retune(phase);
                flags.display_dirty.raise();
            }
        }
        if event != TickEvent::Idle {
            self.phase.publish(snapshot);
        }

        if self.buzzer.take_due() {
            flags.buzzer_due.raise();
        }
        event
    }

    pub fn phase(&self) -> &PhaseController {
        &self.phase
    }

    pub fn buzzer(&self) -> &BuzzerState {
        &self.buzzer
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

/// State owned by the lamp tick.
pub struct LampTick {
    aux: SubTickCounter,
}

impl LampTick {
    pub const fn new() -> Self {
        Self {
            aux: SubTickCounter::new(AUX_TICKS),
        }
    }

    /// Counts one lamp tick, raising `aux_tick` once per `AUX_TICKS`.
    pub fn on_lamp_tick(&mut self, flags: &DeferredFlags) {
        if self.aux.tick() {
            flags.aux_tick.raise();
        }
    }
}

impl Default for LampTick {
    fn default() -> Self {
        Self::new()
    }
}

/// What one pass of the idle loop serviced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Serviced {
    pub buzzer: bool,
    pub display: bool,
    pub aux: bool,
}

impl Serviced {
    pub fn any(&self) -> bool {
        self.buzzer || self.display || self.aux
    }
}

/// State owned by the idle loop.
pub struct DeferredWork<P> {
    buzzer: Buzzer<P>,
}

impl<P> DeferredWork<P>
where
    P: OutputPin + ToggleableOutputPin,
{
    pub fn new(buzzer: Buzzer<P>) -> Self {
        Self { buzzer }
    }

    /// Redraws the digit buffer from the current snapshot.
    pub fn render(&self, snapshot: &PhaseSnapshot, buffer: &DigitBuffer) {
        let remaining = u32::try_from(snapshot.remaining()).unwrap_or(0);
        buffer.recompute(remaining, Zone::for_phase(snapshot.phase()));
    }

    /// Services every raised flag once and clears it. Never blocks.
    pub fn poll(
        &mut self,
        flags: &DeferredFlags,
        snapshot: &PhaseSnapshot,
        buffer: &DigitBuffer,
    ) -> Serviced {
        let mut serviced = Serviced::default();

        if flags.buzzer_due.take() {
            self.buzzer.switch();
            serviced.buzzer = true;
        }
        if flags.display_dirty.take() {
            self.render(snapshot, buffer);
            serviced.display = true;
        }
        if flags.aux_tick.take() {
            serviced.aux = true;
        }
        serviced
    }

    pub fn buzzer_mut(&mut self) -> &mut Buzzer<P> {
        &mut self.buzzer
    }
}
