//! Flags raised by the tick handlers and serviced by the idle loop.
//!
//! Every flag has exactly one producer (a tick handler) and one consumer
//! (the idle loop). The flags stay separate so that servicing one can never
//! swallow a concurrent assertion of another.

use core::sync::atomic::{AtomicBool, Ordering};

/// A single-producer, single-consumer event flag.
pub struct Flag(AtomicBool);

impl Flag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Producer side.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consumer side: returns whether the flag was up and clears it.
    ///
    /// ARMv6-M has no atomic swap, so this is a load followed by a store.
    /// Only the consumer ever clears, which keeps the pair race free.
    pub fn take(&self) -> bool {
        if self.0.load(Ordering::Acquire) {
            self.0.store(false, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct DeferredFlags {
    /// The countdown moved; the digit buffer needs recomputing.
    pub display_dirty: Flag,
    /// The buzzer line is due for a toggle.
    pub buzzer_due: Flag,
    /// Raised by the lamp tick once per `AUX_TICKS`.
    pub aux_tick: Flag,
}

impl DeferredFlags {
    pub const fn new() -> Self {
        Self {
            display_dirty: Flag::new(),
            buzzer_due: Flag::new(),
            aux_tick: Flag::new(),
        }
    }
}
