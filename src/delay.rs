//! Busy-wait helpers for bring-up and bench checks.
//!
//! These spin on a tick source and never return early, so they must stay out
//! of the control loop. Each call takes `count` periods of `interval` and
//! leaves the source disarmed.

use core::hint::spin_loop;

use crate::tick::{Interval, TickSource};
use crate::Error;

/// Blocks for `count` periods of `interval`.
pub fn delay<S: TickSource>(source: &mut S, interval: Interval, count: u32) -> Result<(), Error> {
    run_every(source, interval, count, || ())
}

/// Calls `f` at the start of each of `count` periods of `interval`.
pub fn run_every<S: TickSource>(
    source: &mut S,
    interval: Interval,
    count: u32,
    mut f: impl FnMut(),
) -> Result<(), Error> {
    for _ in 0..count {
        if let Err(err) = source.arm(interval) {
            source.disarm();
            return Err(err);
        }
        f();
        while !source.has_fired() {
            spin_loop();
        }
        source.acknowledge();
    }
    source.disarm();
    Ok(())
}
