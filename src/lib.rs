//! Control core for a traffic-light countdown simulator.
//!
//! Everything in here is hardware independent: pins come in through the
//! `embedded-hal` v2 digital traits and timers through [`tick::TickSource`].
//! The RTIC application in `main.rs` wires these pieces to the RP2040.
#![cfg_attr(not(test), no_std)]

pub mod buzzer;
pub mod config;
pub mod control;
pub mod delay;
pub mod display;
mod error;
pub mod flags;
pub mod lamp;
pub mod phase;
pub mod tick;

#[cfg(test)]
mod mock;

pub use error::Error;
