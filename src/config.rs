//! Compiled-in configuration. There is no runtime configuration surface.

/// Countdown length of each phase in seconds, indexed by phase (red, yellow, green).
pub const PHASE_SECONDS: [i16; 3] = [15, 10, 5];

/// Period of the display tick (tick source A).
pub const DISPLAY_INTERVAL_MS: u32 = 1;

/// Period of the lamp tick (tick source B).
pub const LAMP_INTERVAL_MS: u32 = 1;

/// Display ticks that make up one countdown second.
///
/// A single alarm could cover a whole second on this chip, but the countdown
/// is synthesised from fast ticks so the display refresh and the buzzer share
/// one time base.
pub const TICKS_PER_SECOND: u16 = 1000;

/// Lamp ticks between two auxiliary flags.
pub const AUX_TICKS: u16 = 1000;

/// Display ticks between buzzer toggles during red and yellow.
pub const BUZZER_NORMAL_TICKS: u16 = 1000;

/// Display ticks between buzzer toggles during green.
pub const BUZZER_FAST_TICKS: u16 = 100;

/// Number of physical digits on the display.
pub const DIGITS: usize = 6;

/// Timer counter ticks per millisecond (the RP2040 timer runs at 1 MHz).
pub const TIMER_TICKS_PER_MS: u32 = 1000;

/// Largest countdown an alarm accepts. Half the 32-bit range, so the
/// comparison against the free-running counter cannot wrap ambiguously.
pub const MAX_COUNTDOWN_TICKS: u32 = u32::MAX >> 1;
