//! Compile-time firmware configuration.
//!
//! Per-device bus timing lives with the register maps in `platform`
//! (`DeviceProfile` constants); this module holds the application-level
//! values.

use platform::clock_types::Bcd;
use platform::ds1306::{ALARM_DONT_CARE, CONTROL_1HZ, CONTROL_AIE0};

/// Events that may queue between the interrupt producers and the main loop
/// before new ones are dropped.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// How long an error message stays on the glass before the previous screen
/// comes back.
pub const MESSAGE_HOLD_MS: u32 = 2_000;

/// Width of the pulse driven on the alarm output line.
pub const ALARM_PULSE_MS: u32 = 500;

/// Longest the main loop waits for an event before feeding the watchdog.
pub const IDLE_WAIT_MS: u64 = 1_000;

/// Control register value written after write protect is cleared:
/// 1 Hz output and alarm 0 interrupt enabled.
pub const RTC_CONTROL: u8 = CONTROL_1HZ | CONTROL_AIE0;

/// Clock hours and minutes at power-on (seconds are always zero).
pub const BOOT_TIME: (Bcd, Bcd) = (Bcd::ZERO, Bcd::ZERO);

/// Alarm 0 hour at power-on.
pub const ALARM_HOURS: u8 = 0x00;

/// Alarm 0 day at power-on: matches any day.
pub const ALARM_DAY: u8 = ALARM_DONT_CARE;
