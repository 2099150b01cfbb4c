//! Clock domain newtypes.
//!
//! The DS1306 stores every time field as packed BCD: the high nibble holds
//! the tens digit and the low nibble the ones digit. Two representations are
//! kept apart on purpose:
//!
//! - [`Bcd`] / [`RawTime`]: exactly what the clock registers hold.
//! - [`TimeOfDay`]: decimal values ready for display.
//!
//! Conversion runs one way, from raw to decimal ([`format_time`]). Time entry
//! builds BCD directly from its tens/ones digits with [`Bcd::from_digits`].

use core::fmt;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a digit or value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u8,
    /// The inclusive maximum allowed value.
    pub max: u8,
}

// ── Bcd ──────────────────────────────────────────────────────────────────────

/// One packed-BCD byte.
///
/// Built from a register read with [`Bcd::from_raw`] (no validation, the
/// register is whatever the chip says) or from digits with
/// [`Bcd::from_digits`] (validated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Bcd(u8);

impl Bcd {
    /// `00`.
    pub const ZERO: Self = Self(0);

    /// Wrap a byte read from a register.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Pack two decimal digits. Each must be `0..=9`.
    pub fn from_digits(tens: u8, ones: u8) -> Result<Self, OutOfRangeError> {
        if tens > 9 {
            return Err(OutOfRangeError { value: tens, max: 9 });
        }
        if ones > 9 {
            return Err(OutOfRangeError { value: ones, max: 9 });
        }
        Ok(Self((tens << 4) | ones))
    }

    /// Encode a decimal value `0..=99`.
    pub fn from_decimal(value: u8) -> Result<Self, OutOfRangeError> {
        if value > 99 {
            return Err(OutOfRangeError { value, max: 99 });
        }
        Self::from_digits(value / 10, value % 10)
    }

    /// Register byte.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Tens digit (high nibble).
    pub const fn tens(self) -> u8 {
        self.0 >> 4
    }

    /// Ones digit (low nibble).
    pub const fn ones(self) -> u8 {
        self.0 & 0x0F
    }

    /// Both nibbles are decimal digits.
    pub const fn is_valid(self) -> bool {
        self.tens() <= 9 && self.ones() <= 9
    }

    /// `tens * 10 + ones`. Never overflows: the largest result is 165.
    pub const fn to_decimal(self) -> u8 {
        self.tens().wrapping_mul(10).wrapping_add(self.ones())
    }
}

impl fmt::Display for Bcd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tens(), self.ones())
    }
}

/// Convert one BCD register byte to its decimal value.
pub const fn format_time(bcd: u8) -> u8 {
    Bcd::from_raw(bcd).to_decimal()
}

// ── RawTime ──────────────────────────────────────────────────────────────────

/// Hours, minutes and seconds as read from the clock registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTime {
    /// Hours register (24-hour mode).
    pub hours: Bcd,
    /// Minutes register.
    pub minutes: Bcd,
    /// Seconds register.
    pub seconds: Bcd,
}

impl RawTime {
    /// Build from the three register bytes, dropping the control bits the
    /// DS1306 keeps next to the digits (12/24 select, unused bit 7).
    pub const fn from_registers(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours: Bcd::from_raw(hours & 0x3F),
            minutes: Bcd::from_raw(minutes & 0x7F),
            seconds: Bcd::from_raw(seconds & 0x7F),
        }
    }

    /// Decimal form of every field.
    pub const fn format(self) -> TimeOfDay {
        TimeOfDay {
            hours: self.hours.to_decimal(),
            minutes: self.minutes.to_decimal(),
            seconds: self.seconds.to_decimal(),
        }
    }
}

// ── TimeOfDay ────────────────────────────────────────────────────────────────

/// Displayable time; renders as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    /// 0–23.
    pub hours: u8,
    /// 0–59.
    pub minutes: u8,
    /// 0–59.
    pub seconds: u8,
}

impl From<RawTime> for TimeOfDay {
    fn from(raw: RawTime) -> Self {
        raw.format()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
