//! HH:MM keypad entry.
//!
//! Digits fill hour tens, hour ones, minute tens, minute ones in turn, then
//! the cursor returns to hour tens. A digit that would produce an invalid
//! 24-hour time is rejected and the entry is left unchanged.

use core::fmt;

use platform::clock_types::Bcd;
use thiserror_no_std::Error;

/// Why a digit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryError {
    /// Value above 9.
    #[error("{0} is not a digit")]
    NotADigit(u8),
    /// Hour tens above 2.
    #[error("hour tens {0} out of range")]
    HourTens(u8),
    /// Hour ones above 3 while hour tens is 2.
    #[error("hour ones {0} out of range")]
    HourOnes(u8),
    /// Minute tens above 5.
    #[error("minute tens {0} out of range")]
    MinuteTens(u8),
}

/// Position the next digit lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// H_:__
    HourTens,
    /// _H:__
    HourOnes,
    /// __:M_
    MinuteTens,
    /// __:_M
    MinuteOnes,
}

/// Entry in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEntry {
    hour_tens: u8,
    hour_ones: u8,
    minute_tens: u8,
    minute_ones: u8,
    slot: Slot,
}

impl TimeEntry {
    /// 00:00, cursor on hour tens.
    pub const fn new() -> Self {
        Self {
            hour_tens: 0,
            hour_ones: 0,
            minute_tens: 0,
            minute_ones: 0,
            slot: Slot::HourTens,
        }
    }

    /// Back to 00:00.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Where the next digit goes.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Accept or reject one digit.
    pub fn push_digit(&mut self, digit: u8) -> Result<(), EntryError> {
        if digit > 9 {
            return Err(EntryError::NotADigit(digit));
        }
        self.slot = match self.slot {
            Slot::HourTens => {
                if digit > 2 {
                    return Err(EntryError::HourTens(digit));
                }
                self.hour_tens = digit;
                if digit == 2 {
                    self.hour_ones = 0;
                }
                Slot::HourOnes
            }
            Slot::HourOnes => {
                if self.hour_tens == 2 && digit > 3 {
                    return Err(EntryError::HourOnes(digit));
                }
                self.hour_ones = digit;
                Slot::MinuteTens
            }
            Slot::MinuteTens => {
                if digit > 5 {
                    return Err(EntryError::MinuteTens(digit));
                }
                self.minute_tens = digit;
                Slot::MinuteOnes
            }
            Slot::MinuteOnes => {
                self.minute_ones = digit;
                Slot::HourTens
            }
        };
        Ok(())
    }

    /// Hours as a clock register value.
    pub fn hours(&self) -> Bcd {
        Bcd::from_digits(self.hour_tens, self.hour_ones).unwrap_or(Bcd::ZERO)
    }

    /// Minutes as a clock register value.
    pub fn minutes(&self) -> Bcd {
        Bcd::from_digits(self.minute_tens, self.minute_ones).unwrap_or(Bcd::ZERO)
    }
}

impl Default for TimeEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.hour_tens, self.hour_ones, self.minute_tens, self.minute_ones
        )
    }
}
