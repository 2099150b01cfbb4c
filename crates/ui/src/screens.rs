//! Screen layouts.
//!
//! Each function clears the buffer and lays out one screen. Line breaks come
//! either from an explicit `\n` or from filling all 16 cells of a line.

use core::fmt::Write;

use platform::clock_types::{Bcd, TimeOfDay};
use platform::humidicon::Reading;

use crate::display_buffer::DisplayBuffer;
use crate::pages::HomePage;
use crate::time_entry::TimeEntry;

/// Values shown on the home pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeData {
    /// Current time.
    pub time: TimeOfDay,
    /// Last climate reading.
    pub reading: Reading,
    /// Last CO2 concentration in ppm.
    pub co2_ppm: u16,
}

// DisplayBuffer::write_str never fails.
macro_rules! put {
    ($buf:expr, $($arg:tt)*) => {
        let _ = write!($buf, $($arg)*);
    };
}

/// Time on line 1, then the page's reading.
pub fn home(buf: &mut DisplayBuffer, page: HomePage, data: &HomeData) {
    buf.clear();
    put!(buf, "Time: {}\n", data.time);
    match page {
        HomePage::Climate => {
            put!(buf, "Temp:  {:.2}°C\n", data.reading.temperature_c);
            put!(buf, "RH:    {:.2}%", data.reading.humidity_pct);
        }
        HomePage::Co2 => {
            put!(buf, "CO2 ppm:  {}\n", data.co2_ppm);
        }
    }
}

/// Options menu.
pub fn options(buf: &mut DisplayBuffer) {
    buf.clear();
    put!(buf, "1:Set time/alarm");
    put!(buf, "2:Toggle alarm");
}

/// Help text.
pub fn instructions(buf: &mut DisplayBuffer) {
    buf.clear();
    put!(buf, "2nd→1: Set time\n");
    put!(buf, "       or Alarm\n");
    put!(buf, "2nd→2: Alarm Y/N");
}

/// Entry prompt with the current entry on line 3.
pub fn time_prompt(buf: &mut DisplayBuffer, entry: &TimeEntry) {
    buf.clear();
    put!(buf, "Enter Time/Alarm");
    put!(buf, "Enter to end\n");
    put!(buf, "{}", entry);
}

/// Rewrite the entry line in place. The cursor must be on that line, as
/// [`time_prompt`] leaves it.
pub fn time_entry_line(buf: &mut DisplayBuffer, entry: &TimeEntry) {
    put!(buf, "\r{}", entry);
}

/// Entered value and the time/alarm choice.
pub fn time_alarm_choice(buf: &mut DisplayBuffer, entry: &TimeEntry) {
    buf.clear();
    put!(buf, "Time entered:\n");
    put!(buf, "{}\n", entry);
    put!(buf, "Time(1) Alarm(2)");
}

/// Alarm enable flag and the programmed alarm time.
pub fn alarm_status(buf: &mut DisplayBuffer, enabled: bool, hours: Bcd, minutes: Bcd) {
    buf.clear();
    put!(buf, "Alarm is {}\n", if enabled { "On" } else { "Off" });
    put!(buf, "ALM: {}:{}:00\n", hours, minutes);
    put!(buf, "Press any key");
}

/// Unexpected key in the idle or options state.
pub fn invalid_key(buf: &mut DisplayBuffer) {
    buf.clear();
    put!(buf, "Invalid key!");
}

/// Non-digit key during time entry.
pub fn invalid_time_entry(buf: &mut DisplayBuffer) {
    buf.clear();
    put!(buf, "Invalid time\n");
    put!(buf, "entry");
}

/// Anything but 1 or 2 at the time/alarm choice.
pub fn invalid_choice(buf: &mut DisplayBuffer) {
    buf.clear();
    put!(buf, "Invalid entry");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn trimmed(buf: &DisplayBuffer) -> Vec<String> {
        (0..3)
            .map(|i| buf.line_text(i).trim_end().to_string())
            .collect()
    }

    fn sample() -> HomeData {
        HomeData {
            time: TimeOfDay {
                hours: 9,
                minutes: 5,
                seconds: 7,
            },
            reading: Reading {
                humidity_pct: 45.5,
                temperature_c: 21.25,
            },
            co2_ppm: 412,
        }
    }

    #[test]
    fn test_screen_home_climate() {
        let mut buf = DisplayBuffer::new();
        home(&mut buf, HomePage::Climate, &sample());
        assert_eq!(
            trimmed(&buf),
            ["Time: 09:05:07", "Temp:  21.25°C", "RH:    45.50%"]
        );
    }

    #[test]
    fn test_screen_home_co2() {
        let mut buf = DisplayBuffer::new();
        home(&mut buf, HomePage::Co2, &sample());
        assert_eq!(trimmed(&buf), ["Time: 09:05:07", "CO2 ppm:  412", ""]);
    }

    #[test]
    fn test_screen_options_fills_first_line() {
        let mut buf = DisplayBuffer::new();
        options(&mut buf);
        assert_eq!(trimmed(&buf), ["1:Set time/alarm", "2:Toggle alarm", ""]);
    }

    #[test]
    fn test_screen_instructions() {
        let mut buf = DisplayBuffer::new();
        instructions(&mut buf);
        assert_eq!(
            trimmed(&buf),
            ["2nd→1: Set time", "       or Alarm", "2nd→2: Alarm Y/N"]
        );
    }

    #[test]
    fn test_screen_prompt_then_digit_rewrites_line_three() {
        let mut buf = DisplayBuffer::new();
        let mut entry = TimeEntry::new();
        time_prompt(&mut buf, &entry);
        assert_eq!(trimmed(&buf), ["Enter Time/Alarm", "Enter to end", "00:00"]);
        entry.push_digit(1).unwrap();
        time_entry_line(&mut buf, &entry);
        assert_eq!(trimmed(&buf), ["Enter Time/Alarm", "Enter to end", "10:00"]);
    }

    #[test]
    fn test_screen_time_alarm_choice() {
        let mut buf = DisplayBuffer::new();
        let mut entry = TimeEntry::new();
        for d in [0, 7, 3, 0] {
            entry.push_digit(d).unwrap();
        }
        time_alarm_choice(&mut buf, &entry);
        assert_eq!(trimmed(&buf), ["Time entered:", "07:30", "Time(1) Alarm(2)"]);
    }

    #[test]
    fn test_screen_alarm_status() {
        let mut buf = DisplayBuffer::new();
        alarm_status(&mut buf, true, Bcd::from_raw(0x06), Bcd::from_raw(0x45));
        assert_eq!(trimmed(&buf), ["Alarm is On", "ALM: 06:45:00", "Press any key"]);
        alarm_status(&mut buf, false, Bcd::ZERO, Bcd::ZERO);
        assert_eq!(trimmed(&buf)[0].as_str(), "Alarm is Off");
    }

    #[test]
    fn test_screen_messages() {
        let mut buf = DisplayBuffer::new();
        invalid_key(&mut buf);
        assert_eq!(trimmed(&buf)[0].as_str(), "Invalid key!");
        invalid_time_entry(&mut buf);
        assert_eq!(trimmed(&buf), ["Invalid time", "entry", ""]);
        invalid_choice(&mut buf);
        assert_eq!(trimmed(&buf)[0].as_str(), "Invalid entry");
    }
}
