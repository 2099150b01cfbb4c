//! EA DOGM163 (ST7036 controller) 3×16 character LCD, SPI mode.
//!
//! Reference: Sitronix ST7036 datasheet, "Instruction Table" and the EA DOGM
//! application note initialisation example for 3.3 V / 3-line operation.
//!
//! The RS line selects the instruction register (low) or the data register
//! (high). The controller has no busy readback over SPI, so every byte is
//! followed by a fixed settle delay.

use crate::bus::DeviceProfile;
use crate::peripheral::{SpiConfig, SpiMode};

/// Characters per display line.
pub const LINE_WIDTH: usize = 16;
/// Number of display lines.
pub const LINE_COUNT: usize = 3;

/// Function set: 8-bit, 2 lines (3-line mode via bias), instruction table 1.
pub const FUNCTION_SET_IS1: u8 = 0x39;
/// Bias set: 1/4 bias, 3-line.
pub const BIAS_SET: u8 = 0x1E;
/// Power / ICON / contrast high bits: booster off, C5:C4 = 00.
pub const POWER_CONTROL: u8 = 0x50;
/// Follower control: follower on, Rab = 100.
pub const FOLLOWER_CONTROL: u8 = 0x6C;
/// Contrast set, low nibble C3:C0 = 0111.
pub const CONTRAST_SET: u8 = 0x77;
/// Display on, cursor off, blink off.
pub const DISPLAY_ON: u8 = 0x0C;
/// Clear display and home the address counter.
pub const CLEAR_DISPLAY: u8 = 0x01;
/// Entry mode: increment, no shift.
pub const ENTRY_MODE: u8 = 0x06;
/// Set DDRAM address command bit.
pub const SET_DDRAM_ADDRESS: u8 = 0x80;

/// Initialisation commands in datasheet order. Never reorder or dedupe:
/// the first function set selects the instruction table the rest rely on.
pub const INIT_SEQUENCE: [u8; 9] = [
    FUNCTION_SET_IS1,
    FUNCTION_SET_IS1,
    BIAS_SET,
    POWER_CONTROL,
    FOLLOWER_CONTROL,
    CONTRAST_SET,
    DISPLAY_ON,
    CLEAR_DISPLAY,
    ENTRY_MODE,
];

/// DDRAM start of each line, as the full set-address command.
pub const LINE_ADDRESS: [u8; LINE_COUNT] = [
    SET_DDRAM_ADDRESS,
    SET_DDRAM_ADDRESS | 0x10,
    SET_DDRAM_ADDRESS | 0x20,
];

/// Wait after power-up before the first command (40 ms).
pub const POWER_UP_DELAY_MS: u32 = 40;
/// Execution time of [`CLEAR_DISPLAY`] (1.08 ms, rounded up).
pub const CLEAR_DELAY_US: u32 = 1_100;

/// Degree sign in the ST7036 ROM (code page A).
pub const GLYPH_DEGREE: u8 = 0xDF;
/// Right arrow in the ST7036 ROM.
pub const GLYPH_RIGHT_ARROW: u8 = 0x7E;

/// Bus settings: CPOL=1 / CPHA=1, 125 kHz, CSB active-low. 30 µs after
/// every byte covers the 26.3 µs instruction execution time.
pub const PROFILE: DeviceProfile = DeviceProfile {
    config: SpiConfig::msb_first(125_000, SpiMode::Mode3),
    setup_ns: 0,
    hold_ns: 0,
    settle_ns: 30_000,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_sequence_matches_dogm163_example() {
        assert_eq!(
            INIT_SEQUENCE,
            [0x39, 0x39, 0x1E, 0x50, 0x6C, 0x77, 0x0C, 0x01, 0x06]
        );
    }

    #[test]
    fn line_addresses() {
        assert_eq!(LINE_ADDRESS, [0x80, 0x90, 0xA0]);
    }

    #[test]
    fn line_capacity_fits_ddram_stride() {
        // Each line starts 0x10 after the previous one.
        assert_eq!(LINE_WIDTH, 0x10);
    }
}
