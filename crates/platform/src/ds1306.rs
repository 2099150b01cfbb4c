//! DS1306 serial real-time clock register map.
//!
//! Reference: Maxim DS1306 datasheet (19-5006), "Address Map" and
//! "Serial Peripheral Interface".
//!
//! The address byte sent after CE rises selects the register. Bit 7 set means
//! write, bit 7 clear means read; the remaining seven bits are the same for
//! both directions. The chip auto-increments the address after every data
//! byte for as long as CE stays high.

use crate::bus::DeviceProfile;
use crate::peripheral::{SpiConfig, SpiMode};

/// Bit 7 of the address byte selects a write.
pub const WRITE_FLAG: u8 = 0x80;

/// Seconds register (BCD 00–59), write address.
pub const SEC_WT: u8 = 0x80;
/// Minutes register (BCD 00–59), write address.
pub const MIN_WT: u8 = 0x81;
/// Hours register (BCD, bit 6 selects 12-hour mode), write address.
pub const HR_WT: u8 = 0x82;
/// Day-of-week register (1–7), write address.
pub const DAY_WT: u8 = 0x83;
/// Date register (BCD 01–31), write address.
pub const DATE_WT: u8 = 0x84;
/// Month register (BCD 01–12), write address.
pub const MONTH_WT: u8 = 0x85;
/// Year register (BCD 00–99), write address.
pub const YEAR_WT: u8 = 0x86;
/// Alarm 0 seconds, write address. Bit 7 set = don't care.
pub const SEC_ALM_WT: u8 = 0x87;
/// Alarm 0 minutes, write address.
pub const MIN_ALM_WT: u8 = 0x88;
/// Alarm 0 hours, write address.
pub const HR_ALM_WT: u8 = 0x89;
/// Alarm 0 day, write address.
pub const DAY_ALM_WT: u8 = 0x8A;
/// Control register, write address.
pub const CONT_REG_WT: u8 = 0x8F;
/// Status register, write address.
pub const STAT_REG_WT: u8 = 0x90;
/// First byte of the 96-byte user RAM, write address.
pub const NVRAM_WT: u8 = 0xA0;

/// Seconds register, read address.
pub const SEC_RD: u8 = read_address(SEC_WT);
/// Minutes register, read address.
pub const MIN_RD: u8 = read_address(MIN_WT);
/// Hours register, read address.
pub const HR_RD: u8 = read_address(HR_WT);
/// Alarm 0 seconds, read address.
pub const SEC_ALM_RD: u8 = read_address(SEC_ALM_WT);
/// Alarm 0 minutes, read address.
pub const MIN_ALM_RD: u8 = read_address(MIN_ALM_WT);
/// Alarm 0 hours, read address.
pub const HR_ALM_RD: u8 = read_address(HR_ALM_WT);
/// Alarm 0 day, read address.
pub const DAY_ALM_RD: u8 = read_address(DAY_ALM_WT);
/// Control register, read address.
pub const CONT_REG_RD: u8 = read_address(CONT_REG_WT);
/// Status register, read address.
pub const STAT_REG_RD: u8 = read_address(STAT_REG_WT);
/// First byte of user RAM, read address.
pub const NVRAM_RD: u8 = read_address(NVRAM_WT);
/// Size of the user RAM in bytes (0x20–0x7F).
pub const NVRAM_LEN: usize = 96;

/// Control bit: write protect. Must be cleared before any other write.
pub const CONTROL_WP: u8 = 1 << 6;
/// Control bit: enable the 1 Hz square wave output.
pub const CONTROL_1HZ: u8 = 1 << 2;
/// Control bit: alarm 1 interrupt enable (INT1).
pub const CONTROL_AIE1: u8 = 1 << 1;
/// Control bit: alarm 0 interrupt enable (INT0).
pub const CONTROL_AIE0: u8 = 1 << 0;

/// Status bit: alarm 1 matched.
pub const STATUS_IRQF1: u8 = 1 << 1;
/// Status bit: alarm 0 matched.
pub const STATUS_IRQF0: u8 = 1 << 0;

/// Alarm register bit 7: field ignored when matching.
pub const ALARM_DONT_CARE: u8 = 0x80;

/// Dummy byte clocked out while reading one register.
pub const READ_DUMMY: u8 = 0x77;
/// Dummy byte clocked out while reading a block.
pub const BLOCK_READ_DUMMY: u8 = 0xB7;

/// Bus settings: CPOL=0 / CPHA=1, 2 MHz, CE active-high.
///
/// CE setup is 18 cycles, hold 2 cycles and inactive time 20 cycles at the
/// 16 MHz reference clock; expressed here in nanoseconds.
pub const PROFILE: DeviceProfile = DeviceProfile {
    config: SpiConfig::msb_first(2_000_000, SpiMode::Mode1),
    setup_ns: 1_125,
    hold_ns: 125,
    settle_ns: 1_250,
};

/// Clear the write tag.
pub const fn read_address(write_address: u8) -> u8 {
    write_address & !WRITE_FLAG
}

/// Set the write tag.
pub const fn write_address(read_address: u8) -> u8 {
    read_address | WRITE_FLAG
}

/// A tagged register address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAddress {
    /// Address byte with bit 7 clear.
    Read(u8),
    /// Address byte with bit 7 set.
    Write(u8),
}

impl RegisterAddress {
    /// Classify an address byte by its tag bit.
    pub const fn from_byte(byte: u8) -> Self {
        if byte & WRITE_FLAG == 0 {
            Self::Read(byte)
        } else {
            Self::Write(byte)
        }
    }

    /// Seven-bit register index, shared by both directions.
    pub const fn index(self) -> u8 {
        match self {
            Self::Read(b) | Self::Write(b) => b & !WRITE_FLAG,
        }
    }

    /// Byte on the wire.
    pub const fn byte(self) -> u8 {
        match self {
            Self::Read(b) | Self::Write(b) => b,
        }
    }
}
