//! Property-based tests for clock and sensor math.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::clock_types::{format_time, Bcd, RawTime};
use platform::ds1306;
use platform::humidicon::{scale_humidity, scale_temperature, RawSample, RAW_MAX};

proptest::proptest! {
    /// Every valid clock BCD byte 0x00..=0x59 decodes to its decimal value.
    #[test]
    fn format_time_round_trips_valid_bcd(tens in 0u8..=5u8, ones in 0u8..=9u8) {
        let raw = (tens << 4) | ones;
        assert_eq!(format_time(raw), tens * 10 + ones);
    }

    /// Encoding a decimal then formatting it gives the decimal back.
    #[test]
    fn bcd_from_decimal_then_format(value in 0u8..=99u8) {
        let bcd = Bcd::from_decimal(value).unwrap();
        assert!(bcd.is_valid());
        assert_eq!(format_time(bcd.raw()), value);
    }

    /// format_time never panics, even for non-BCD register garbage.
    #[test]
    fn format_time_never_panics(raw in 0u8..=255u8) {
        let _ = format_time(raw);
    }

    /// Tens/ones split survives the trip through the register byte.
    #[test]
    fn digits_are_preserved(tens in 0u8..=9u8, ones in 0u8..=9u8) {
        let bcd = Bcd::from_digits(tens, ones).unwrap();
        assert_eq!((bcd.tens(), bcd.ones()), (tens, ones));
    }

    /// RawTime::format agrees with format_time field by field.
    #[test]
    fn raw_time_format_matches_fields(h in 0u8..=0x23u8, m in 0u8..=0x59u8, s in 0u8..=0x59u8) {
        let t = RawTime::from_registers(h, m, s).format();
        assert_eq!(t.hours, format_time(h));
        assert_eq!(t.minutes, format_time(m));
        assert_eq!(t.seconds, format_time(s));
    }

    /// Read/write addresses of every register differ only in the tag bit.
    #[test]
    fn read_write_tag_is_bit7_only(index in 0u8..=0x7Fu8) {
        let wt = ds1306::write_address(index);
        assert_eq!(wt & 0x7F, index);
        assert_eq!(ds1306::read_address(wt), index);
    }

    /// Humidity scaling is strictly increasing over the 14-bit range.
    #[test]
    fn humidity_scaling_is_monotonic(raw in 0u16..RAW_MAX) {
        assert!(scale_humidity(raw + 1) > scale_humidity(raw),
            "humidity({}) must be < humidity({})", raw, raw + 1);
    }

    /// Temperature scaling is strictly increasing over the 14-bit range.
    #[test]
    fn temperature_scaling_is_monotonic(raw in 0u16..RAW_MAX) {
        assert!(scale_temperature(raw + 1) > scale_temperature(raw),
            "temperature({}) must be < temperature({})", raw, raw + 1);
    }

    /// Reassembled fields never exceed 14 bits.
    #[test]
    fn decoded_fields_fit_fourteen_bits(b in proptest::array::uniform4(0u8..=255u8)) {
        let raw = RawSample::from_bytes(b);
        assert!(raw.humidity <= RAW_MAX);
        assert!(raw.temperature <= RAW_MAX);
    }
}
