//! Keypad symbols.
//!
//! The 4×4 keypad sits behind an encoder that reports a 4-bit code per key
//! press. Codes follow the physical layout row by row:
//!
//! ```text
//!  1   2   3   ↑
//!  4   5   6   ↓
//!  7   8   9   2nd
//!  CLR 0   ?   ENT
//! ```

/// One normalized key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Key {
    /// `1`
    One = 0,
    /// `2`
    Two = 1,
    /// `3`
    Three = 2,
    /// Scroll up.
    Up = 3,
    /// `4`
    Four = 4,
    /// `5`
    Five = 5,
    /// `6`
    Six = 6,
    /// Scroll down.
    Down = 7,
    /// `7`
    Seven = 8,
    /// `8`
    Eight = 9,
    /// `9`
    Nine = 10,
    /// Second-function key, opens the options menu.
    Second = 11,
    /// Clear.
    Clear = 12,
    /// `0`
    Zero = 13,
    /// Help.
    Help = 14,
    /// Enter.
    Enter = 15,
}

impl Key {
    /// Every key in encoder-code order.
    pub const ALL: [Key; 16] = [
        Key::One,
        Key::Two,
        Key::Three,
        Key::Up,
        Key::Four,
        Key::Five,
        Key::Six,
        Key::Down,
        Key::Seven,
        Key::Eight,
        Key::Nine,
        Key::Second,
        Key::Clear,
        Key::Zero,
        Key::Help,
        Key::Enter,
    ];

    /// Map an encoder code. Only the low four bits are meaningful.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Encoder code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decimal value of a digit key.
    pub const fn digit(self) -> Option<u8> {
        match self {
            Key::Zero => Some(0),
            Key::One => Some(1),
            Key::Two => Some(2),
            Key::Three => Some(3),
            Key::Four => Some(4),
            Key::Five => Some(5),
            Key::Six => Some(6),
            Key::Seven => Some(7),
            Key::Eight => Some(8),
            Key::Nine => Some(9),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn test_key_codes_round_trip() {
        for code in 0..16u8 {
            let key = Key::from_code(code);
            assert_eq!(key.map(Key::code), Some(code));
        }
    }

    #[test]
    fn test_key_code_out_of_range() {
        assert_eq!(Key::from_code(16), None);
        assert_eq!(Key::from_code(0xFF), None);
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(Key::from_code(3), Some(Key::Up));
        assert_eq!(Key::from_code(11), Some(Key::Second));
        assert_eq!(Key::from_code(13), Some(Key::Zero));
        assert_eq!(Key::from_code(15), Some(Key::Enter));
    }

    #[test]
    fn test_key_digits() {
        let digits: usize = Key::ALL.iter().filter(|k| k.digit().is_some()).count();
        assert_eq!(digits, 10);
        assert_eq!(Key::Zero.digit(), Some(0));
        assert_eq!(Key::Nine.digit(), Some(9));
        assert_eq!(Key::Enter.digit(), None);
    }
}
