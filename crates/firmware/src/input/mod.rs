//! Keypad encoder input.
//!
//! The 16-key pad sits behind an encoder that presents a 4-bit key code on
//! D0–D3 and raises a data-available (DA) line once the code is stable. The
//! code is read on the DA rising edge; the encoder debounces in hardware.
//!
//! Decoding is pure so it can be tested on the host. The EXTI tasks that
//! sample the pins live in [`hardware`].

/// EXTI producer tasks (hardware target only).
#[cfg(feature = "hardware")]
pub mod hardware;

/// Key code from the encoder data lines, `d[0]` being D0 (LSB).
pub fn keypad_code(d: [bool; 4]) -> u8 {
    d.iter()
        .rev()
        .fold(0u8, |code, &bit| code.wrapping_shl(1) | u8::from(bit))
}
