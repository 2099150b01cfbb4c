//! Cortex-M exception handlers.
//!
//! A HardFault (bus fault on a bad address, stack overflow past the bottom
//! of RAM, illegal instruction) reports the stacked frame over RTT and
//! halts. The independent watchdog then resets the clock, which comes back
//! through the normal boot sequence at 00:00:00.
//!
//! The handler needs ARM target intrinsics and is gated behind the
//! `hardware` feature; the marker constant compiles everywhere so host
//! tests can see the module is linked in.

#![allow(clippy::doc_markdown)]

/// Set when this module is compiled into the crate.
pub const HARDFAULT_DEFINED: bool = true;

/// HardFault exception handler (hardware target only).
///
/// # Safety
///
/// Must never return; returning from a HardFault handler is undefined
/// behavior on Cortex-M.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!(
        "HardFault at pc=0x{:08X} lr=0x{:08X}; watchdog reset follows",
        ef.pc(),
        ef.lr()
    );
}
