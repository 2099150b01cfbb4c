//! Hardware boot sequence for the DOG clock.
//!
//! Initialization order:
//!   1. Clock tree (HSI → PLL1, 400 MHz system clock)
//!   2. Independent watchdog armed
//!   3. SPI1 and the select / RS / alarm output lines, all inactive
//!   4. EXTI producer tasks and the ADC task spawned
//!   5. Controller boot: clock registers, NV RAM check, sensor, LCD, home page
//!   6. Main loop: await an event (1 s timeout), handle it, feed the watchdog
//!
//! Select lines must be driven inactive before the first transfer: an
//! undriven line can leave two devices selected on the shared bus.

/// Ordered list of boot steps, for documentation and testing.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. RCC: HSI 64 MHz -> PLL1 400 MHz system clock",
    "2. IWDG: arm independent watchdog",
    "3. GPIO: drive CE low, SS/CSB high, alarm output low",
    "4. SPI1: blocking controller, reconfigured per device",
    "5. EXTI: spawn keypad, 1 Hz tick and alarm producers; spawn ADC task",
    "6. Controller: configure DS1306, NV RAM self-test, LCD init, draw home",
    "7. Main loop: receive event or time out, handle, pet watchdog",
];

/// Independent watchdog timeout.
///
/// The main loop feeds the watchdog at least once per
/// [`crate::config::IDLE_WAIT_MS`]; the longest blocking action (a held
/// message) stays well inside this window.
pub const WATCHDOG_TIMEOUT_MS: u32 = 8_000;

/// Watchdog timeout in the unit `IndependentWatchdog::new` takes (µs).
pub const fn init_watchdog_config() -> u32 {
    WATCHDOG_TIMEOUT_MS.saturating_mul(1_000)
}

/// Build the embassy-stm32 configuration.
///
/// Always call `embassy_stm32::init(build_embassy_config())` from `main.rs`.
/// The default configuration runs the core from HSI at 64 MHz, which still
/// works but leaves the SPI kernel clock lower than the prescaler table in
/// `main.rs` assumes.
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    // ── Oscillators ─────────────────────────────────────────────────────────
    // HSI: 64 MHz internal oscillator (no prescaler)
    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    // CSI: required for some analog peripherals on H7 (ADC)
    config.rcc.csi = true;

    // ── PLL1: system clock ───────────────────────────────────────────────────
    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(50) = 800 MHz VCO
    // PLL1_P = VCO / divp(2) = 400 MHz  → system clock
    // PLL1_Q = VCO / divq(8) = 100 MHz  → SPI1 kernel clock (SPI123SEL default)
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2),
        divq: Some(PllDiv::DIV8),
        divr: None,
    });

    // ── System clock + bus prescalers ────────────────────────────────────────
    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

// ─── Tests ────────────────────────────────────────────────────────────────────
