//! DOG clock firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI.

#![no_std]
#![no_main]

use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_stm32::adc::Adc;
use embassy_stm32::dma::NoDma;
use embassy_stm32::exti::{Channel, ExtiInput};
use embassy_stm32::gpio::{AnyPin, Input, Level, Output, Pin, Pull, Speed};
use embassy_stm32::spi::Spi;
use embassy_time::{Delay, Timer};
use platform::{ds1306, SpiHost};

use firmware::config::IDLE_WAIT_MS;
use firmware::hal::{embassy_config, Spi1Controller};
use firmware::input::hardware::spawn_input_tasks;
use firmware::{
    Board, Controller, Ds1306, HumidIcon, LcdDog, SignalTrigger, ADC_LATCH, ADC_REQUEST, EVENTS,
};

// Panic handler
use panic_probe as _;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("DOG clock firmware v{=str}", env!("CARGO_PKG_VERSION"));
    defmt::info!("Initializing STM32H743ZI, Cortex-M7 @ 400 MHz");

    let p = embassy_stm32::init(firmware::boot::build_embassy_config());

    // The watchdog uses the 32 kHz LSI clock and is independent of the main
    // PLL. Once unleashed it cannot be stopped: the main loop must call
    // watchdog.pet() at least once per WATCHDOG_TIMEOUT_MS.
    let mut watchdog = embassy_stm32::wdg::IndependentWatchdog::new(
        p.IWDG1,
        firmware::boot::init_watchdog_config(),
    );
    watchdog.unleash();
    defmt::info!(
        "IWDG watchdog armed: timeout={=u32}ms",
        firmware::boot::WATCHDOG_TIMEOUT_MS
    );

    // Select lines first, all inactive: CE is active high, SS and CSB are active low.
    let rtc_ce = Output::new(p.PD14, Level::Low, Speed::VeryHigh);
    let sensor_ss = Output::new(p.PD15, Level::High, Speed::VeryHigh);
    let lcd_csb = Output::new(p.PD12, Level::High, Speed::VeryHigh);
    let lcd_rs = Output::new(p.PD13, Level::Low, Speed::VeryHigh);
    let alarm_out = Output::new(p.PB0, Level::Low, Speed::Low);

    // SPI1: PA5 (SCK), PA7 (MOSI), PA6 (MISO). Blocking; every device
    // reprograms mode and clock rate at the start of its transaction.
    let spi = Spi::new(
        p.SPI1,
        p.PA5,
        p.PA7,
        p.PA6,
        NoDma,
        NoDma,
        embassy_config(ds1306::PROFILE.config),
    );
    let bus = SpiHost::new(Spi1Controller::new(spi), Delay);

    // -----------------------------------------------------------------------
    // Interrupt-side producers
    //
    //   PB8      = keypad DA     EXTI8 rising edge
    //   PE0–PE3  = keypad D0–D3  GPIO input only
    //   PB9      = DS1306 1 Hz   EXTI9 rising edge (open drain)
    //   PB10     = DS1306 INT0   EXTI10 falling edge (open drain)
    //   PC0      = CO2 sensor    ADC1
    // -----------------------------------------------------------------------
    let keypad_da: ExtiInput<'static, AnyPin> =
        ExtiInput::new(Input::new(p.PB8, Pull::None).degrade(), p.EXTI8.degrade());
    let keypad_data = [
        Input::new(p.PE0.degrade(), Pull::None),
        Input::new(p.PE1.degrade(), Pull::None),
        Input::new(p.PE2.degrade(), Pull::None),
        Input::new(p.PE3.degrade(), Pull::None),
    ];
    let rtc_1hz: ExtiInput<'static, AnyPin> =
        ExtiInput::new(Input::new(p.PB9, Pull::Up).degrade(), p.EXTI9.degrade());
    let rtc_int0: ExtiInput<'static, AnyPin> =
        ExtiInput::new(Input::new(p.PB10, Pull::Up).degrade(), p.EXTI10.degrade());
    let adc = Adc::new(p.ADC1);

    spawn_input_tasks(
        &spawner,
        keypad_da,
        keypad_data,
        rtc_1hz,
        rtc_int0,
        adc,
        p.PC0,
    );
    defmt::info!(
        "Input tasks spawned, queue depth={=usize}",
        firmware::config::EVENT_QUEUE_DEPTH
    );

    // -----------------------------------------------------------------------
    // Controller
    // -----------------------------------------------------------------------
    let (Ok(rtc), Ok(sensor), Ok(lcd)) = (
        Ds1306::new(rtc_ce),
        HumidIcon::new(sensor_ss),
        LcdDog::new(lcd_csb, lcd_rs),
    ) else {
        defmt::panic!("select line init failed");
    };
    let board = Board::new(
        bus,
        rtc,
        sensor,
        lcd,
        alarm_out,
        SignalTrigger::new(&ADC_REQUEST),
        &ADC_LATCH,
    );
    let mut controller = Controller::new(board);

    while let Err(e) = controller.boot() {
        defmt::error!("boot failed: {}; retrying", e);
        Timer::after_millis(IDLE_WAIT_MS).await;
        watchdog.pet();
    }

    defmt::info!("Entering main loop");
    let rx = EVENTS.receiver();
    loop {
        match select(rx.receive(), Timer::after_millis(IDLE_WAIT_MS)).await {
            Either::First(event) => {
                if let Err(e) = controller.handle(event) {
                    defmt::warn!("{} failed: {}", event, e);
                }
            }
            Either::Second(()) => defmt::trace!("idle"),
        }
        // Must run at least once every WATCHDOG_TIMEOUT_MS (8 s).
        watchdog.pet();
    }
}
