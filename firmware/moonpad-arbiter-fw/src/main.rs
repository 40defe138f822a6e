//! Moonpad Master Arbiter Firmware
//!
//! Boot-time firmware for the helping-hand circuit. Waits for one of the
//! candidate master lines to assert, routes the bus to the winner, cuts
//! off every other candidate, and goes to sleep until the next power
//! cycle. It never serves the module bus itself - arbitration is bare
//! GPIO, no bus traffic.

#![no_std]
#![no_main]

use cortex_m::asm;
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{block_for, Duration};
use {defmt_rtt as _, panic_probe as _};

use moonpad_core::arbiter::Arbiter;
use moonpad_core::config::ArbiterConfig;
use moonpad_hal::{DelayMs, InputPin, OutputPin};

/// Number of candidate master lines
const MASTER_LINES: usize = 4;

/// Candidate sense line
///
/// Internal pullup stands in for the missing external resistor; a
/// candidate asserts by driving the line high.
struct SenseLine(Input<'static>);

impl InputPin for SenseLine {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Mux switch, route-select or power-gate output
struct SwitchLine(Output<'static>);

impl OutputPin for SwitchLine {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Busy-wait delay for the poll loop
///
/// Nothing else runs on this chip, so blocking the executor is fine.
struct BusyDelay;

impl DelayMs for BusyDelay {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Moonpad master arbiter starting...");

    let p = embassy_rp::init(Default::default());

    let lines = [
        SenseLine(Input::new(p.PIN_2, Pull::Up)),
        SenseLine(Input::new(p.PIN_3, Pull::Up)),
        SenseLine(Input::new(p.PIN_4, Pull::Up)),
        SenseLine(Input::new(p.PIN_5, Pull::Up)),
    ];
    let switches = [
        SwitchLine(Output::new(p.PIN_6, Level::Low)),
        SwitchLine(Output::new(p.PIN_7, Level::Low)),
        SwitchLine(Output::new(p.PIN_8, Level::Low)),
        SwitchLine(Output::new(p.PIN_9, Level::Low)),
    ];
    let select = [
        SwitchLine(Output::new(p.PIN_10, Level::Low)),
        SwitchLine(Output::new(p.PIN_11, Level::Low)),
    ];
    let gate = SwitchLine(Output::new(p.PIN_12, Level::Low));

    let arbiter: Arbiter<_, _, _, MASTER_LINES> = Arbiter::new(
        lines,
        switches,
        select,
        gate,
        BusyDelay,
        ArbiterConfig::default(),
    );

    let committed = arbiter.arbitrate();
    info!("Master line {} owns the bus", committed.winner());

    // The selection is sealed until the next power cycle; nothing left
    // to do but sleep
    loop {
        asm::wfi();
    }
}
