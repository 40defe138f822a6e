//! Moonpad Knobs Module Firmware
//!
//! Firmware for the three-encoder knob module (RP2040). Serves the module
//! bus protocol as an I2C slave and feeds encoder deltas and button edges
//! into the changes record between transactions.

#![no_std]
#![no_main]

mod encoder;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c;
use embassy_rp::i2c_slave::{self, Command, I2cSlave};
use embassy_rp::peripherals::{FLASH, I2C0, PIN_0, PIN_1};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use moonpad_core::dispatch::{Dispatcher, SessionChange};
use moonpad_core::module::KnobsHandler;
use moonpad_hal::identity::{SerialSource, UNIQUE_SERIAL_LEN};
use moonpad_protocol::{BusAddress, ModuleType, Reply};

use crate::encoder::Encoder;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// The dispatcher, shared between the bus session task (frames) and the
/// sensor tasks (deltas and edges). The mutex is the explicit ownership
/// boundary around every read-modify-write.
type SharedDispatcher = Mutex<CriticalSectionRawMutex, Dispatcher<KnobsHandler>>;
static DISPATCHER: StaticCell<SharedDispatcher> = StaticCell::new();

/// Flash size of the module board
const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Button debounce time
const DEBOUNCE_MS: u64 = 20;

/// Unique serial backed by the RP2040 flash UID (8 bytes, zero-padded
/// to the protocol's 10)
struct ChipSerial([u8; UNIQUE_SERIAL_LEN]);

impl ChipSerial {
    fn read(flash: Peri<'static, FLASH>) -> Self {
        let mut flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(flash);
        let mut uid = [0u8; 8];
        flash.blocking_unique_id(&mut uid).unwrap();

        let mut serial = [0u8; UNIQUE_SERIAL_LEN];
        serial[..uid.len()].copy_from_slice(&uid);
        Self(serial)
    }
}

impl SerialSource for ChipSerial {
    fn unique_serial(&self) -> [u8; UNIQUE_SERIAL_LEN] {
        self.0
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Moonpad knobs module starting...");

    let p = embassy_rp::init(Default::default());

    // Friend code is generated exactly once, before the bus opens
    let serial = ChipSerial::read(p.FLASH);
    let dispatcher: &'static SharedDispatcher = DISPATCHER.init(Mutex::new(Dispatcher::new(
        ModuleType::Knobs,
        &serial,
        KnobsHandler::new(),
    )));

    // Encoders: A/B pairs per channel
    spawner
        .spawn(encoder_task(
            dispatcher,
            0,
            Input::new(p.PIN_2, Pull::Up),
            Input::new(p.PIN_3, Pull::Up),
        ))
        .unwrap();
    spawner
        .spawn(encoder_task(
            dispatcher,
            1,
            Input::new(p.PIN_4, Pull::Up),
            Input::new(p.PIN_5, Pull::Up),
        ))
        .unwrap();
    spawner
        .spawn(encoder_task(
            dispatcher,
            2,
            Input::new(p.PIN_6, Pull::Up),
            Input::new(p.PIN_7, Pull::Up),
        ))
        .unwrap();

    // Push buttons, one per encoder
    spawner
        .spawn(button_task(dispatcher, 0, Input::new(p.PIN_8, Pull::Up)))
        .unwrap();
    spawner
        .spawn(button_task(dispatcher, 1, Input::new(p.PIN_9, Pull::Up)))
        .unwrap();
    spawner
        .spawn(button_task(dispatcher, 2, Input::new(p.PIN_10, Pull::Up)))
        .unwrap();

    // Bus session loop (SDA=GP0, SCL=GP1)
    spawner
        .spawn(bus_task(dispatcher, p.I2C0, p.PIN_1, p.PIN_0))
        .unwrap();

    info!("All tasks spawned");
}

/// Bus session task
///
/// Owns the I2C peripheral for the lifetime of the firmware. Each loop
/// turn is one session bound to one address; a swap-address command ends
/// the session, and the next turn reopens the peripheral at the new
/// address with both callbacks re-armed - strictly after the swap frame's
/// transaction finished.
#[embassy_executor::task]
async fn bus_task(
    dispatcher: &'static SharedDispatcher,
    mut i2c: Peri<'static, I2C0>,
    mut scl: Peri<'static, PIN_1>,
    mut sda: Peri<'static, PIN_0>,
) {
    info!("Bus task started");

    let mut address = BusAddress::DEFAULT;
    loop {
        let mut config = i2c_slave::Config::default();
        config.addr = address.get() as u16;

        let mut bus = I2cSlave::new(i2c.reborrow(), scl.reborrow(), sda.reborrow(), Irqs, config);
        info!("Bus session open at address {=u8:#x}", address.get());

        address = serve(dispatcher, &mut bus).await;
        // Dropping the slave closes the old session before rebinding
    }
}

/// Serve one bus session; returns the address to rebind to
async fn serve(dispatcher: &'static SharedDispatcher, bus: &mut I2cSlave<'_, I2C0>) -> BusAddress {
    let mut buf = [0u8; 16];

    loop {
        match bus.listen(&mut buf).await {
            Ok(Command::Write(len)) => {
                let len = len.min(buf.len());
                let change = dispatcher.lock().await.on_receive(&buf[..len]);
                if let Some(SessionChange::Rebind(address)) = change {
                    return address;
                }
            }
            Ok(Command::Read) => {
                let reply = dispatcher.lock().await.on_request();
                respond(bus, reply).await;
            }
            Ok(Command::WriteRead(len)) => {
                let len = len.min(buf.len());
                let (change, reply) = {
                    let mut guard = dispatcher.lock().await;
                    let change = guard.on_receive(&buf[..len]);
                    (change, guard.on_request())
                };
                respond(bus, reply).await;
                if let Some(SessionChange::Rebind(address)) = change {
                    return address;
                }
            }
            Ok(Command::GeneralCall(_)) => {
                trace!("General call ignored");
            }
            Err(e) => {
                warn!("Bus listen error: {:?}", e);
            }
        }
    }
}

/// Answer a bus read with the reply bytes, zero-padded if the controller
/// clocks out more than we have
async fn respond(bus: &mut I2cSlave<'_, I2C0>, reply: Option<Reply>) {
    let bytes = reply.unwrap_or_default();
    if let Err(e) = bus.respond_and_fill(&bytes, 0x00).await {
        warn!("Bus respond error: {:?}", e);
    }
}

/// Encoder rotation task, one per channel
#[embassy_executor::task(pool_size = 3)]
async fn encoder_task(
    dispatcher: &'static SharedDispatcher,
    channel: usize,
    a: Input<'static>,
    b: Input<'static>,
) {
    info!("Encoder task {} started", channel);

    let mut encoder = Encoder::new(a, b);

    loop {
        if let Some(delta) = encoder.poll().await {
            dispatcher
                .lock()
                .await
                .handler_mut()
                .record_rotation(channel, delta);
        }
    }
}

/// Button edge task, one per channel
#[embassy_executor::task(pool_size = 3)]
async fn button_task(dispatcher: &'static SharedDispatcher, channel: usize, mut btn: Input<'static>) {
    info!("Button task {} started", channel);

    loop {
        btn.wait_for_falling_edge().await;

        // Debounce
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        if btn.is_high() {
            continue;
        }

        dispatcher.lock().await.handler_mut().record_press(channel);
        debug!("Button {} pressed", channel);

        btn.wait_for_rising_edge().await;
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;

        dispatcher.lock().await.handler_mut().record_release(channel);
        debug!("Button {} released", channel);
    }
}
