//! Firmware entry point: wires a real UART and a 1 kHz tick to `Controller`.
//!
//! Demonstrative glue only — the tested core logic all lives in the
//! `sensor_iface` library; this binary just supplies the `Clock`/`ByteSink`
//! trait impls the core asks for and drives the two execution contexts
//! described in the crate docs (a periodic tick, and draining received
//! bytes) from one `embassy` task. The UART runs in its async mode so a
//! byte read can be raced against the ticker: `ByteSource::poll_bytes` is a
//! synchronous, never-blocking poll, which a blocking UART read can't honor
//! (it waits for at least one byte), so this binary races the two futures
//! directly with `select` instead of going through that trait.
#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{Async, Config, DataBits, InterruptHandler, Parity, StopBits, Uart};
use embassy_time::{Duration, Instant, Ticker};
use sensor_iface::{ByteSink, Clock, Controller, SinkError};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UART0_IRQ => InterruptHandler<UART0>;
});

/// Tell the Boot ROM about our application (RP235x).
#[unsafe(link_section = ".start_block")]
#[used]
static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

/// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_cargo_bin_name!(),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_description!(c"Sensor Interface Module"),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

const TICK_PERIOD: Duration = Duration::from_millis(1);
const BAUD_RATE: u32 = 115_200;

struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

struct UartTransport<'d> {
    uart: Uart<'d, UART0, Async>,
}

impl ByteSink for UartTransport<'_> {
    fn write_byte(&mut self, byte: u8) -> Result<(), SinkError> {
        self.uart.blocking_write(&[byte]).map_err(|_| SinkError)
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let mut cfg = Config::default();
    cfg.baudrate = BAUD_RATE;
    cfg.data_bits = DataBits::Eight;
    cfg.parity = Parity::None;
    cfg.stop_bits = StopBits::One;

    let mut transport = UartTransport {
        uart: Uart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, p.DMA_CH0, p.DMA_CH1, cfg),
    };

    let clock = EmbassyClock;
    let mut controller = Controller::new_with_clock(&clock);
    let mut ticker = Ticker::every(TICK_PERIOD);
    let mut rx_buf = [0u8; 1];

    // The tick must advance on schedule whether or not a byte has arrived,
    // so the read is raced against the ticker rather than polled after it:
    // an idle RX line can never stall `controller.tick`.
    loop {
        // Bind the result before matching: the scrutinee's temporary would
        // otherwise keep `transport.uart` borrowed for the whole match,
        // conflicting with the `&mut transport` passed to `feed_byte` below.
        let outcome = select(ticker.next(), transport.uart.read(&mut rx_buf)).await;
        match outcome {
            Either::First(()) => controller.tick(clock.now_ms()),
            Either::Second(Ok(())) => {
                let byte = rx_buf[0];
                controller.feed_byte(byte, &mut transport);
            }
            Either::Second(Err(_)) => {}
        }
    }
}
