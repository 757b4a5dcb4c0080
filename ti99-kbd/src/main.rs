//! TI-99/4A keyboard emulator for the Raspberry Pi Pico.
//!
//! The console keeps scanning its keyboard connector as usual, this
//! firmware answers the scan with whatever keys the USB host-stack
//! integration reports through [`runtime::shared::on_key_event`].
#![cfg_attr(not(test), no_std)]
#![no_main]

pub(crate) mod keyboard;
pub(crate) mod runtime;

use crate::keyboard::status_led::StatusLed;
use crate::keyboard::MatrixPins;
use rp_pico::hal::gpio::PinState;
use rp_pico::hal::{self, pac};
use rp_pico::{entry, Pins};

#[cfg(all(feature = "poll", feature = "irq"))]
const _ILLEGAL_VARIANTS: () = assert!(false, "Can't compile as both poll and irq");

#[cfg(not(any(feature = "poll", feature = "irq")))]
const _NO_VARIANT: () = assert!(false, "Pick a scan responder: poll or irq");

#[entry]
fn main() -> ! {
    setup_kbd()
}

fn setup_kbd() -> ! {
    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    #[cfg_attr(not(feature = "serial"), allow(unused_variables))]
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    #[cfg_attr(not(feature = "poll"), allow(unused_mut))]
    let mut sio = hal::Sio::new(pac.SIO);
    let pins = Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    #[cfg(feature = "serial")]
    {
        let usb_bus = usb_device::bus::UsbBusAllocator::new(hal::usb::UsbBus::new(
            pac.USBCTRL_REGS,
            pac.USBCTRL_DPRAM,
            clocks.usb_clock,
            true,
            &mut pac.RESETS,
        ));
        // Safety: once, before any runtime loop runs
        unsafe {
            runtime::shared::usb::init_usb(usb_bus);
        }
    }

    let matrix = MatrixPins::new(
        (
            pins.gpio28.into_pull_up_input(),
            pins.gpio27.into_pull_up_input(),
            pins.gpio26.into_pull_up_input(),
            pins.gpio22.into_pull_up_input(),
            pins.gpio21.into_pull_up_input(),
            pins.gpio20.into_pull_up_input(),
            pins.gpio19.into_pull_up_input(),
        ),
        (
            pins.gpio2.into_push_pull_output_in_state(PinState::High),
            pins.gpio3.into_push_pull_output_in_state(PinState::High),
            pins.gpio4.into_push_pull_output_in_state(PinState::High),
            pins.gpio5.into_push_pull_output_in_state(PinState::High),
            pins.gpio6.into_push_pull_output_in_state(PinState::High),
            pins.gpio7.into_push_pull_output_in_state(PinState::High),
            pins.gpio8.into_push_pull_output_in_state(PinState::High),
            pins.gpio9.into_push_pull_output_in_state(PinState::High),
        ),
    );
    let led = StatusLed::new(pins.led.into_push_pull_output());

    #[cfg(feature = "smoke-test")]
    {
        // A probe on the connector should show COL_7's scan answered on
        // ROW_12 without any host stack attached
        let _ = runtime::shared::on_key_event(0x04, true);
    }

    #[cfg(feature = "poll")]
    {
        let mut mc = hal::multicore::Multicore::new(&mut pac.PSM, &mut pac.PPB, &mut sio.fifo);
        runtime::poll::run(&mut mc, matrix, led)
    }
    #[cfg(all(feature = "irq", not(feature = "poll")))]
    runtime::irq::run(matrix, led)
}

#[panic_handler]
#[inline(never)]
fn halt(_info: &core::panic::PanicInfo) -> ! {
    loop {
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}
