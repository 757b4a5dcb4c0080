//! Continuously polled scan responder.
//!
//! Core1 spins on the column inputs and re-derives the row picture every
//! iteration, level-driven with no memory between iterations, so a missed
//! transition costs at most one loop. Core0 drains key events into the
//! store and services the debug console.

use crate::keyboard::status_led::StatusLed;
use crate::keyboard::MatrixPins;
use crate::runtime::shared;
use rp2040_hal::multicore::Multicore;
use rp2040_hal::rom_data::reset_to_usb_boot;
use ti99_kbd_lib::scan::closed_rows;

static mut CORE_1_STACK_AREA: [usize; 1024] = [0; 1024];

pub fn run<'a>(mc: &'a mut Multicore<'a>, matrix: MatrixPins, mut led: StatusLed) -> ! {
    #[allow(static_mut_refs)]
    if let Err(_e) = mc.cores()[1].spawn(unsafe { &mut CORE_1_STACK_AREA }, move || {
        run_scan_core(matrix)
    }) {
        // No responder core, nothing to emulate. Drop to usb-boot so new
        // firmware can be loaded.
        reset_to_usb_boot(0, 0);
        panic!("HALT POST RESET");
    }
    led.turn_on();
    loop {
        let applied = shared::translate_pending();
        #[cfg(feature = "serial")]
        {
            for event in &applied {
                shared::usb::debug(format_args!(
                    "HID {:#04x} {}\r\n",
                    event.hid,
                    if event.pressed { "down" } else { "up" }
                ));
            }
            shared::usb::service_console(&mut led);
        }
        #[cfg(not(feature = "serial"))]
        let _ = applied;
    }
}

fn run_scan_core(mut matrix: MatrixPins) -> ! {
    loop {
        let asserted = matrix.read_columns();
        // Safety: read-only access from the scan context
        let closed = closed_rows(unsafe { shared::key_state() }, &asserted);
        matrix.drive_rows(&closed);
    }
}
