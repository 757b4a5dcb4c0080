//! Falling-edge interrupt scan responder.
//!
//! Each column input gets an `EdgeLow` interrupt registered once at init.
//! The console's scan pulse fires `IO_IRQ_BANK0`, the handler maps the pin
//! back to a logical column and drives the recorded row low for the scan
//! window. An edge on an unrecognized pin services nothing, the hardware
//! interrupt dispatch is the only scheduler this variant needs.

use crate::keyboard::status_led::StatusLed;
use crate::keyboard::{column_line_for_gpio, ColPin, MatrixPins, RowPin, NUM_COLS, NUM_ROWS};
use crate::runtime::shared::{self, SyncUnsafeOnce};
use embedded_hal::digital::OutputPin;
use rp2040_hal::gpio::Interrupt::EdgeLow;
use rp_pico::hal::pac::{self, interrupt};
use ti99_kbd_lib::matrix::RowIndex;
use ti99_kbd_lib::scan::closed_row_for_line;

static SCANNER: SyncUnsafeOnce<EdgeScanner> = SyncUnsafeOnce::new();

struct EdgeScanner {
    cols: [ColPin; NUM_COLS],
    rows: [RowPin; NUM_ROWS],
    closed: Option<RowIndex>,
}

impl EdgeScanner {
    fn new(matrix: MatrixPins) -> Self {
        let (cols, rows) = matrix.split();
        for col in &cols {
            col.set_interrupt_enabled(EdgeLow, true);
        }
        Self {
            cols,
            rows,
            closed: None,
        }
    }

    /// One falling edge per invocation, the interrupt re-fires if another
    /// column's edge is still pending.
    fn service(&mut self) {
        for col in &self.cols {
            if !col.interrupt_status(EdgeLow) {
                continue;
            }
            col.clear_interrupt(EdgeLow);
            let gpio = col.id().num;
            let Some(line) = column_line_for_gpio(gpio) else {
                return;
            };
            // Safety: read-only access from the scan context
            let closed = closed_row_for_line(unsafe { shared::key_state() }, line);
            if let Some(prev) = self.closed.take() {
                let _ = self.rows[prev.index()].set_high();
            }
            if let Some(row) = closed {
                let _ = self.rows[row.index()].set_low();
                self.closed = Some(row);
            }
            return;
        }
    }
}

pub fn run(matrix: MatrixPins, mut led: StatusLed) -> ! {
    SCANNER.set(EdgeScanner::new(matrix));
    // Safety: the scanner static is initialized before the interrupt can fire
    unsafe {
        pac::NVIC::unmask(pac::Interrupt::IO_IRQ_BANK0);
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
        {
            let _ = applied;
            // Any interrupt wakes this, including whatever host-stack
            // integration feeds on_key_event
            cortex_m::asm::wfi();
        }
    }
}

/// Safety: sole consumer of the scanner static
#[interrupt]
#[allow(non_snake_case)]
fn IO_IRQ_BANK0() {
    // Safety: initialized before the interrupt is unmasked
    if let Some(scanner) = unsafe { SCANNER.as_mut() } {
        scanner.service();
    }
}
