//! Pin-level view of the emulated keyboard connector.
//!
//! Column lines are inputs the console drives (active low while scanning),
//! row lines are push-pull outputs resting high. Once built, these pins
//! belong to the scan responder for the rest of the process, nothing else
//! reconfigures them.

pub(crate) mod status_led;

#[cfg(feature = "poll")]
use embedded_hal::digital::{InputPin, OutputPin};
use rp2040_hal::gpio::bank0::{
    Gpio19, Gpio2, Gpio20, Gpio21, Gpio22, Gpio26, Gpio27, Gpio28, Gpio3, Gpio4, Gpio5, Gpio6,
    Gpio7, Gpio8, Gpio9,
};
use rp2040_hal::gpio::{DynPinId, FunctionSio, Pin, PullDown, PullUp, SioInput, SioOutput};

pub type ColPin = Pin<DynPinId, FunctionSio<SioInput>, PullUp>;
pub type RowPin = Pin<DynPinId, FunctionSio<SioOutput>, PullDown>;
type ColInput<Id> = Pin<Id, FunctionSio<SioInput>, PullUp>;
type RowOutput<Id> = Pin<Id, FunctionSio<SioOutput>, PullDown>;

pub const NUM_COLS: usize = ti99_kbd_lib::matrix::NUM_COLS as usize;
pub const NUM_ROWS: usize = ti99_kbd_lib::matrix::NUM_ROWS as usize;

/// Pico GPIO wired to each logical column, same order as
/// [`ti99_kbd_lib::matrix::COLUMN_LINES`].
pub const COL_GPIOS: [u8; NUM_COLS] = [28, 27, 26, 22, 21, 20, 19];

/// Connector line of the column wired to a GPIO, `None` for anything not on
/// the column wiring list.
#[cfg(feature = "irq")]
#[must_use]
pub fn column_line_for_gpio(gpio: u8) -> Option<u8> {
    COL_GPIOS
        .iter()
        .position(|g| *g == gpio)
        .map(|ind| ti99_kbd_lib::matrix::COLUMN_LINES[ind])
}

pub struct MatrixPins {
    cols: [ColPin; NUM_COLS],
    rows: [RowPin; NUM_ROWS],
}

impl MatrixPins {
    /// Takes the wired pins, columns in [`COL_GPIOS`] order, rows on GPIO
    /// 2 through 9 in [`ti99_kbd_lib::matrix::ROW_LINES`] order. The typed
    /// tuples keep the wiring and this list from drifting apart.
    pub fn new(
        cols: (
            ColInput<Gpio28>,
            ColInput<Gpio27>,
            ColInput<Gpio26>,
            ColInput<Gpio22>,
            ColInput<Gpio21>,
            ColInput<Gpio20>,
            ColInput<Gpio19>,
        ),
        rows: (
            RowOutput<Gpio2>,
            RowOutput<Gpio3>,
            RowOutput<Gpio4>,
            RowOutput<Gpio5>,
            RowOutput<Gpio6>,
            RowOutput<Gpio7>,
            RowOutput<Gpio8>,
            RowOutput<Gpio9>,
        ),
    ) -> Self {
        Self {
            cols: [
                cols.0.into_dyn_pin(),
                cols.1.into_dyn_pin(),
                cols.2.into_dyn_pin(),
                cols.3.into_dyn_pin(),
                cols.4.into_dyn_pin(),
                cols.5.into_dyn_pin(),
                cols.6.into_dyn_pin(),
            ],
            rows: [
                rows.0.into_dyn_pin(),
                rows.1.into_dyn_pin(),
                rows.2.into_dyn_pin(),
                rows.3.into_dyn_pin(),
                rows.4.into_dyn_pin(),
                rows.5.into_dyn_pin(),
                rows.6.into_dyn_pin(),
                rows.7.into_dyn_pin(),
            ],
        }
    }

    /// Which columns the console is asserting right now, active low.
    #[cfg(feature = "poll")]
    #[inline]
    pub fn read_columns(&mut self) -> [bool; NUM_COLS] {
        let mut asserted = [false; NUM_COLS];
        for (ind, col) in self.cols.iter_mut().enumerate() {
            asserted[ind] = matches!(col.is_low(), Ok(true));
        }
        asserted
    }

    /// Hold the closed rows low, rest everything else high.
    #[cfg(feature = "poll")]
    #[inline]
    pub fn drive_rows(&mut self, closed: &[bool; NUM_ROWS]) {
        for (ind, row) in self.rows.iter_mut().enumerate() {
            let _ = if closed[ind] {
                row.set_low()
            } else {
                row.set_high()
            };
        }
    }

    #[cfg(feature = "irq")]
    pub(crate) fn split(self) -> ([ColPin; NUM_COLS], [RowPin; NUM_ROWS]) {
        (self.cols, self.rows)
    }
}
