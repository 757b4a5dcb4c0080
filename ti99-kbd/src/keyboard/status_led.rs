use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use rp2040_hal::gpio::bank0::Gpio25;
use rp2040_hal::gpio::{FunctionSio, Pin, PullDown, SioOutput};

/// The Pico's onboard LED, lit while the emulator is up.
pub struct StatusLed {
    pin: Pin<Gpio25, FunctionSio<SioOutput>, PullDown>,
}

impl StatusLed {
    pub fn new(pin: Pin<Gpio25, FunctionSio<SioOutput>, PullDown>) -> Self {
        Self { pin }
    }

    #[inline]
    #[allow(dead_code)]
    pub fn is_on(&mut self) -> bool {
        matches!(self.pin.is_set_high(), Ok(true))
    }

    #[inline]
    pub fn turn_on(&mut self) {
        let _ = self.pin.set_high();
    }

    #[inline]
    #[allow(dead_code)]
    pub fn turn_off(&mut self) {
        let _ = self.pin.set_low();
    }
}
