//! USB-serial debug console.
//!
//! Output is off until the host sends `output`, the other commands are
//! `boot` (reset to usb-boot for reflashing), `led` (toggle the status
//! LED), and `press`/`lift` (inject a key transition for the letter A,
//! useful for poking the matrix with a logic probe attached). Only the
//! core0 runtime loop touches any of this.

use crate::keyboard::status_led::StatusLed;
use crate::runtime::shared::SyncUnsafeOnce;
use core::fmt::Write;
use rp2040_hal::usb::UsbBus;
use usb_device::bus::UsbBusAllocator;
use usb_device::device::{StringDescriptors, UsbDevice, UsbDeviceBuilder, UsbVidPid};
use usb_device::UsbError;
use usbd_serial::SerialPort;

struct SyncBus(core::cell::OnceCell<UsbBusAllocator<UsbBus>>);

unsafe impl Sync for SyncBus {}

static USB_BUS: SyncBus = SyncBus(core::cell::OnceCell::new());

static DEBUG_SERIAL: SyncUnsafeOnce<DebugSerial> = SyncUnsafeOnce::new();

pub(crate) struct DebugSerial {
    port: SerialPort<'static, UsbBus>,
    dev: UsbDevice<'static, UsbBus>,
    output: bool,
    last_chars: [u8; 64],
}

impl DebugSerial {
    fn new(bus: &'static UsbBusAllocator<UsbBus>) -> Self {
        // Ordering is important, the port has to exist before the device
        let port = SerialPort::new(bus);
        let dev = UsbDeviceBuilder::new(bus, UsbVidPid(0x16c0, 0x27dd))
            .strings(&[StringDescriptors::default()
                .manufacturer("ti99-kbd")
                .product("TI-99/4A keyboard emulator")
                .serial_number("1")])
            .unwrap()
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();
        Self {
            port,
            dev,
            output: false,
            last_chars: [0u8; 64],
        }
    }

    fn write_all(&mut self, buf: &[u8]) {
        for chunk in buf.chunks(16) {
            let mut rem = chunk;
            while !rem.is_empty() {
                match self.port.write(rem) {
                    Ok(wrote) => {
                        rem = &rem[wrote..];
                    }
                    Err(UsbError::WouldBlock) => {}
                    Err(_e) => {
                        return;
                    }
                }
            }
        }
    }
}

impl Write for DebugSerial {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        if self.output {
            self.write_all(s.as_bytes());
        }
        Ok(())
    }
}

/// # Safety
/// Call once, before [`service_console`] or [`debug`]
pub(crate) unsafe fn init_usb(allocator: UsbBusAllocator<UsbBus>) {
    let _ = USB_BUS.0.set(allocator);
    DEBUG_SERIAL.set(DebugSerial::new(USB_BUS.0.get().unwrap()));
}

/// Format debug output to the console, dropped silently while `output` is
/// off or the console is uninitialized.
pub(crate) fn debug(args: core::fmt::Arguments) {
    // Safety: only the core0 runtime loop reaches the serial statics
    if let Some(serial) = unsafe { DEBUG_SERIAL.as_mut() } {
        let _ = serial.write_fmt(args);
    }
}

/// Poll the device and react to any console command.
pub(crate) fn service_console(led: &mut StatusLed) {
    // Safety: only the core0 runtime loop reaches the serial statics
    let Some(serial) = (unsafe { DEBUG_SERIAL.as_mut() }) else {
        return;
    };
    if !serial.dev.poll(&mut [&mut serial.port]) {
        return;
    }
    let mut buf = [0u8; 64];
    match serial.port.read(&mut buf) {
        Err(_e) | Ok(0) => {}
        Ok(count) => {
            let len = serial.last_chars.len();
            for byte in &buf[..count] {
                serial.last_chars.copy_within(1..len, 0);
                serial.last_chars[len - 1] = *byte;
                if serial.last_chars.ends_with(b"boot") {
                    serial.output = true;
                    let _ = serial.write_str("BOOT\r\n");
                    rp2040_hal::rom_data::reset_to_usb_boot(0, 0);
                } else if serial.last_chars.ends_with(b"output") {
                    serial.output = true;
                    let _ = serial.write_str("OUTPUT ON\r\n");
                } else if serial.last_chars.ends_with(b"led") {
                    if led.is_on() {
                        led.turn_off();
                    } else {
                        led.turn_on();
                    }
                } else if serial.last_chars.ends_with(b"press") {
                    if !crate::runtime::shared::on_key_event(0x04, true) {
                        let _ = serial.write_str("QUEUE FULL\r\n");
                    }
                } else if serial.last_chars.ends_with(b"lift") {
                    if !crate::runtime::shared::on_key_event(0x04, false) {
                        let _ = serial.write_str("QUEUE FULL\r\n");
                    }
                }
            }
        }
    }
}
