//! State shared between the key-event path and the scan responder.
//!
//! The key state has exactly one writer, the event drain running in the
//! normal execution context on core0. The responder (core1 loop or the
//! `IO_IRQ_BANK0` handler) only reads it, one single-byte column slot at a
//! time, so no lock is needed beyond that discipline. The event queue is
//! touched from both sides of a context switch and sits behind a critical
//! section instead.

#[cfg(feature = "serial")]
pub(crate) mod usb;

#[cfg(any(feature = "irq", feature = "serial"))]
use core::cell::OnceCell;
use core::cell::UnsafeCell;
use ti99_kbd_lib::event::{EventQueue, KeyEvent};
use ti99_kbd_lib::keycode::MatrixKey;
use ti99_kbd_lib::state::KeyState;

pub(crate) struct SyncUnsafe<T>(UnsafeCell<T>);

unsafe impl<T> Sync for SyncUnsafe<T> {}

impl<T> SyncUnsafe<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    #[inline]
    pub(crate) const fn get(&self) -> *mut T {
        self.0.get()
    }
}

#[cfg(any(feature = "irq", feature = "serial"))]
pub(crate) struct SyncUnsafeOnce<T>(OnceCell<SyncUnsafe<T>>);

#[cfg(any(feature = "irq", feature = "serial"))]
unsafe impl<T> Sync for SyncUnsafeOnce<T> {}

#[cfg(any(feature = "irq", feature = "serial"))]
impl<T> SyncUnsafeOnce<T> {
    pub(crate) const fn new() -> Self {
        Self(OnceCell::new())
    }

    pub(crate) fn set(&self, val: T) {
        let _ = self.0.set(SyncUnsafe::new(val));
    }

    /// # Safety
    /// Only a single reference to this is held
    #[inline]
    pub(crate) unsafe fn as_mut<'a>(&'static self) -> Option<&'a mut T> {
        self.0.get().and_then(|r| r.get().as_mut())
    }
}

static KEY_STATE: SyncUnsafe<KeyState> = SyncUnsafe::new(KeyState::new());

static KEY_EVENTS: SyncUnsafe<EventQueue<32>> = SyncUnsafe::new(EventQueue::new());

/// The boundary the USB host-stack integration calls, once per key
/// transition, in the order the keys changed. Returns false if the queue is
/// full and the event was dropped.
#[allow(dead_code)]
pub fn on_key_event(hid: u8, pressed: bool) -> bool {
    critical_section::with(|_| {
        // Safety: exclusive access inside the critical section
        unsafe { (*KEY_EVENTS.get()).try_push(KeyEvent { hid, pressed }) }
    })
}

/// Drain pending key events into the key state. Must only be called from
/// the core0 event path, it is the store's single writer.
pub(crate) fn translate_pending() -> heapless::Vec<KeyEvent, 8> {
    let mut drained: heapless::Vec<KeyEvent, 8> = heapless::Vec::new();
    critical_section::with(|_| {
        // Safety: exclusive access inside the critical section
        let queue = unsafe { &mut *KEY_EVENTS.get() };
        while !drained.is_full() {
            let Some(event) = queue.pop() else {
                break;
            };
            let _ = drained.push(event);
        }
    });
    for event in &drained {
        if let Some(key) = MatrixKey::from_hid(event.hid) {
            // Safety: single writer, see module docs
            unsafe { (*KEY_STATE.get()).set_key(key, event.pressed) };
        }
    }
    drained
}

/// # Safety
/// Responder-side read access, column-granular, never held across a write
/// from this context
#[inline]
pub(crate) unsafe fn key_state<'a>() -> &'a KeyState {
    &*KEY_STATE.get()
}
