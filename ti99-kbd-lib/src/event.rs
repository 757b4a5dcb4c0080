//! Key event hand-off between the USB host-stack context and the translator.
//!
//! The host stack reports every key transition exactly once, the queue keeps
//! them in press order until the main loop drains them into [`KeyState`].
//!
//! [`KeyState`]: crate::state::KeyState

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    pub hid: u8,
    pub pressed: bool,
}

/// Fixed-capacity FIFO. Push reports failure when full rather than dropping
/// the oldest, losing a release is worse than losing a press.
pub struct EventQueue<const N: usize> {
    buffer: [Option<KeyEvent>; N],
    head: usize,
    len: usize,
}

impl<const N: usize> EventQueue<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [None; N],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn try_push(&mut self, event: KeyEvent) -> bool {
        if self.len == N {
            return false;
        }
        let mut tail = self.head + self.len;
        if tail >= N {
            tail -= N;
        }
        self.buffer[tail] = Some(event);
        self.len += 1;
        true
    }

    pub fn pop(&mut self) -> Option<KeyEvent> {
        if self.len == 0 {
            return None;
        }
        let event = self.buffer[self.head].take();
        self.head = if self.head >= N - 1 { 0 } else { self.head + 1 };
        self.len -= 1;
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(hid: u8, pressed: bool) -> KeyEvent {
        KeyEvent { hid, pressed }
    }

    #[test]
    fn push_pop_in_order() {
        let mut queue: EventQueue<16> = EventQueue::new();
        assert!(queue.pop().is_none());
        assert!(queue.try_push(ev(0x04, true)));
        assert!(queue.try_push(ev(0x05, true)));
        assert!(queue.try_push(ev(0x04, false)));
        assert_eq!(Some(ev(0x04, true)), queue.pop());
        assert_eq!(Some(ev(0x05, true)), queue.pop());
        assert_eq!(Some(ev(0x04, false)), queue.pop());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn rejects_when_full() {
        let mut queue: EventQueue<4> = EventQueue::new();
        for hid in 0..4 {
            assert!(queue.try_push(ev(hid, true)));
        }
        assert!(!queue.try_push(ev(4, true)));
        assert_eq!(Some(ev(0, true)), queue.pop());
        assert!(queue.try_push(ev(4, true)));
        assert_eq!(4, queue.len());
    }

    #[test]
    fn wraps() {
        let mut queue: EventQueue<8> = EventQueue::new();
        for round in 0..64u8 {
            assert!(queue.try_push(ev(round, round % 2 == 0)));
            assert_eq!(Some(ev(round, round % 2 == 0)), queue.pop());
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn wrap_chunks() {
        let mut queue: EventQueue<8> = EventQueue::new();
        for chunk in 0..8 {
            for hid in 0..chunk {
                assert!(queue.try_push(ev(hid, true)));
            }
            for hid in 0..chunk {
                assert_eq!(Some(ev(hid, true)), queue.pop());
            }
            assert!(queue.pop().is_none());
        }
    }
}
