//! Pressed-key bookkeeping.
//!
//! One slot per column, holding the row currently asserted for that column.
//! A second press in the same column overwrites the first, the console's own
//! keyboard has the same one-key-per-column behavior under its scan, so
//! nothing queues or stacks.
//!
//! The store has exactly one writer ([`KeyState::set_key`], called from the
//! normal execution context) and is read by the scan responder, which may
//! run in interrupt context or on the other core. Every write replaces a
//! single column's slot, so a reader working one column at a time sees each
//! column either before or after an update, never mid-write.
//!
//! Slots record the full packed key, not just the row. Distinct HID keys
//! can land on the same physical switch ('S' and the fctn-chorded left
//! arrow both sit on COL_2/ROW_12), and only the packed key tells their
//! transitions apart.

use crate::keycode::MatrixKey;
use crate::matrix::{ColIndex, RowIndex, NUM_COLS};

pub struct KeyState {
    slots: [Option<MatrixKey>; NUM_COLS as usize],
    held_mods: [u8; 3],
}

impl KeyState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; NUM_COLS as usize],
            held_mods: [0; 3],
        }
    }

    /// The row asserted for `col`, if any. The responder-side read.
    #[inline]
    #[must_use]
    pub fn pressed_row(&self, col: ColIndex) -> Option<RowIndex> {
        self.slots[col.index()].map(MatrixKey::row)
    }

    /// Apply one key transition, chording the modifier in or out with it.
    ///
    /// A chorded modifier is reference-counted across currently held keys,
    /// releasing one shift-chorded key while another still holds shift
    /// leaves the shift slot asserted.
    pub fn set_key(&mut self, key: MatrixKey, pressed: bool) {
        if pressed && self.slots[key.col().index()] == Some(key) {
            // Repeat press with no release in between, already recorded.
            // Compares the whole packed key, a chorded key landing on a
            // held bare key's switch is a new press, not a repeat.
            return;
        }
        if let Some(modifier) = key.modifier() {
            let held = &mut self.held_mods[modifier.index()];
            if pressed {
                *held = held.saturating_add(1);
                self.press(modifier.key());
            } else {
                *held = held.saturating_sub(1);
                if *held == 0 {
                    self.release(modifier.key());
                }
            }
        }
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    #[inline]
    fn press(&mut self, key: MatrixKey) {
        self.slots[key.col().index()] = Some(key);
    }

    #[inline]
    fn release(&mut self, key: MatrixKey) {
        // Only clear the slot if it still records this key, a later press in
        // the same column wins
        if self.slots[key.col().index()] == Some(key) {
            self.slots[key.col().index()] = None;
        }
    }

    /// True if any column has a row asserted.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::Modifier;
    use crate::matrix::{COL_2, COL_3, COL_7, ROW_10, ROW_12, ROW_14, ROW_5, ROW_8};

    fn hid(code: u8) -> MatrixKey {
        MatrixKey::from_hid(code).unwrap()
    }

    #[test]
    fn press_and_release_one_key() {
        let mut state = KeyState::new();
        // 0x04 'A' lands in COL_7/ROW_12
        state.set_key(hid(0x04), true);
        assert_eq!(Some(ROW_12), state.pressed_row(COL_7));
        for ind in 0..NUM_COLS {
            if ind != COL_7.0 {
                assert_eq!(None, state.pressed_row(ColIndex::from_value(ind)));
            }
        }
        state.set_key(hid(0x04), false);
        assert!(!state.any_pressed());
    }

    #[test]
    fn same_column_overwrites() {
        let mut state = KeyState::new();
        // 'A' and 'P' share COL_7
        state.set_key(hid(0x04), true);
        state.set_key(hid(0x13), true);
        assert_eq!(Some(ROW_14), state.pressed_row(COL_7));
        // Releasing the overwritten key must not clear the winner
        state.set_key(hid(0x04), false);
        assert_eq!(Some(ROW_14), state.pressed_row(COL_7));
        state.set_key(hid(0x13), false);
        assert_eq!(None, state.pressed_row(COL_7));
    }

    #[test]
    fn columns_are_independent() {
        let mut state = KeyState::new();
        // 'W' in COL_2, 'A' in COL_7
        state.set_key(hid(0x1A), true);
        state.set_key(hid(0x04), true);
        assert_eq!(Some(ROW_5), state.pressed_row(COL_2));
        assert_eq!(Some(ROW_12), state.pressed_row(COL_7));
        state.set_key(hid(0x04), false);
        assert_eq!(Some(ROW_5), state.pressed_row(COL_2));
    }

    #[test]
    fn chorded_key_asserts_both_slots() {
        let mut state = KeyState::new();
        // 0x2D Minus is shift + COL_7/ROW_10
        state.set_key(hid(0x2D), true);
        assert_eq!(Some(ROW_10), state.pressed_row(COL_7));
        assert_eq!(Some(ROW_12), state.pressed_row(COL_3));
        state.set_key(hid(0x2D), false);
        assert!(!state.any_pressed());
    }

    #[test]
    fn repeat_press_is_idempotent() {
        let mut state = KeyState::new();
        state.set_key(hid(0x2D), true);
        state.set_key(hid(0x2D), true);
        // One release clears both the key and the chorded shift
        state.set_key(hid(0x2D), false);
        assert!(!state.any_pressed());
    }

    #[test]
    fn chord_on_a_held_bare_keys_switch_still_asserts_the_modifier() {
        let mut state = KeyState::new();
        // 'S' and the left arrow (fctn-S) close the same switch, COL_2/ROW_12
        state.set_key(hid(0x16), true);
        state.set_key(hid(0x50), true);
        assert_eq!(Some(ROW_12), state.pressed_row(COL_2));
        assert_eq!(Some(ROW_8), state.pressed_row(COL_3));
        // Releasing 'S' clears neither slot, the arrow recorded both
        state.set_key(hid(0x16), false);
        assert_eq!(Some(ROW_12), state.pressed_row(COL_2));
        assert_eq!(Some(ROW_8), state.pressed_row(COL_3));
        state.set_key(hid(0x50), false);
        assert!(!state.any_pressed());
    }

    #[test]
    fn bare_press_on_a_held_chords_switch_is_a_new_press() {
        let mut state = KeyState::new();
        // '-' is shift + COL_7/ROW_10, '/' is the same switch bare
        state.set_key(hid(0x2D), true);
        state.set_key(hid(0x38), true);
        assert_eq!(Some(ROW_10), state.pressed_row(COL_7));
        assert_eq!(Some(ROW_12), state.pressed_row(COL_3));
        state.set_key(hid(0x2D), false);
        // The slash press won the slot, shift goes out with the minus
        assert_eq!(Some(ROW_10), state.pressed_row(COL_7));
        assert_eq!(None, state.pressed_row(COL_3));
        state.set_key(hid(0x38), false);
        assert!(!state.any_pressed());
    }

    #[test]
    fn modifier_held_by_two_keys_survives_one_release() {
        let mut state = KeyState::new();
        state.set_key(hid(0x4F), true); // Right arrow, fctn + COL_1/ROW_12
        state.set_key(hid(0x51), true); // Down arrow, fctn + COL_2/ROW_4
        assert_eq!(Some(Modifier::Fctn.key().row()), state.pressed_row(COL_3));
        state.set_key(hid(0x4F), false);
        // Fctn still held by the down arrow
        assert_eq!(Some(Modifier::Fctn.key().row()), state.pressed_row(COL_3));
        state.set_key(hid(0x51), false);
        assert_eq!(None, state.pressed_row(COL_3));
    }

    #[test]
    fn unmapped_hid_is_a_noop() {
        for code in [0x29u8, 0x2A, 0x2B, 0x3A, 0x4E, 0x53, 0xFF] {
            assert!(MatrixKey::from_hid(code).is_none());
        }
    }
}
