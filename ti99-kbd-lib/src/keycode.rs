//! HID-to-matrix key mapping.
//!
//! A [`MatrixKey`] packs the whole reproduction of one USB key into a byte:
//!
//! ```text
//! 0bMMCCCRRR
//!   - MM:  modifier to chord (none/ctrl/fctn/shift)
//!   - CCC: logical column index
//!   - RRR: logical row index
//! ```
//!
//! HID keycodes are the standard keyboard usage page, see
//! <https://github.com/adafruit/Adafruit_TinyUSB_ArduinoCore/blob/master/tinyusb/src/class/hid/hid.h#L303>

use crate::matrix::{
    ColIndex, RowIndex, COL_0, COL_1, COL_2, COL_3, COL_6, COL_7, COL_9, ROW_10, ROW_11, ROW_12,
    ROW_13, ROW_14, ROW_4, ROW_5, ROW_8,
};

/// Modifier key the console expects to be held together with a mapped key.
///
/// The discriminants are the packed two-bit field values, zero meaning no
/// modifier.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Modifier {
    Ctrl = 1,
    Fctn = 2,
    Shift = 3,
}

impl Modifier {
    const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Modifier::Ctrl),
            2 => Some(Modifier::Fctn),
            3 => Some(Modifier::Shift),
            _ => None,
        }
    }

    /// Index into per-modifier bookkeeping arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// The physical switch for this modifier, all three sit on `COL_3`.
    ///
    /// A modifier's own key never carries a modifier field, so chord
    /// expansion is bounded at one level by construction.
    #[must_use]
    pub const fn key(self) -> MatrixKey {
        match self {
            Modifier::Ctrl => MatrixKey::bare(COL_3, ROW_5),
            Modifier::Fctn => MatrixKey::bare(COL_3, ROW_8),
            Modifier::Shift => MatrixKey::bare(COL_3, ROW_12),
        }
    }
}

#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MatrixKey(u8);

impl MatrixKey {
    const MODIFIER_OFFSET: u8 = 6;
    const COLUMN_OFFSET: u8 = 3;
    const COLUMN_MASK: u8 = 0b0011_1000;
    const ROW_MASK: u8 = 0b0000_0111;

    #[must_use]
    pub const fn bare(col: ColIndex, row: RowIndex) -> Self {
        Self(col.0 << Self::COLUMN_OFFSET | row.0)
    }

    #[must_use]
    pub const fn chorded(modifier: Modifier, col: ColIndex, row: RowIndex) -> Self {
        Self((modifier as u8) << Self::MODIFIER_OFFSET | col.0 << Self::COLUMN_OFFSET | row.0)
    }

    /// Map an HID keycode, total over all of `u8`, unmapped keys are `None`.
    #[inline]
    #[must_use]
    pub fn from_hid(code: u8) -> Option<Self> {
        KEY_MAP.get(code as usize).copied().flatten()
    }

    #[inline]
    #[must_use]
    pub const fn col(self) -> ColIndex {
        ColIndex((self.0 & Self::COLUMN_MASK) >> Self::COLUMN_OFFSET)
    }

    #[inline]
    #[must_use]
    pub const fn row(self) -> RowIndex {
        RowIndex(self.0 & Self::ROW_MASK)
    }

    #[inline]
    #[must_use]
    pub const fn modifier(self) -> Option<Modifier> {
        Modifier::from_bits(self.0 >> Self::MODIFIER_OFFSET)
    }

    /// Chord expansion: the primary key with the modifier field stripped,
    /// plus the modifier's own key if one is chorded. An ordered sequence of
    /// at most two keys, there is nothing to recurse into.
    #[inline]
    #[must_use]
    pub const fn expand(self) -> (MatrixKey, Option<(Modifier, MatrixKey)>) {
        let primary = MatrixKey::bare(self.col(), self.row());
        match self.modifier() {
            Some(modifier) => (primary, Some((modifier, modifier.key()))),
            None => (primary, None),
        }
    }

    #[inline]
    #[must_use]
    pub const fn byte(self) -> u8 {
        self.0
    }
}

const fn bare(col: ColIndex, row: RowIndex) -> Option<MatrixKey> {
    Some(MatrixKey::bare(col, row))
}

const fn shift(col: ColIndex, row: RowIndex) -> Option<MatrixKey> {
    Some(MatrixKey::chorded(Modifier::Shift, col, row))
}

const fn fctn(col: ColIndex, row: RowIndex) -> Option<MatrixKey> {
    Some(MatrixKey::chorded(Modifier::Fctn, col, row))
}

const NA: Option<MatrixKey> = None;

/// Every supported HID keycode's matrix reproduction. Part of the program
/// image, the layout has to match what the console's scanning ROM expects.
const KEY_MAP: [Option<MatrixKey>; 0x53] = [
    NA,                    // 0x00
    NA,                    // 0x01
    NA,                    // 0x02
    NA,                    // 0x03
    bare(COL_7, ROW_12),   // 0x04 A
    bare(COL_6, ROW_4),    // 0x05 B
    bare(COL_1, ROW_4),    // 0x06 C
    bare(COL_1, ROW_12),   // 0x07 D
    bare(COL_1, ROW_5),    // 0x08 E
    bare(COL_0, ROW_12),   // 0x09 F
    bare(COL_6, ROW_12),   // 0x0A G
    bare(COL_6, ROW_11),   // 0x0B H
    bare(COL_1, ROW_14),   // 0x0C I
    bare(COL_0, ROW_11),   // 0x0D J
    bare(COL_1, ROW_11),   // 0x0E K
    bare(COL_2, ROW_11),   // 0x0F L
    bare(COL_0, ROW_10),   // 0x10 M
    bare(COL_6, ROW_10),   // 0x11 N
    bare(COL_2, ROW_14),   // 0x12 O
    bare(COL_7, ROW_14),   // 0x13 P
    bare(COL_7, ROW_5),    // 0x14 Q
    bare(COL_0, ROW_5),    // 0x15 R
    bare(COL_2, ROW_12),   // 0x16 S
    bare(COL_6, ROW_5),    // 0x17 T
    bare(COL_0, ROW_14),   // 0x18 U
    bare(COL_0, ROW_4),    // 0x19 V
    bare(COL_2, ROW_5),    // 0x1A W
    bare(COL_2, ROW_4),    // 0x1B X
    bare(COL_6, ROW_14),   // 0x1C Y
    bare(COL_7, ROW_4),    // 0x1D Z
    bare(COL_7, ROW_8),    // 0x1E 1
    bare(COL_2, ROW_8),    // 0x1F 2
    bare(COL_1, ROW_8),    // 0x20 3
    bare(COL_0, ROW_8),    // 0x21 4
    bare(COL_6, ROW_8),    // 0x22 5
    bare(COL_6, ROW_13),   // 0x23 6
    bare(COL_0, ROW_13),   // 0x24 7
    bare(COL_1, ROW_13),   // 0x25 8
    bare(COL_2, ROW_13),   // 0x26 9
    bare(COL_7, ROW_13),   // 0x27 0
    bare(COL_3, ROW_14),   // 0x28 Enter
    NA,                    // 0x29 Escape
    NA,                    // 0x2A Backspace
    NA,                    // 0x2B Tab
    bare(COL_3, ROW_11),   // 0x2C Space
    shift(COL_7, ROW_10),  // 0x2D Minus
    bare(COL_3, ROW_10),   // 0x2E Equal
    fctn(COL_0, ROW_5),    // 0x2F Left Bracket
    fctn(COL_6, ROW_5),    // 0x30 Right Bracket
    fctn(COL_7, ROW_4),    // 0x31 Backslash
    NA,                    // 0x32 "EUROPE 1"
    bare(COL_7, ROW_13),   // 0x33 Semi-colon
    fctn(COL_2, ROW_14),   // 0x34 Apostrophe
    fctn(COL_1, ROW_4),    // 0x35 Back tick
    bare(COL_1, ROW_10),   // 0x36 Comma
    bare(COL_2, ROW_10),   // 0x37 Period
    bare(COL_7, ROW_10),   // 0x38 Slash
    bare(COL_9, ROW_8),    // 0x39 Caps lock
    NA,                    // 0x3A F1
    NA,                    // 0x3B F2
    NA,                    // 0x3C F3
    NA,                    // 0x3D F4
    NA,                    // 0x3E F5
    NA,                    // 0x3F F6
    NA,                    // 0x40 F7
    NA,                    // 0x41 F8
    NA,                    // 0x42 F9
    NA,                    // 0x43 F10
    NA,                    // 0x44 F11
    NA,                    // 0x45 F12
    NA,                    // 0x46 Print screen
    NA,                    // 0x47 Scroll lock
    NA,                    // 0x48 Pause
    NA,                    // 0x49 Insert
    NA,                    // 0x4A Home
    NA,                    // 0x4B Page up
    NA,                    // 0x4C Delete
    NA,                    // 0x4D End
    NA,                    // 0x4E Page down
    fctn(COL_1, ROW_12),   // 0x4F Right arrow
    fctn(COL_2, ROW_12),   // 0x50 Left arrow
    fctn(COL_2, ROW_4),    // 0x51 Down arrow
    fctn(COL_1, ROW_5),    // 0x52 Up arrow
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_unpacks_fields() {
        let key = MatrixKey::chorded(Modifier::Shift, COL_7, ROW_10);
        assert_eq!(COL_7, key.col());
        assert_eq!(ROW_10, key.row());
        assert_eq!(Some(Modifier::Shift), key.modifier());
        assert_eq!(0b11_101_011, key.byte());

        let key = MatrixKey::bare(COL_7, ROW_12);
        assert_eq!(COL_7, key.col());
        assert_eq!(ROW_12, key.row());
        assert_eq!(None, key.modifier());
    }

    #[test]
    fn maps_known_keys() {
        // 0x04 'A'
        assert_eq!(Some(MatrixKey::bare(COL_7, ROW_12)), MatrixKey::from_hid(0x04));
        // 0x28 Enter
        assert_eq!(Some(MatrixKey::bare(COL_3, ROW_14)), MatrixKey::from_hid(0x28));
        // 0x2C Space
        assert_eq!(Some(MatrixKey::bare(COL_3, ROW_11)), MatrixKey::from_hid(0x2C));
        // 0x2D Minus carries shift
        assert_eq!(
            Some(MatrixKey::chorded(Modifier::Shift, COL_7, ROW_10)),
            MatrixKey::from_hid(0x2D)
        );
        // 0x52 Up arrow is fctn-E
        assert_eq!(
            Some(MatrixKey::chorded(Modifier::Fctn, COL_1, ROW_5)),
            MatrixKey::from_hid(0x52)
        );
    }

    #[test]
    fn unsupported_keys_are_unmapped() {
        // Escape, Backspace, Tab, the function key block and everything past
        // the table
        assert_eq!(None, MatrixKey::from_hid(0x29));
        assert_eq!(None, MatrixKey::from_hid(0x2A));
        assert_eq!(None, MatrixKey::from_hid(0x2B));
        for code in 0x3A..=0x4E {
            assert_eq!(None, MatrixKey::from_hid(code));
        }
        for code in 0x53..=u8::MAX {
            assert_eq!(None, MatrixKey::from_hid(code));
        }
    }

    #[test]
    fn expansion_is_one_level() {
        let (primary, modifier) = MatrixKey::from_hid(0x2D).unwrap().expand();
        assert_eq!(MatrixKey::bare(COL_7, ROW_10), primary);
        let (modifier, key) = modifier.unwrap();
        assert_eq!(Modifier::Shift, modifier);
        assert_eq!(MatrixKey::bare(COL_3, ROW_12), key);
        // A modifier's own key expands to itself
        assert_eq!((key, None), key.expand());
    }

    #[test]
    fn modifier_keys_share_their_column() {
        assert_eq!(COL_3, Modifier::Ctrl.key().col());
        assert_eq!(COL_3, Modifier::Fctn.key().col());
        assert_eq!(COL_3, Modifier::Shift.key().col());
        assert_eq!(ROW_5, Modifier::Ctrl.key().row());
        assert_eq!(ROW_8, Modifier::Fctn.key().row());
        assert_eq!(ROW_12, Modifier::Shift.key().row());
    }
}
