//! TI-99/4A keyboard connector geometry.
//!
//! The connector exposes 15 lines, rows (R) and columns (C) interleaved:
//!
//! ```text
//! 14 | 13 | 12 | 11 | 10 | 09 | 08 | 07 | 06 | 05 | 04 | 03 | 02 | 01 | 00
//! ------------------------------------------------------------------------
//!  R |  R |  R |  R |  R |  C |  R |  C |  C |  R |  R |  C |  C |  C |  C
//! ```
//!
//! The console pulses one column line low at a time and reads the row lines
//! back, a closed key shorts the scanned column onto its row.

pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 7;

/// Connector line number for each logical column index.
pub const COLUMN_LINES: [u8; NUM_COLS as usize] = [0, 1, 2, 3, 6, 7, 9];

/// Connector line number for each logical row index.
pub const ROW_LINES: [u8; NUM_ROWS as usize] = [4, 5, 8, 10, 11, 12, 13, 14];

#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ColIndex(pub u8);

impl ColIndex {
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub const fn from_value(ind: u8) -> Self {
        assert!(
            ind < NUM_COLS,
            "Tried to construct col index from a bad value"
        );
        Self(ind)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Connector line this column sits on.
    #[inline]
    #[must_use]
    pub const fn line(self) -> u8 {
        COLUMN_LINES[self.0 as usize]
    }
}

#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RowIndex(pub u8);

impl RowIndex {
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub const fn from_value(ind: u8) -> Self {
        assert!(
            ind < NUM_ROWS,
            "Tried to construct row index from a bad value"
        );
        Self(ind)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn line(self) -> u8 {
        ROW_LINES[self.0 as usize]
    }
}

// Column and row indices named by their connector line, the way the key map
// reads them.
pub const COL_0: ColIndex = ColIndex::from_value(0);
pub const COL_1: ColIndex = ColIndex::from_value(1);
pub const COL_2: ColIndex = ColIndex::from_value(2);
pub const COL_3: ColIndex = ColIndex::from_value(3);
pub const COL_6: ColIndex = ColIndex::from_value(4);
pub const COL_7: ColIndex = ColIndex::from_value(5);
pub const COL_9: ColIndex = ColIndex::from_value(6);

pub const ROW_4: RowIndex = RowIndex::from_value(0);
pub const ROW_5: RowIndex = RowIndex::from_value(1);
pub const ROW_8: RowIndex = RowIndex::from_value(2);
pub const ROW_10: RowIndex = RowIndex::from_value(3);
pub const ROW_11: RowIndex = RowIndex::from_value(4);
pub const ROW_12: RowIndex = RowIndex::from_value(5);
pub const ROW_13: RowIndex = RowIndex::from_value(6);
pub const ROW_14: RowIndex = RowIndex::from_value(7);

/// Logical column for a connector line, `None` if the line isn't a column.
#[must_use]
pub fn column_for_line(line: u8) -> Option<ColIndex> {
    (0..NUM_COLS)
        .find(|ind| COLUMN_LINES[*ind as usize] == line)
        .map(ColIndex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_and_rows_are_disjoint() {
        for col in COLUMN_LINES {
            assert!(!ROW_LINES.contains(&col));
        }
    }

    #[test]
    fn finds_every_column_line() {
        for (ind, line) in COLUMN_LINES.iter().enumerate() {
            assert_eq!(Some(ColIndex(ind as u8)), column_for_line(*line));
        }
    }

    #[test]
    fn rejects_non_column_lines() {
        // Row lines and lines past the connector are both misses
        for line in ROW_LINES {
            assert_eq!(None, column_for_line(line));
        }
        assert_eq!(None, column_for_line(15));
        assert_eq!(None, column_for_line(u8::MAX));
    }
}
