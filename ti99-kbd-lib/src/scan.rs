//! Column-scan response planning.
//!
//! The console asserts a column line low and latches the row lines back. A
//! recorded key answers by holding its row line low for the duration of that
//! column's scan, every other row line rests high.
//!
//! Both firmware responders feed off the same [`KeyState`] through one of
//! two entry points: the poll variant re-derives the whole row picture from
//! the column levels every iteration, the interrupt variant answers a single
//! falling edge. For any single asserted column the two pick the same row.

use crate::matrix::{column_for_line, ColIndex, RowIndex, NUM_COLS, NUM_ROWS};
use crate::state::KeyState;

/// Rows to hold at the closed (low) level, given which columns the console
/// is currently asserting. Level-driven, no memory between iterations.
#[must_use]
pub fn closed_rows(
    state: &KeyState,
    cols_asserted: &[bool; NUM_COLS as usize],
) -> [bool; NUM_ROWS as usize] {
    let mut closed = [false; NUM_ROWS as usize];
    for ind in 0..NUM_COLS {
        let col = ColIndex::from_value(ind);
        if !cols_asserted[col.index()] {
            continue;
        }
        if let Some(row) = state.pressed_row(col) {
            closed[row.index()] = true;
        }
    }
    closed
}

/// Row to close on a falling edge of `line`, `None` on a line that isn't a
/// column or a column with nothing recorded. Either miss is a no-op for the
/// responder, not an error.
#[must_use]
pub fn closed_row_for_line(state: &KeyState, line: u8) -> Option<RowIndex> {
    let col = column_for_line(line)?;
    state.pressed_row(col)
}
