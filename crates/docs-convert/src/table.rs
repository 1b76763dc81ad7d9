//! Google Docs table index arithmetic.
//!
//! An empty table inserted at cursor `T` with `R` rows and `C` columns costs
//! `2 + R * (2C + 1)` index positions: two for the table's own start/end
//! boundary, plus `2C + 1` per row (one row-boundary index, two per cell
//! boundary). The first character position inside cell `(0, 0)` sits three
//! positions after the table start. Both constants are the empirically
//! verified Docs API contract for empty tables (see `docs-convert`'s crate
//! level notes); they are not derivable from the API reference alone.

/// The safety cap on table width; beyond this, a ragged table is rejected
/// rather than silently padded.
pub const MAX_COLUMNS: usize = 64;

/// Total index positions consumed by an empty `rows` x `columns` table.
pub fn empty_table_index_cost(rows: usize, columns: usize) -> usize {
    2 + rows * (2 * columns + 1)
}

/// The absolute index of the first character position inside cell `(row,
/// col)` (0-based), given the table's start index `table_start` and its
/// column count.
pub fn cell_start_index(
    table_start: usize,
    columns: usize,
    row: usize,
    col: usize,
) -> usize {
    table_start + 3 + row * (2 * columns + 1) + col * 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_by_one_table_cost_and_cell_index() {
        assert_eq!(empty_table_index_cost(1, 1), 2 + 1 * 3);
        assert_eq!(cell_start_index(1, 1, 0, 0), 4);
    }

    #[test]
    fn two_by_two_table_cell_indices() {
        let t = 1;
        assert_eq!(cell_start_index(t, 2, 0, 0), 4);
        assert_eq!(cell_start_index(t, 2, 0, 1), 6);
        assert_eq!(cell_start_index(t, 2, 1, 0), 9);
        assert_eq!(cell_start_index(t, 2, 1, 1), 11);
    }
}
