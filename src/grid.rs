//! A concurrently shared two-dimensional grid of strings.
//!
//! Use [`GridBuilder`] to configure a new grid, or [`Grid::new`] for one with default settings.
//! The documentation for [`Grid`] details the locking granularity of each operation.

mod builder;
mod errors;
mod limiter;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use derive_more::{Display, From};
use itertools::Itertools;
use parking_lot::{Mutex, RwLock};

use crate::sync::AdmissionGate;

use self::limiter::SearchLimiter;
pub use self::{
    builder::GridBuilder,
    errors::{GridCreateError, GridError},
};

/// The dimensions of a [`Grid`].
#[derive(Copy, Clone, Debug, Display, Eq, From, PartialEq)]
#[display("{rows} x {columns}")]
pub struct GridSize {
    /// The number of rows.
    pub rows: usize,
    /// The number of columns.
    pub columns: usize,
}

/// The lockable structure of a grid.
///
/// Each row gate owns the cells of its row, so inserting a gate inserts a row.
/// Column gates guard no data of their own; they exist to give column operations a unit of
/// exclusion that is orthogonal to the rows.
#[derive(Debug)]
struct GridInner {
    rows: Vec<AdmissionGate<Vec<String>>>,
    cols: Vec<AdmissionGate<()>>,
}

impl GridInner {
    fn validate_row(&self, row: usize) -> Result<(), GridError> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(GridError::RowOutOfBounds(row, self.rows.len()))
        }
    }

    fn validate_column(&self, column: usize) -> Result<(), GridError> {
        if column < self.cols.len() {
            Ok(())
        } else {
            Err(GridError::ColumnOutOfBounds(column, self.cols.len()))
        }
    }
}

/// A shared `rows` x `columns` grid of strings supporting concurrent access at row and column
/// granularity.
///
/// ### Locking granularity
///
/// Every row is guarded by an [`AdmissionGate`] owning that row's cells, and every column by a
/// data-less gate.
/// Cell operations take admission only on the gates they touch, so operations on different rows
/// proceed concurrently, readers of one row run alongside each other, and a writer excludes
/// only its own row.
/// Searches spanning several rows admit one row at a time and hold no two row gates at once.
///
/// ### Structural growth
///
/// All of these operations hold an outer structural lock in shared mode for their whole
/// duration.
/// [`add_row`](Grid::add_row) and [`add_column`](Grid::add_column) take it exclusively instead:
/// growth waits for every in-flight operation to drain and blocks new ones until the insertion
/// is complete, so no gate is ever held across a change of structure.
/// [`size`](Grid::size) and [`is_resizing`](Grid::is_resizing) are lock-free snapshots.
///
/// ### Bounded searches
///
/// The searches ([`search_string`](Grid::search_string), [`search_in_row`](Grid::search_in_row),
/// [`search_in_column`](Grid::search_in_column), [`search_in_range`](Grid::search_in_range)) can
/// be limited to a maximum number of concurrently admitted callers with
/// [`set_concurrent_search_limit`](Grid::set_concurrent_search_limit).
/// [`find_all`](Grid::find_all) and [`set_all`](Grid::set_all) are not limited.
///
/// ### Deadlock freedom
///
/// Locks are only ever acquired in the order: limiter slot, structural lock, pair arbiter,
/// column gates, row gate, and a pair of same-axis gates is only acquired while holding the
/// arbiter.
/// There is no fairness: a continuous stream of readers of a row can starve a writer of that
/// row indefinitely.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use gridlock::grid::Grid;
///
/// let grid = Grid::new(2, 2)?;
/// grid.set_cell(0, 0, "alpha")?;
/// std::thread::scope(|scope| {
///     scope.spawn(|| grid.set_cell(1, 1, "beta"));
///     scope.spawn(|| grid.get_cell(0, 0));
/// });
/// assert_eq!(grid.get_cell(1, 1)?, "beta");
/// assert_eq!(grid.find_all("alpha", true), vec![(0, 0)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Grid {
    /// Structural lock, shared by cell operations and exclusive for growth.
    inner: RwLock<GridInner>,
    /// Bound on concurrently admitted searches.
    limiter: SearchLimiter,
    /// Serialises acquisition of same-axis gate pairs by the exchange operations.
    pair_arbiter: Mutex<()>,
    /// Set while growth holds the structural lock.
    resizing: AtomicBool,
    /// Dimension snapshots, updated under the structural write lock.
    row_count: AtomicUsize,
    column_count: AtomicUsize,
}

impl Grid {
    /// Create a new grid with `rows` x `columns` empty cells and no search limit.
    ///
    /// # Errors
    ///
    /// Returns [`GridCreateError::InvalidDimensions`] if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> Result<Self, GridCreateError> {
        GridBuilder::new(rows, columns).build()
    }

    fn from_builder(builder: &GridBuilder) -> Self {
        let rows = (0..builder.rows)
            .map(|_| AdmissionGate::new(vec![builder.fill_value.clone(); builder.columns]))
            .collect();
        let cols = (0..builder.columns).map(|_| AdmissionGate::new(())).collect();
        Self {
            inner: RwLock::new(GridInner { rows, cols }),
            limiter: SearchLimiter::new(builder.concurrent_search_limit),
            pair_arbiter: Mutex::new(()),
            resizing: AtomicBool::new(false),
            row_count: AtomicUsize::new(builder.rows),
            column_count: AtomicUsize::new(builder.columns),
        }
    }

    /// Return a copy of the cell at `row`, `column`.
    ///
    /// Takes read admission on the row, so it runs concurrently with other readers of the row
    /// but never with a writer of it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if `row` or `column` is out of bounds.
    pub fn get_cell(&self, row: usize, column: usize) -> Result<String, GridError> {
        let inner = self.inner.read();
        inner.validate_row(row)?;
        inner.validate_column(column)?;
        let cells = inner.rows[row].read();
        Ok(cells[column].clone())
    }

    /// Overwrite the cell at `row`, `column` with `value`.
    ///
    /// Takes write admission on the row: concurrent writers of the same row serialise, and only
    /// that row is excluded.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if `row` or `column` is out of bounds.
    pub fn set_cell(
        &self,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> Result<(), GridError> {
        let value = value.into();
        let inner = self.inner.read();
        inner.validate_row(row)?;
        inner.validate_column(column)?;
        let mut cells = inner.rows[row].write();
        cells[column] = value;
        Ok(())
    }

    /// Find the first cell equal to `value` in row-major order.
    ///
    /// Rows are scanned top to bottom under read admission, one row at a time.
    /// Counts against the concurrent search limit, if one is set.
    #[must_use]
    pub fn search_string(&self, value: &str) -> Option<(usize, usize)> {
        let _slot = self.limiter.admit();
        let inner = self.inner.read();
        for (row, row_gate) in inner.rows.iter().enumerate() {
            let cells = row_gate.read();
            if let Some(column) = cells.iter().position(|cell| cell == value) {
                return Some((row, column));
            }
        }
        None
    }

    /// Find the column of the first cell equal to `value` in row `row`.
    ///
    /// Counts against the concurrent search limit, if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RowOutOfBounds`] if `row` is out of bounds, without consuming a
    /// search slot.
    pub fn search_in_row(&self, row: usize, value: &str) -> Result<Option<usize>, GridError> {
        self.inner.read().validate_row(row)?;
        let _slot = self.limiter.admit();
        // Dimensions never shrink, so the validated index stays valid after reacquisition.
        let inner = self.inner.read();
        let cells = inner.rows[row].read();
        Ok(cells.iter().position(|cell| cell == value))
    }

    /// Find the row of the first cell equal to `value` in column `column`, scanning top to
    /// bottom.
    ///
    /// Holds read admission on the column gate for the whole scan and on each visited row while
    /// its cell is inspected, honouring both granularities.
    /// Counts against the concurrent search limit, if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ColumnOutOfBounds`] if `column` is out of bounds, without consuming
    /// a search slot.
    pub fn search_in_column(&self, column: usize, value: &str) -> Result<Option<usize>, GridError> {
        self.inner.read().validate_column(column)?;
        let _slot = self.limiter.admit();
        let inner = self.inner.read();
        let _column_gate = inner.cols[column].read();
        for (row, row_gate) in inner.rows.iter().enumerate() {
            let cells = row_gate.read();
            if cells[column] == value {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Find the first cell equal to `value` within the rectangle spanned by columns
    /// `col1..=col2` of rows `row1..=row2`, in row-major order.
    ///
    /// Counts against the concurrent search limit, if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRange`] if `row1 > row2` or `col1 > col2`, and
    /// [`GridError`] if the rectangle exceeds the grid bounds.
    /// Neither consumes a search slot.
    pub fn search_in_range(
        &self,
        col1: usize,
        col2: usize,
        row1: usize,
        row2: usize,
        value: &str,
    ) -> Result<Option<(usize, usize)>, GridError> {
        if row1 > row2 {
            return Err(GridError::InvalidRange(row1, row2));
        }
        if col1 > col2 {
            return Err(GridError::InvalidRange(col1, col2));
        }
        {
            let inner = self.inner.read();
            inner.validate_row(row2)?;
            inner.validate_column(col2)?;
        }
        let _slot = self.limiter.admit();
        let inner = self.inner.read();
        for row in row1..=row2 {
            let cells = inner.rows[row].read();
            if let Some(offset) = cells[col1..=col2].iter().position(|cell| cell == value) {
                return Ok(Some((row, col1 + offset)));
            }
        }
        Ok(None)
    }

    /// Swap the contents of rows `row1` and `row2`.
    ///
    /// Write admission on both rows is acquired while holding the pair arbiter, so two
    /// exchanges of overlapping pairs cannot wait on each other in a cycle.
    /// Exchanging a row with itself is a no-op, but its index is still validated.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RowOutOfBounds`] if either index is out of bounds.
    pub fn exchange_rows(&self, row1: usize, row2: usize) -> Result<(), GridError> {
        let inner = self.inner.read();
        inner.validate_row(row1)?;
        inner.validate_row(row2)?;
        if row1 == row2 {
            return Ok(());
        }
        let (mut first, mut second) = {
            let _pair = self.pair_arbiter.lock();
            (inner.rows[row1].write(), inner.rows[row2].write())
        };
        std::mem::swap(&mut *first, &mut *second);
        Ok(())
    }

    /// Swap the contents of columns `col1` and `col2`.
    ///
    /// Write admission on both column gates is acquired while holding the pair arbiter and held
    /// for the whole exchange; the two cells of each row are then swapped under that row's
    /// write admission, one row at a time.
    /// Exchanging a column with itself is a no-op, but its index is still validated.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ColumnOutOfBounds`] if either index is out of bounds.
    pub fn exchange_columns(&self, col1: usize, col2: usize) -> Result<(), GridError> {
        let inner = self.inner.read();
        inner.validate_column(col1)?;
        inner.validate_column(col2)?;
        if col1 == col2 {
            return Ok(());
        }
        let (_first, _second) = {
            let _pair = self.pair_arbiter.lock();
            (inner.cols[col1].write(), inner.cols[col2].write())
        };
        for row_gate in &inner.rows {
            let mut cells = row_gate.write();
            cells.swap(col1, col2);
        }
        Ok(())
    }

    /// Insert a row of empty cells at index `row + 1`.
    ///
    /// Rows at indices up to and including `row` are unchanged; rows beyond shift down by one.
    /// Takes the structural lock exclusively: the insertion waits for every in-flight operation
    /// to finish and blocks new ones until it completes.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RowOutOfBounds`] if `row` is out of bounds.
    pub fn add_row(&self, row: usize) -> Result<(), GridError> {
        let mut inner = self.inner.write();
        inner.validate_row(row)?;
        self.resizing.store(true, Ordering::Release);
        let columns = inner.cols.len();
        inner
            .rows
            .insert(row + 1, AdmissionGate::new(vec![String::new(); columns]));
        self.row_count.store(inner.rows.len(), Ordering::Relaxed);
        self.resizing.store(false, Ordering::Release);
        Ok(())
    }

    /// Insert a column of empty cells at index `column + 1`.
    ///
    /// Columns at indices up to and including `column` are unchanged; columns beyond shift
    /// right by one.
    /// Takes the structural lock exclusively, like [`add_row`](Grid::add_row).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ColumnOutOfBounds`] if `column` is out of bounds.
    pub fn add_column(&self, column: usize) -> Result<(), GridError> {
        let mut inner = self.inner.write();
        inner.validate_column(column)?;
        self.resizing.store(true, Ordering::Release);
        inner.cols.insert(column + 1, AdmissionGate::new(()));
        for row_gate in &mut inner.rows {
            row_gate.get_mut().insert(column + 1, String::new());
        }
        self.column_count.store(inner.cols.len(), Ordering::Relaxed);
        self.resizing.store(false, Ordering::Release);
        Ok(())
    }

    /// All cells equal to `value`, in row-major order.
    ///
    /// With `case_sensitive` false, cells match when equal after folding every character to
    /// lowercase, so accented letters match across case.
    /// Rows are scanned under read admission one at a time, so the result is consistent per row
    /// but rows can change between visits.
    /// Not counted against the concurrent search limit.
    #[must_use]
    pub fn find_all(&self, value: &str, case_sensitive: bool) -> Vec<(usize, usize)> {
        let inner = self.inner.read();
        let mut matches = Vec::new();
        for (row, row_gate) in inner.rows.iter().enumerate() {
            let cells = row_gate.read();
            matches.extend(
                cells
                    .iter()
                    .positions(|cell| cell_matches(cell, value, case_sensitive))
                    .map(|column| (row, column)),
            );
        }
        matches
    }

    /// Replace every cell equal to `old` with `new`.
    ///
    /// With `case_sensitive` false, cells match when equal after folding every character to
    /// lowercase, like [`find_all`](Grid::find_all).
    /// Rows are rewritten under write admission one at a time.
    /// Not counted against the concurrent search limit.
    pub fn set_all(&self, old: &str, new: &str, case_sensitive: bool) {
        let inner = self.inner.read();
        for row_gate in &inner.rows {
            let mut cells = row_gate.write();
            for cell in cells.iter_mut() {
                if cell_matches(cell, old, case_sensitive) {
                    *cell = new.to_string();
                }
            }
        }
    }

    /// The current dimensions.
    ///
    /// Lock-free: the snapshot can lag a concurrent [`add_row`](Grid::add_row) or
    /// [`add_column`](Grid::add_column), but dimensions only ever grow.
    #[must_use]
    pub fn size(&self) -> GridSize {
        GridSize {
            rows: self.row_count.load(Ordering::Relaxed),
            columns: self.column_count.load(Ordering::Relaxed),
        }
    }

    /// Whether a growth operation currently holds the structural lock.
    ///
    /// Informational: the structural lock itself is what excludes growth from other operations.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.resizing.load(Ordering::Acquire)
    }

    /// Bound the number of concurrently admitted searches, or remove the bound with [`None`].
    ///
    /// The new bound starts with all slots free; searches admitted against a previous bound
    /// drain without affecting it, and searches still waiting re-evaluate against the new bound.
    /// A bound of zero blocks every subsequent search until the bound is raised or removed.
    pub fn set_concurrent_search_limit(&self, limit: Option<usize>) {
        self.limiter.set_limit(limit);
    }
}

fn cell_matches(cell: &str, value: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        cell == value
    } else {
        cell.chars()
            .flat_map(char::to_lowercase)
            .eq(value.chars().flat_map(char::to_lowercase))
    }
}

impl std::fmt::Display for Grid {
    /// Format the grid as one line per row with columns padded to equal width.
    ///
    /// Each row is copied out under read admission, one row at a time.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        let snapshot: Vec<Vec<String>> = inner
            .rows
            .iter()
            .map(|row_gate| row_gate.read().clone())
            .collect();
        drop(inner);

        let columns = snapshot.first().map_or(0, Vec::len);
        let mut widths = vec![0; columns];
        for row in &snapshot {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        for row in &snapshot {
            for (column, (&width, cell)) in widths.iter().zip(row).enumerate() {
                if column > 0 {
                    f.write_str(" ")?;
                }
                if column + 1 == columns {
                    write!(f, "{cell}")?;
                } else {
                    write!(f, "{cell:<width$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
