use super::{Grid, GridCreateError};

/// A [`Grid`] builder.
///
/// The builder is initialised from the grid dimensions, which must both be nonzero.
///  - Every cell starts as the fill value, the empty string by default.
///  - Searches are unbounded by default.
///
/// Use the methods on the builder to change the configuration away from these defaults, then
/// build the grid with [`GridBuilder::build`].
///
/// For example:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use gridlock::grid::GridBuilder;
///
/// let grid = GridBuilder::new(3, 4)
///     .fill_value("-")
///     .concurrent_search_limit(2)
///     .build()?;
/// assert_eq!(grid.size().rows, 3);
/// assert_eq!(grid.size().columns, 4);
/// assert_eq!(grid.get_cell(2, 3)?, "-");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct GridBuilder {
    /// The number of rows.
    pub rows: usize,
    /// The number of columns.
    pub columns: usize,
    /// The initial content of every cell.
    pub fill_value: String,
    /// The initial bound on concurrently admitted searches.
    pub concurrent_search_limit: Option<usize>,
}

impl GridBuilder {
    /// Create a new grid builder for a grid with `rows` x `columns` cells.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            fill_value: String::new(),
            concurrent_search_limit: None,
        }
    }

    /// Set the initial content of every cell.
    ///
    /// If left unmodified, every cell starts empty.
    pub fn fill_value(&mut self, fill_value: impl Into<String>) -> &mut Self {
        self.fill_value = fill_value.into();
        self
    }

    /// Bound the number of concurrently admitted searches.
    ///
    /// If left unmodified, searches are unbounded.
    /// The bound can be changed after construction with
    /// [`set_concurrent_search_limit`](Grid::set_concurrent_search_limit).
    pub fn concurrent_search_limit(&mut self, limit: usize) -> &mut Self {
        self.concurrent_search_limit = Some(limit);
        self
    }

    /// Build into a [`Grid`].
    ///
    /// # Errors
    ///
    /// Returns [`GridCreateError::InvalidDimensions`] if either dimension is zero.
    pub fn build(&self) -> Result<Grid, GridCreateError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(GridCreateError::InvalidDimensions(self.rows, self.columns));
        }
        Ok(Grid::from_builder(self))
    }
}
