use thiserror::Error;

/// A grid creation error.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum GridCreateError {
    /// The requested dimensions have a zero extent.
    #[error("a grid requires at least one row and one column, got {_0} x {_1}")]
    InvalidDimensions(usize, usize),
}

/// A grid operation error.
///
/// Every operation validates its indices against the current dimensions before taking any row
/// or column admission, so a failed operation has touched nothing.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// A row index at or beyond the number of rows.
    #[error("row index {_0} is out of bounds for a grid with {_1} rows")]
    RowOutOfBounds(usize, usize),
    /// A column index at or beyond the number of columns.
    #[error("column index {_0} is out of bounds for a grid with {_1} columns")]
    ColumnOutOfBounds(usize, usize),
    /// A range whose start index exceeds its end index.
    #[error("invalid range: start index {_0} exceeds end index {_1}")]
    InvalidRange(usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            GridCreateError::InvalidDimensions(0, 5).to_string(),
            "a grid requires at least one row and one column, got 0 x 5"
        );
        assert_eq!(
            GridError::RowOutOfBounds(4, 4).to_string(),
            "row index 4 is out of bounds for a grid with 4 rows"
        );
        assert_eq!(
            GridError::ColumnOutOfBounds(7, 3).to_string(),
            "column index 7 is out of bounds for a grid with 3 columns"
        );
        assert_eq!(
            GridError::InvalidRange(5, 2).to_string(),
            "invalid range: start index 5 exceeds end index 2"
        );
    }
}
