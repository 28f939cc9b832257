use nst_core::errors::{ErrorInfo, NsError};
use serde::{Deserialize, Serialize};

/// Dense row-major matrix of `f64` values.
///
/// Used both for raw sample arrays (`[params..., logl, birth_logl]` rows) and
/// for the `theta` member of a run. The storage length is validated on every
/// constructor; runs deserialized from elsewhere are re-validated by
/// [`check_members`](crate::check_members).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from row-major storage.
    pub fn from_shape_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, NsError> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            NsError::Malformed(
                ErrorInfo::new("matrix.shape-overflow", "matrix shape overflows usize")
                    .with_context("rows", rows.to_string())
                    .with_context("cols", cols.to_string()),
            )
        })?;
        if data.len() != expected {
            return Err(NsError::Malformed(
                ErrorInfo::new("matrix.storage", "storage length does not match shape")
                    .with_context("rows", rows.to_string())
                    .with_context("cols", cols.to_string())
                    .with_context("len", data.len().to_string()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a matrix from a list of rows, rejecting ragged input.
    ///
    /// The column count is taken from the first row, so an empty slice gives
    /// a `0 x 0` matrix. Use [`Matrix::empty`] for an empty sample set that
    /// still declares its columns.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, NsError> {
        let cols = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(NsError::Malformed(
                    ErrorInfo::new("matrix.ragged", "rows have differing lengths")
                        .with_context("row", idx.to_string())
                        .with_context("expected", cols.to_string())
                        .with_context("found", row.len().to_string()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Creates a matrix with no rows and the given number of columns.
    pub fn empty(cols: usize) -> Self {
        Self {
            rows: 0,
            cols,
            data: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Whether the storage length agrees with the declared shape.
    pub fn is_consistent(&self) -> bool {
        self.rows
            .checked_mul(self.cols)
            .map_or(false, |len| len == self.data.len())
    }

    /// Returns a row. Panics when `idx` is out of bounds.
    pub fn row(&self, idx: usize) -> &[f64] {
        let start = idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterates over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |idx| self.row(idx))
    }

    /// Returns a copy of the given column.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.iter_rows().map(|row| row[col]).collect()
    }

    /// Gathers the listed rows, keeping only columns in `cols`.
    pub(crate) fn gather(&self, order: &[usize], cols: std::ops::Range<usize>) -> Matrix {
        let width = cols.len();
        let mut data = Vec::with_capacity(order.len() * width);
        for &idx in order {
            data.extend_from_slice(&self.row(idx)[cols.clone()]);
        }
        Matrix {
            rows: order.len(),
            cols: width,
            data,
        }
    }
}
