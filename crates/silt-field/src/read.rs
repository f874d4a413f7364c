//! Read-only access to published field state.
//!
//! [`FieldView`] borrows the published buffer of a [`Field`](crate::Field)
//! and cannot outlive the next tick. [`FieldSnapshot`] owns an immutable
//! copy behind an `Arc`, suitable for handing to a renderer that lives on
//! its own schedule.

use std::sync::Arc;

use silt_core::{FieldError, TickId};

use crate::shape::GridShape;

/// Read access to a published grid.
///
/// Implementors supply the shape, tick and backing slice; the statistics
/// are provided.
pub trait FieldRead {
    /// Shape of the grid.
    fn shape(&self) -> GridShape;

    /// Tick at which this state was published.
    fn tick(&self) -> TickId;

    /// Row-major cell values.
    fn as_slice(&self) -> &[f64];

    /// Concentration at `(row, col)`.
    ///
    /// Returns `Err(FieldError::OutOfRange)` rather than wrapping or
    /// clamping the coordinate.
    fn value_at(&self, row: usize, col: usize) -> Result<f64, FieldError> {
        let shape = self.shape();
        shape
            .index(row, col)
            .map(|i| self.as_slice()[i])
            .ok_or(FieldError::OutOfRange {
                row,
                col,
                rows: shape.rows(),
                cols: shape.cols(),
            })
    }

    /// One row of the grid, or `None` if `row` is out of range.
    fn row(&self, row: usize) -> Option<&[f64]> {
        let cols = self.shape().cols();
        (row < self.shape().rows()).then(|| &self.as_slice()[row * cols..(row + 1) * cols])
    }

    /// Largest cell value. NaN cells are ignored.
    fn peak(&self) -> f64 {
        self.as_slice()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Sum over every cell.
    fn total(&self) -> f64 {
        self.as_slice().iter().sum()
    }

    /// Sum over every cell not on the outermost ring.
    fn interior_total(&self) -> f64 {
        let shape = self.shape();
        let (rows, cols) = (shape.rows(), shape.cols());
        if rows < 3 || cols < 3 {
            return 0.0;
        }
        let data = self.as_slice();
        (1..rows - 1)
            .map(|r| data[r * cols + 1..r * cols + cols - 1].iter().sum::<f64>())
            .sum()
    }

    /// Number of NaN or infinite cells.
    fn non_finite_count(&self) -> usize {
        self.as_slice().iter().filter(|v| !v.is_finite()).count()
    }
}

/// Borrowed view of the published buffer.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    shape: GridShape,
    tick: TickId,
    data: &'a [f64],
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(shape: GridShape, tick: TickId, data: &'a [f64]) -> Self {
        Self { shape, tick, data }
    }

    /// Copy this view into an owned snapshot.
    pub fn to_snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            shape: self.shape,
            tick: self.tick,
            data: Arc::from(self.data),
        }
    }
}

impl FieldRead for FieldView<'_> {
    fn shape(&self) -> GridShape {
        self.shape
    }

    fn tick(&self) -> TickId {
        self.tick
    }

    fn as_slice(&self) -> &[f64] {
        self.data
    }
}

/// Owned, immutable copy of the field at one tick.
///
/// Cloning shares the underlying buffer.
#[derive(Clone, Debug)]
pub struct FieldSnapshot {
    shape: GridShape,
    tick: TickId,
    data: Arc<[f64]>,
}

impl FieldRead for FieldSnapshot {
    fn shape(&self) -> GridShape {
        self.shape
    }

    fn tick(&self) -> TickId {
        self.tick
    }

    fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
