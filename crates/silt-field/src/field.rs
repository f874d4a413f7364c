//! The double-buffered concentration grid.
//!
//! [`Field`] keeps two equally sized buffers. The published buffer is the
//! one readers see; the staging buffer is scratch space for the next tick.
//! [`Field::advance`] hands the stepper both, then swaps them only if the
//! stepper succeeds, so a failed tick leaves the published state untouched
//! and a successful one becomes visible all at once.

use silt_core::{FieldError, TickId};

use crate::initial::InitialCondition;
use crate::read::{FieldRead, FieldSnapshot, FieldView};
use crate::shape::GridShape;

/// A fixed-shape 2-D concentration grid with ping-pong buffers.
///
/// Owned exclusively by the simulation. Readers borrow a [`FieldView`] or
/// take an owned [`FieldSnapshot`]; writers go through the bounded
/// accessors here or through [`SourceInjector`](crate::SourceInjector).
#[derive(Clone, Debug)]
pub struct Field {
    shape: GridShape,
    published: Vec<f64>,
    staging: Vec<f64>,
    tick: TickId,
}

impl Field {
    /// Create a zero-filled field.
    pub fn new(shape: GridShape) -> Self {
        let n = shape.cell_count();
        Self {
            shape,
            published: vec![0.0; n],
            staging: vec![0.0; n],
            tick: TickId(0),
        }
    }

    /// Create a field seeded with `initial`.
    pub fn with_initial(shape: GridShape, initial: &InitialCondition) -> Self {
        let mut field = Self::new(shape);
        initial.fill(shape, &mut field.published);
        field
    }

    /// Shape of the grid.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Tick of the published buffer.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Borrow the published buffer.
    pub fn view(&self) -> FieldView<'_> {
        FieldView::new(self.shape, self.tick, &self.published)
    }

    /// Copy the published buffer into an owned snapshot.
    pub fn snapshot(&self) -> FieldSnapshot {
        self.view().to_snapshot()
    }

    /// Concentration at `(row, col)`.
    pub fn value_at(&self, row: usize, col: usize) -> Result<f64, FieldError> {
        self.view().value_at(row, col)
    }

    /// Overwrite the concentration at `(row, col)`.
    pub fn set_value(&mut self, row: usize, col: usize, value: f64) -> Result<(), FieldError> {
        let i = self.checked_index(row, col)?;
        self.published[i] = value;
        Ok(())
    }

    /// Add `delta` to the concentration at `(row, col)`.
    pub fn add_value(&mut self, row: usize, col: usize, delta: f64) -> Result<(), FieldError> {
        let i = self.checked_index(row, col)?;
        self.published[i] += delta;
        Ok(())
    }

    /// Set every cell to zero. The tick counter is left alone.
    pub fn clear(&mut self) {
        self.published.fill(0.0);
    }

    /// Replace the published buffer with `values`.
    pub fn load(&mut self, values: &[f64]) -> Result<(), FieldError> {
        if values.len() != self.published.len() {
            return Err(FieldError::ShapeMismatch {
                expected: self.published.len(),
                got: values.len(),
            });
        }
        self.published.copy_from_slice(values);
        Ok(())
    }

    /// Run one tick.
    ///
    /// `step` receives the published buffer (read-only) and the staging
    /// buffer, and must write every staging cell. On `Ok` the buffers swap
    /// and the tick counter advances; on `Err` nothing is published.
    pub fn advance<E>(
        &mut self,
        step: impl FnOnce(&[f64], &mut [f64]) -> Result<(), E>,
    ) -> Result<TickId, E> {
        step(&self.published, &mut self.staging)?;
        std::mem::swap(&mut self.published, &mut self.staging);
        self.tick = self.tick.next();
        Ok(self.tick)
    }

    /// Reset the tick counter to zero.
    pub fn rewind(&mut self) {
        self.tick = TickId(0);
    }

    /// Mutable access to the published buffer for in-crate writers.
    pub(crate) fn cells_mut(&mut self) -> &mut [f64] {
        &mut self.published
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize, FieldError> {
        self.shape.index(row, col).ok_or(FieldError::OutOfRange {
            row,
            col,
            rows: self.shape.rows(),
            cols: self.shape.cols(),
        })
    }
}
