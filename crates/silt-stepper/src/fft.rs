//! Two-dimensional complex FFT over a row-major grid.
//!
//! Built from 1-D `rustfft` plans: transform every row, transpose,
//! transform every (former) column, transpose back. The inverse is
//! normalized by `1 / (rows * cols)` so that `inverse(forward(x)) == x`
//! up to rounding.

use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use silt_core::StepError;

/// Planned forward and inverse 2-D transforms for one grid shape.
pub struct Fft2 {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
    transposed: Vec<Complex64>,
    work: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl Fft2 {
    /// Plan transforms for a `rows x cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let row_forward = planner.plan_fft_forward(cols);
        let row_inverse = planner.plan_fft_inverse(cols);
        let col_forward = planner.plan_fft_forward(rows);
        let col_inverse = planner.plan_fft_inverse(rows);
        let scratch_len = [&row_forward, &row_inverse, &col_forward, &col_inverse]
            .iter()
            .map(|p| p.get_inplace_scratch_len())
            .max()
            .unwrap_or(0);
        let zero = Complex64::new(0.0, 0.0);
        Self {
            rows,
            cols,
            row_forward,
            row_inverse,
            col_forward,
            col_inverse,
            transposed: vec![zero; rows * cols],
            work: vec![zero; rows * cols],
            scratch: vec![zero; scratch_len],
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

    /// In-place forward transform (unnormalized).
    pub fn forward(&mut self, data: &mut [Complex64]) -> Result<(), StepError> {
        self.check(data.len())?;
        let (along_rows, along_cols) =
            (Arc::clone(&self.row_forward), Arc::clone(&self.col_forward));
        self.apply(data, along_rows.as_ref(), along_cols.as_ref());
        Ok(())
    }

    /// In-place inverse transform, normalized by the cell count.
    pub fn inverse(&mut self, data: &mut [Complex64]) -> Result<(), StepError> {
        self.check(data.len())?;
        let (along_rows, along_cols) =
            (Arc::clone(&self.row_inverse), Arc::clone(&self.col_inverse));
        self.apply(data, along_rows.as_ref(), along_cols.as_ref());
        let scale = 1.0 / (self.rows * self.cols) as f64;
        for z in data.iter_mut() {
            *z *= scale;
        }
        Ok(())
    }

    /// Forward transform of a real grid into `spectrum`.
    pub fn forward_real(
        &mut self,
        grid: &[f64],
        spectrum: &mut [Complex64],
    ) -> Result<(), StepError> {
        self.check(grid.len())?;
        self.check(spectrum.len())?;
        for (z, &v) in spectrum.iter_mut().zip(grid) {
            *z = Complex64::new(v, 0.0);
        }
        self.forward(spectrum)
    }

    /// Inverse transform of `spectrum` into the real grid `out`.
    ///
    /// Imaginary parts are discarded; the largest discarded magnitude is
    /// returned so callers can verify it stays at rounding level.
    pub fn inverse_real(
        &mut self,
        spectrum: &[Complex64],
        out: &mut [f64],
    ) -> Result<f64, StepError> {
        self.check(spectrum.len())?;
        self.check(out.len())?;
        let mut work = std::mem::take(&mut self.work);
        work.copy_from_slice(spectrum);
        let result = self.inverse(&mut work);
        let mut residue = 0.0f64;
        for (o, z) in out.iter_mut().zip(&work) {
            *o = z.re;
            residue = residue.max(z.im.abs());
        }
        self.work = work;
        result.map(|()| residue)
    }

    fn check(&self, len: usize) -> Result<(), StepError> {
        if len == self.rows * self.cols {
            Ok(())
        } else {
            Err(StepError::Transform {
                reason: format!(
                    "buffer of {len} values for a {}x{} transform",
                    self.rows, self.cols
                ),
            })
        }
    }

    fn apply(
        &mut self,
        data: &mut [Complex64],
        along_rows: &dyn Fft<f64>,
        along_cols: &dyn Fft<f64>,
    ) {
        along_rows.process_with_scratch(data, &mut self.scratch);
        transpose(data, &mut self.transposed, self.rows, self.cols);
        along_cols.process_with_scratch(&mut self.transposed, &mut self.scratch);
        transpose(&self.transposed, data, self.cols, self.rows);
    }
}

impl fmt::Debug for Fft2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft2")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

/// Write the transpose of the `rows x cols` matrix `src` into `dst`.
fn transpose(src: &[Complex64], dst: &mut [Complex64], rows: usize, cols: usize) {
    for r in 0..rows {
        for c in 0..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
}
