//! Forward-Euler flux stepper with no-flux edges.
//!
//! Two phases per tick. First, on a periodically wrapped grid:
//! ```text
//! flux_x[i,j] = D * (u[i+1,j] - u[i-1,j]) / (2 dx)
//! flux_y[i,j] = D * (u[i,j+1] - u[i,j-1]) / (2 dy)
//! u'[i,j]     = u[i,j] + dt * (flux_x[i,j] - flux_x[i-1,j] + flux_y[i,j] - flux_y[i,j-1])
//! ```
//! Second, the edge rows and then the edge columns are overwritten with
//! their interior neighbour, which is what enforces zero gradient at the
//! boundary. The wrap only leaks into the edge cells transiently; the
//! overwrite discards it.

use silt_core::{Scheme, StepError};
use silt_field::GridShape;

use crate::context::StepContext;
use crate::grid_helpers::{check_len, wrap_next, wrap_prev};
use crate::stepper::{Stability, Stepper};

/// Forward-Euler flux-divergence diffusion with a no-flux boundary.
#[derive(Clone, Debug)]
pub struct FluxEuler {
    diffusion: f64,
    flux_x: Vec<f64>,
    flux_y: Vec<f64>,
}

impl FluxEuler {
    /// Stable while `D*dt*(1/dx + 1/dy)` stays at or below this.
    ///
    /// The flux divergence is not rescaled by the spacing, so the von
    /// Neumann amplification factor of this stencil scales with `dt/dx`
    /// rather than `dt/dx^2`; `|g| <= 1` holds for every mode under this
    /// bound.
    pub const STABILITY_LIMIT: f64 = 0.5;

    /// Create a stepper with diffusion coefficient `diffusion`.
    pub fn new(diffusion: f64) -> Self {
        Self {
            diffusion,
            flux_x: Vec::new(),
            flux_y: Vec::new(),
        }
    }

    /// The diffusion coefficient.
    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }

    /// Overwrite edge rows, then edge columns, with their interior neighbour.
    fn apply_no_flux(out: &mut [f64], rows: usize, cols: usize) {
        if rows >= 2 {
            out.copy_within(cols..2 * cols, 0);
            out.copy_within((rows - 2) * cols..(rows - 1) * cols, (rows - 1) * cols);
        }
        if cols >= 2 {
            for r in 0..rows {
                let row = &mut out[r * cols..(r + 1) * cols];
                row[0] = row[1];
                row[cols - 1] = row[cols - 2];
            }
        }
    }
}

impl Stepper for FluxEuler {
    fn name(&self) -> &str {
        "flux-euler"
    }

    fn scheme(&self) -> Scheme {
        Scheme::FluxEuler
    }

    fn stability(&self, shape: GridShape, dt: f64) -> Option<Stability> {
        Some(Stability {
            number: self.diffusion * dt * (1.0 / shape.dx() + 1.0 / shape.dy()),
            limit: Self::STABILITY_LIMIT,
        })
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        let shape = ctx.shape();
        let (rows, cols) = (shape.rows(), shape.cols());
        let n = shape.cell_count();
        let dt = ctx.dt();
        let cx = self.diffusion / (2.0 * shape.dx());
        let cy = self.diffusion / (2.0 * shape.dy());

        let (prev, next) = ctx.split();
        check_len("flux-euler", n, prev, next)?;

        self.flux_x.resize(n, 0.0);
        self.flux_y.resize(n, 0.0);

        for i in 0..rows {
            let (up, down) = (wrap_prev(i, rows), wrap_next(i, rows));
            for j in 0..cols {
                let (left, right) = (wrap_prev(j, cols), wrap_next(j, cols));
                let k = i * cols + j;
                self.flux_x[k] = cx * (prev[down * cols + j] - prev[up * cols + j]);
                self.flux_y[k] = cy * (prev[i * cols + right] - prev[i * cols + left]);
            }
        }

        for i in 0..rows {
            let up = wrap_prev(i, rows);
            for j in 0..cols {
                let left = wrap_prev(j, cols);
                let k = i * cols + j;
                let div = self.flux_x[k] - self.flux_x[up * cols + j] + self.flux_y[k]
                    - self.flux_y[i * cols + left];
                next[k] = prev[k] + dt * div;
            }
        }

        Self::apply_no_flux(next, rows, cols);
        Ok(())
    }
}
