//! Explicit 5-point Laplacian stepper.
//!
//! Each tick computes, for every interior cell:
//! ```text
//! new[i,j] = old[i,j] + D*dt * ( (old[i+1,j] - 2 old[i,j] + old[i-1,j]) / dx^2
//!                              + (old[i,j+1] - 2 old[i,j] + old[i,j-1]) / dy^2 )
//! ```
//! The outermost ring is copied through unchanged (frozen border). Mass
//! that diffuses into the ring stays there and is never updated again, so
//! only the interior sum is conserved, and only while the plume is clear
//! of the ring.

use silt_core::{Scheme, StepError};
use silt_field::GridShape;

use crate::context::StepContext;
use crate::grid_helpers::check_len;
use crate::stepper::{Stability, Stepper};

/// Explicit finite-difference diffusion with a frozen border.
#[derive(Clone, Debug)]
pub struct FiniteDifference {
    diffusion: f64,
}

impl FiniteDifference {
    /// Stable while `D*dt*(1/dx^2 + 1/dy^2)` stays at or below this.
    pub const STABILITY_LIMIT: f64 = 0.5;

    /// Create a stepper with diffusion coefficient `diffusion`.
    pub fn new(diffusion: f64) -> Self {
        Self { diffusion }
    }

    /// The diffusion coefficient.
    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }
}

impl Stepper for FiniteDifference {
    fn name(&self) -> &str {
        "finite-difference"
    }

    fn scheme(&self) -> Scheme {
        Scheme::FiniteDifference
    }

    fn stability(&self, shape: GridShape, dt: f64) -> Option<Stability> {
        let number =
            self.diffusion * dt * (1.0 / (shape.dx() * shape.dx()) + 1.0 / (shape.dy() * shape.dy()));
        Some(Stability {
            number,
            limit: Self::STABILITY_LIMIT,
        })
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        let shape = ctx.shape();
        let (rows, cols) = (shape.rows(), shape.cols());
        let rx = self.diffusion * ctx.dt() / (shape.dx() * shape.dx());
        let ry = self.diffusion * ctx.dt() / (shape.dy() * shape.dy());

        let (prev, next) = ctx.split();
        check_len(self.name(), shape.cell_count(), prev, next)?;

        // Border ring carries over unchanged.
        next.copy_from_slice(prev);

        for i in 1..rows.saturating_sub(1) {
            for j in 1..cols.saturating_sub(1) {
                let k = i * cols + j;
                let u = prev[k];
                let lap_x = prev[k + cols] - 2.0 * u + prev[k - cols];
                let lap_y = prev[k + 1] - 2.0 * u + prev[k - 1];
                next[k] = u + rx * lap_x + ry * lap_y;
            }
        }
        Ok(())
    }
}
