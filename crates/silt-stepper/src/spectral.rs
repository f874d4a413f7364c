//! Fourier-domain diffusion stepper.
//!
//! Holds the complex spectrum of the field and advances it by the exact
//! solution of the diffusion equation per mode:
//! ```text
//! field_hat <- field_hat * exp(-D * k^2 * dt)
//! grid      <- Re(ifft2(field_hat))
//! ```
//! There is no time discretization error and no stability bound. The
//! domain is periodic: a plume crossing one edge re-enters at the other,
//! unlike the no-flux edges of [`FluxEuler`](crate::FluxEuler).
//!
//! The spectrum is derived state. Whenever the grid changes outside a
//! tick, [`Stepper::resync`] must run before the next step, otherwise the
//! change is silently lost on that step.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;
use silt_core::{Scheme, StepError};
use silt_field::GridShape;
use tracing::warn;

use crate::context::StepContext;
use crate::fft::Fft2;
use crate::grid_helpers::check_len;
use crate::stepper::{Stability, Stepper};

/// Imaginary residue tolerated after an inverse transform, relative to
/// the largest real magnitude (floored at 1).
const RESIDUE_TOLERANCE: f64 = 1e-9;

/// Angular wavenumbers of the DFT bins on an axis of `n` samples spanning
/// physical length `length`, in FFT order (zero, positive, negative).
pub fn wavenumbers(n: usize, length: f64) -> Vec<f64> {
    (0..n)
        .map(|m| {
            let signed = if m < (n + 1) / 2 {
                m as f64
            } else {
                m as f64 - n as f64
            };
            2.0 * PI * signed / length
        })
        .collect()
}

/// Exact per-mode exponential decay in Fourier space.
#[derive(Debug)]
pub struct Spectral {
    shape: GridShape,
    diffusion: f64,
    k2: Vec<f64>,
    field_hat: Vec<Complex64>,
    decay: Vec<f64>,
    decay_dt: Option<f64>,
    fft: Fft2,
    residue: f64,
    residue_warned: bool,
}

impl Spectral {
    /// Plan a spectral stepper for `shape`.
    ///
    /// The spectrum starts at zero; call [`Stepper::resync`] with the
    /// initial grid before the first step.
    pub fn new(shape: GridShape, diffusion: f64) -> Self {
        let (rows, cols) = (shape.rows(), shape.cols());
        let k_row = wavenumbers(rows, shape.width());
        let k_col = wavenumbers(cols, shape.height());
        let mut k2 = Vec::with_capacity(rows * cols);
        for kr in &k_row {
            for kc in &k_col {
                k2.push(kr * kr + kc * kc);
            }
        }
        Self {
            shape,
            diffusion,
            k2,
            field_hat: vec![Complex64::new(0.0, 0.0); rows * cols],
            decay: Vec::new(),
            decay_dt: None,
            fft: Fft2::new(rows, cols),
            residue: 0.0,
            residue_warned: false,
        }
    }

    /// The diffusion coefficient.
    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }

    /// `kx^2 + ky^2` per bin, row-major in FFT order.
    pub fn k2(&self) -> &[f64] {
        &self.k2
    }

    /// Current Fourier coefficients, row-major in FFT order.
    pub fn field_hat(&self) -> &[Complex64] {
        &self.field_hat
    }

    /// The zero-wavenumber coefficient: the sum of the grid.
    pub fn dc_mode(&self) -> Complex64 {
        self.field_hat[0]
    }

    /// Largest imaginary magnitude discarded by the last inverse transform.
    pub fn imaginary_residue(&self) -> f64 {
        self.residue
    }

    fn refresh_decay(&mut self, dt: f64) {
        if self.decay_dt != Some(dt) {
            let d = self.diffusion;
            self.decay = self.k2.iter().map(|k2| (-d * k2 * dt).exp()).collect();
            self.decay_dt = Some(dt);
        }
    }
}

impl Stepper for Spectral {
    fn name(&self) -> &str {
        "spectral"
    }

    fn scheme(&self) -> Scheme {
        Scheme::Spectral
    }

    fn stability(&self, _shape: GridShape, _dt: f64) -> Option<Stability> {
        None
    }

    fn resync(&mut self, grid: &[f64]) -> Result<(), StepError> {
        self.fft.forward_real(grid, &mut self.field_hat)
    }

    fn as_spectral(&self) -> Option<&Spectral> {
        Some(self)
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        let n = self.shape.cell_count();
        let dt = ctx.dt();
        let tick = ctx.tick();
        let (prev, next) = ctx.split();
        check_len("spectral", n, prev, next)?;
        debug_assert!(
            {
                let sum: f64 = prev.iter().sum();
                let scale: f64 = prev.iter().map(|v| v.abs()).sum::<f64>().max(1.0);
                (self.field_hat[0].re - sum).abs() <= 1e-6 * scale
            },
            "spectrum out of sync with grid; resync() was skipped"
        );

        self.refresh_decay(dt);
        for (z, d) in self.field_hat.iter_mut().zip(&self.decay) {
            *z *= *d;
        }

        self.residue = self.fft.inverse_real(&self.field_hat, next)?;
        let scale = next.iter().fold(1.0f64, |m, v| m.max(v.abs()));
        if self.residue > RESIDUE_TOLERANCE * scale && !self.residue_warned {
            warn!(
                residue = self.residue,
                tick = %tick,
                "spectral inverse transform left a non-negligible imaginary part"
            );
            self.residue_warned = true;
        }
        Ok(())
    }
}
