//! Time steppers for the silt diffusion engine.
//!
//! Three interchangeable integrators behind one [`Stepper`] trait:
//!
//! | Stepper | Update | Boundary |
//! |---------|--------|----------|
//! | [`FiniteDifference`] | explicit 5-point Laplacian | frozen border ring |
//! | [`FluxEuler`] | forward Euler on central-difference fluxes | periodic stencil, then no-flux overwrite |
//! | [`Spectral`] | `exp(-D k² dt)` per Fourier mode | periodic |
//!
//! The boundary treatments are physically different models; each stepper
//! reports its own through [`Stepper::boundary`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod fft;
pub mod finite_difference;
pub mod flux_euler;
mod grid_helpers;
pub mod spectral;
pub mod stepper;

pub use context::StepContext;
pub use fft::Fft2;
pub use finite_difference::FiniteDifference;
pub use flux_euler::FluxEuler;
pub use rustfft::num_complex::Complex64;
pub use spectral::Spectral;
pub use stepper::{stepper_for, Stability, Stepper};
