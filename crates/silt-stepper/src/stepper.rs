//! The [`Stepper`] trait and stability reporting.

use silt_core::{BoundaryPolicy, Scheme, StepError};
use silt_field::GridShape;

use crate::context::StepContext;
use crate::finite_difference::FiniteDifference;
use crate::flux_euler::FluxEuler;
use crate::spectral::Spectral;

/// A stability number and the bound it must not exceed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stability {
    /// Dimensionless stability number for the chosen parameters.
    pub number: f64,
    /// Largest stable value of `number`.
    pub limit: f64,
}

impl Stability {
    /// Whether the parameters satisfy the bound.
    pub fn is_stable(&self) -> bool {
        self.number.is_finite() && self.number <= self.limit
    }
}

/// A numerical strategy advancing the field by one timestep.
///
/// # Contract
///
/// - `step()` reads `ctx.prev()` and MUST write every cell of `ctx.next()`.
///   The engine publishes the staging buffer only if `step()` returns `Ok`.
/// - `resync()` is called with the published grid whenever it changes
///   outside a tick (construction, source deposit, reset). Steppers that
///   carry derived state rebuild it there; the default does nothing.
/// - Unstable parameters are not detected here: the output diverges
///   instead. [`stability()`](Stepper::stability) reports the bound so the
///   caller can check it up front.
///
/// # Object safety
///
/// This trait is object-safe; the engine stores the active stepper as
/// `Box<dyn Stepper>`.
pub trait Stepper: Send + 'static {
    /// Human-readable name for logs and errors.
    fn name(&self) -> &str;

    /// The scheme this stepper implements.
    fn scheme(&self) -> Scheme;

    /// Boundary treatment applied each tick.
    fn boundary(&self) -> BoundaryPolicy {
        self.scheme().boundary()
    }

    /// Stability bound for timestep `dt` on `shape`, or `None` if the
    /// scheme is unconditionally stable.
    fn stability(&self, shape: GridShape, dt: f64) -> Option<Stability>;

    /// Rebuild derived state from the published grid.
    fn resync(&mut self, _grid: &[f64]) -> Result<(), StepError> {
        Ok(())
    }

    /// Execute one tick.
    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError>;

    /// The Fourier state, if this stepper carries one.
    fn as_spectral(&self) -> Option<&Spectral> {
        None
    }
}

/// Build the stepper for `scheme` on `shape` with diffusion coefficient `diffusion`.
pub fn stepper_for(scheme: Scheme, shape: GridShape, diffusion: f64) -> Box<dyn Stepper> {
    match scheme {
        Scheme::FiniteDifference => Box::new(FiniteDifference::new(diffusion)),
        Scheme::FluxEuler => Box::new(FluxEuler::new(diffusion)),
        Scheme::Spectral => Box::new(Spectral::new(shape, diffusion)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_matches_scheme() {
        let shape = GridShape::new(8, 8, 1.0, 1.0);
        for scheme in Scheme::ALL {
            let s = stepper_for(scheme, shape, 1.0);
            assert_eq!(s.scheme(), scheme);
            assert_eq!(s.boundary(), scheme.boundary());
            assert_eq!(s.name(), scheme.name());
            assert_eq!(s.as_spectral().is_some(), scheme == Scheme::Spectral);
        }
    }

    #[test]
    fn stability_requires_finite_number() {
        assert!(Stability { number: 0.4, limit: 0.5 }.is_stable());
        assert!(Stability { number: 0.5, limit: 0.5 }.is_stable());
        assert!(!Stability { number: 0.51, limit: 0.5 }.is_stable());
        assert!(!Stability { number: f64::NAN, limit: 0.5 }.is_stable());
    }
}
