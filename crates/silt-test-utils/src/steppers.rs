//! Mock steppers for engine testing.
//!
//! - [`IdentityStepper`] copies the grid through unchanged.
//! - [`ConstStepper`] writes a constant to every cell.
//! - [`FailingStepper`] succeeds a fixed number of times, then fails.

use silt_core::{Scheme, StepError};
use silt_field::GridShape;
use silt_stepper::{Stability, StepContext, Stepper};

/// Copies `prev` into `next`.
pub struct IdentityStepper {
    pub scheme: Scheme,
}

impl IdentityStepper {
    pub fn new(scheme: Scheme) -> Self {
        Self { scheme }
    }
}

impl Stepper for IdentityStepper {
    fn name(&self) -> &str {
        "identity"
    }

    fn scheme(&self) -> Scheme {
        self.scheme
    }

    fn stability(&self, _shape: GridShape, _dt: f64) -> Option<Stability> {
        None
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        let (prev, next) = ctx.split();
        next.copy_from_slice(prev);
        Ok(())
    }
}

/// Fills `next` with a constant.
pub struct ConstStepper {
    pub value: f64,
}

impl ConstStepper {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Stepper for ConstStepper {
    fn name(&self) -> &str {
        "const"
    }

    fn scheme(&self) -> Scheme {
        Scheme::FiniteDifference
    }

    fn stability(&self, _shape: GridShape, _dt: f64) -> Option<Stability> {
        None
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        ctx.next().fill(self.value);
        Ok(())
    }
}

/// Succeeds `succeed_count` times, then returns an error on every call.
///
/// Before failing it scribbles over `next`, so a test can check that a
/// failed tick never reaches the published grid.
pub struct FailingStepper {
    succeed_count: usize,
    calls: usize,
}

impl FailingStepper {
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            calls: 0,
        }
    }

    /// Number of times `step` has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Stepper for FailingStepper {
    fn name(&self) -> &str {
        "failing"
    }

    fn scheme(&self) -> Scheme {
        Scheme::FiniteDifference
    }

    fn stability(&self, _shape: GridShape, _dt: f64) -> Option<Stability> {
        None
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        self.calls += 1;
        if self.calls > self.succeed_count {
            ctx.next().fill(f64::NAN);
            return Err(StepError::Transform {
                reason: format!("failing stepper tripped on call {}", self.calls),
            });
        }
        let (prev, next) = ctx.split();
        next.copy_from_slice(prev);
        Ok(())
    }
}
