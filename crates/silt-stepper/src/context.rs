//! Per-tick execution context handed to a [`Stepper`](crate::Stepper).

use silt_core::TickId;
use silt_field::GridShape;

/// Buffers and parameters for one tick.
///
/// `prev` is the published grid at tick start and never changes during
/// the tick. `next` is the staging buffer; the stepper must write every
/// cell of it before returning.
pub struct StepContext<'a> {
    prev: &'a [f64],
    next: &'a mut [f64],
    shape: GridShape,
    tick: TickId,
    dt: f64,
}

impl<'a> StepContext<'a> {
    /// Create a context for the tick that will be published as `tick`.
    pub fn new(
        prev: &'a [f64],
        next: &'a mut [f64],
        shape: GridShape,
        tick: TickId,
        dt: f64,
    ) -> Self {
        Self {
            prev,
            next,
            shape,
            tick,
            dt,
        }
    }

    /// Grid values at tick start.
    pub fn prev(&self) -> &[f64] {
        self.prev
    }

    /// Staging buffer to fill.
    pub fn next(&mut self) -> &mut [f64] {
        &mut *self.next
    }

    /// Both buffers at once, for steppers that read and write in one pass.
    pub fn split(&mut self) -> (&[f64], &mut [f64]) {
        (self.prev, &mut *self.next)
    }

    /// Shape of the grid.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Tick being computed.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Timestep.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}
