//! Per-tick metrics for the simulation engine.
//!
//! [`StepMetrics`] captures timing and field statistics for one tick,
//! enough for a headless harness to report progress and for tests to
//! watch for divergence without re-scanning the grid.

use silt_core::TickId;
use silt_field::FieldRead;

/// Timing and field statistics collected after a single tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Tick the statistics describe.
    pub tick: TickId,
    /// Wall-clock time spent in the stepper, in microseconds.
    pub step_us: u64,
    /// Largest concentration in the published grid.
    pub peak: f64,
    /// Sum over every cell of the published grid.
    pub total_mass: f64,
    /// Number of NaN or infinite cells.
    pub non_finite: usize,
}

impl StepMetrics {
    /// Collect statistics from a published grid.
    pub fn observe(field: &impl FieldRead, step_us: u64) -> Self {
        Self {
            tick: field.tick(),
            step_us,
            peak: field.peak(),
            total_mass: field.total(),
            non_finite: field.non_finite_count(),
        }
    }

    /// Whether every cell was finite.
    pub fn is_finite(&self) -> bool {
        self.non_finite == 0
    }
}
