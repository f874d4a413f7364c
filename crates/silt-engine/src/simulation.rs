//! The simulation context object.
//!
//! [`Simulation`] owns everything a run mutates: the double-buffered
//! [`Field`], the active [`Stepper`] and the [`SourceInjector`]. All
//! mutation goes through `&mut self`, so a reader holding a
//! [`FieldView`] or a [`StepResult`] cannot overlap a tick, an injection
//! or a reset; the borrow checker enforces the single-actor model.
//!
//! Every path that writes the published grid outside a tick (injection,
//! reset, load) ends in [`Stepper::resync`], so steppers with derived
//! state never run a tick from stale data.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use silt_core::{DepositMode, FieldError, Scheme, SourceSpec, StepError, TickId};
use silt_field::{Field, FieldRead, FieldSnapshot, FieldView, GridShape, SourceInjector};
use silt_stepper::{Spectral, StepContext, Stepper};
use tracing::{info, trace, warn};

use crate::config::{ConfigError, SimConfig};
use crate::metrics::StepMetrics;

// Compile-time assertion: Simulation can be moved to a worker thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

// ── SimError ────────────────────────────────────────────────────

/// Errors from [`Simulation`] operations.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// Field access failed (out-of-range sample, invalid source, bad load).
    Field(FieldError),
    /// The stepper reported an internal inconsistency. The tick was not
    /// published.
    Step(StepError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(e) => write!(f, "field: {e}"),
            Self::Step(e) => write!(f, "step: {e}"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<FieldError> for SimError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<StepError> for SimError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

// ── StepResult ──────────────────────────────────────────────────

/// Result of a successful [`Simulation::tick()`] call.
pub struct StepResult<'s> {
    /// The grid published by this tick.
    pub view: FieldView<'s>,
    /// Timing and statistics for this tick.
    pub metrics: StepMetrics,
}

// ── Simulation ──────────────────────────────────────────────────

/// A single diffusion run: field, stepper and injector.
///
/// # Example
///
/// ```ignore
/// let mut sim = Simulation::new(SimConfig::reference(Scheme::FiniteDifference))?;
/// sim.inject((100, 100), 5, 10.0)?;
/// for _ in 0..100 {
///     let step = sim.tick()?;
///     println!("{} peak={}", step.metrics.tick, step.metrics.peak);
/// }
/// ```
pub struct Simulation {
    config: SimConfig,
    field: Field,
    stepper: Box<dyn Stepper>,
    injector: SourceInjector,
    non_finite_reported: bool,
}

impl Simulation {
    /// Validate `config` and build a ready-to-tick simulation.
    ///
    /// The field starts from `config.initial`.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let (shape, stepper) = config.build()?;
        Self::assemble(config, shape, stepper)
    }

    /// Build a simulation around a caller-supplied stepper.
    ///
    /// The configuration is still validated; its scheme only selects the
    /// default deposit mode and the bound checked.
    pub fn with_stepper(config: SimConfig, stepper: Box<dyn Stepper>) -> Result<Self, ConfigError> {
        let (shape, _) = config.build()?;
        Self::assemble(config, shape, stepper)
    }

    /// Build a simulation whose field starts from `grid` (row-major)
    /// instead of `config.initial`.
    pub fn from_grid(config: SimConfig, grid: &[f64]) -> Result<Self, ConfigError> {
        let mut sim = Self::new(config)?;
        sim.field.load(grid)?;
        sim.stepper.resync(sim.field.view().as_slice())?;
        Ok(sim)
    }

    fn assemble(
        config: SimConfig,
        shape: GridShape,
        mut stepper: Box<dyn Stepper>,
    ) -> Result<Self, ConfigError> {
        let field = Field::with_initial(shape, &config.initial);
        let stability = stepper.stability(shape, config.dt);
        stepper.resync(field.view().as_slice())?;
        let injector = SourceInjector::new(config.deposit_mode());

        info!(
            scheme = %config.scheme,
            stepper = stepper.name(),
            rows = shape.rows(),
            cols = shape.cols(),
            dx = shape.dx(),
            dy = shape.dy(),
            diffusion = config.diffusion,
            dt = config.dt,
            stability = ?stability.map(|s| s.number),
            deposit = ?injector.mode(),
            "simulation initialized"
        );

        Ok(Self {
            config,
            field,
            stepper,
            injector,
            non_finite_reported: false,
        })
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Numerical scheme of the run.
    pub fn scheme(&self) -> Scheme {
        self.config.scheme
    }

    /// Grid shape.
    pub fn shape(&self) -> GridShape {
        self.field.shape()
    }

    /// Tick of the published grid.
    pub fn tick_id(&self) -> TickId {
        self.field.tick()
    }

    /// Deposit mode used by [`inject_source`](Self::inject_source).
    pub fn deposit_mode(&self) -> DepositMode {
        self.injector.mode()
    }

    /// The active stepper.
    pub fn stepper(&self) -> &dyn Stepper {
        self.stepper.as_ref()
    }

    /// The Fourier state when the active stepper is spectral.
    pub fn spectral(&self) -> Option<&Spectral> {
        self.stepper.as_spectral()
    }

    /// Borrow the published grid.
    pub fn view(&self) -> FieldView<'_> {
        self.field.view()
    }

    /// Copy the published grid into an owned snapshot.
    pub fn snapshot(&self) -> FieldSnapshot {
        self.field.snapshot()
    }

    /// Concentration at `(row, col)`.
    ///
    /// Fails with [`FieldError::OutOfRange`] rather than clamping.
    pub fn sample(&self, row: usize, col: usize) -> Result<f64, SimError> {
        Ok(self.field.value_at(row, col)?)
    }

    /// Deposit a circular source and resynchronize the stepper.
    ///
    /// Returns the number of cells written; cells of the disc outside the
    /// grid are skipped.
    pub fn inject_source(&mut self, source: SourceSpec) -> Result<usize, SimError> {
        let touched = self.injector.deposit(&mut self.field, &source);
        self.resync()?;
        Ok(touched)
    }

    /// Validate `(center, radius, intensity)` and deposit it.
    pub fn inject(
        &mut self,
        center: (usize, usize),
        radius: u32,
        intensity: f64,
    ) -> Result<usize, SimError> {
        let source = SourceSpec::new(center, radius, intensity)?;
        self.inject_source(source)
    }

    /// Zero the field, rewind the tick counter and resynchronize.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.field.clear();
        self.field.rewind();
        self.non_finite_reported = false;
        self.resync()?;
        info!(scheme = %self.config.scheme, "simulation reset");
        Ok(())
    }

    /// Replace the published grid with `grid` and resynchronize.
    pub fn load(&mut self, grid: &[f64]) -> Result<(), SimError> {
        self.field.load(grid)?;
        self.resync()
    }

    /// Advance by one timestep.
    ///
    /// The stepper computes into the staging buffer; the buffers swap only
    /// if it succeeds. Numerical divergence is not an error: the first
    /// non-finite grid of a run is logged and the run continues.
    pub fn tick(&mut self) -> Result<StepResult<'_>, SimError> {
        let shape = self.field.shape();
        let next_tick = self.field.tick().next();
        let dt = self.config.dt;
        let stepper = &mut self.stepper;

        let start = Instant::now();
        self.field.advance(|prev, next| {
            let mut ctx = StepContext::new(prev, next, shape, next_tick, dt);
            stepper.step(&mut ctx)
        })?;
        let step_us = start.elapsed().as_micros() as u64;

        let metrics = StepMetrics::observe(&self.field.view(), step_us);
        if !metrics.is_finite() && !self.non_finite_reported {
            self.non_finite_reported = true;
            warn!(
                tick = %metrics.tick,
                non_finite = metrics.non_finite,
                scheme = %self.config.scheme,
                "field has diverged"
            );
        }
        trace!(
            tick = %metrics.tick,
            step_us,
            peak = metrics.peak,
            total = metrics.total_mass,
            "tick"
        );

        Ok(StepResult {
            view: self.field.view(),
            metrics,
        })
    }

    fn resync(&mut self) -> Result<(), SimError> {
        self.stepper.resync(self.field.view().as_slice())?;
        Ok(())
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("scheme", &self.config.scheme)
            .field("stepper", &self.stepper.name())
            .field("shape", &self.field.shape())
            .field("tick", &self.field.tick())
            .field("deposit", &self.injector.mode())
            .finish()
    }
}
