//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for constructing a [`Simulation`](crate::Simulation).
//! [`validate()`](SimConfig::validate) checks structural invariants and,
//! when asked to, the stability bound of the chosen scheme. [`LoopConfig`]
//! controls pacing of the [`SimulationLoop`](crate::SimulationLoop).

use std::error::Error;
use std::fmt;
use std::time::Duration;

use silt_core::{DepositMode, FieldError, Scheme, StepError};
use silt_field::{GridShape, InitialCondition};
use silt_stepper::{stepper_for, Stepper};
use tracing::warn;

/// Smallest grid either axis may have; the stencils need one interior cell.
pub const MIN_CELLS: usize = 3;

/// Largest grid, in cells, a config may describe.
pub const MAX_CELLS: usize = 1 << 30;

/// Relative tolerance when checking that `extent / spacing` is an integer.
const INTEGRAL_TOLERANCE: f64 = 1e-9;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// An extent divided by its spacing gives zero cells.
    EmptyGrid,
    /// A physical extent is NaN, infinite, zero, or negative.
    InvalidExtent {
        /// The invalid value.
        value: f64,
    },
    /// A grid spacing is NaN, infinite, zero, or negative.
    InvalidSpacing {
        /// The invalid value.
        value: f64,
    },
    /// The diffusion coefficient is NaN, infinite, or negative.
    InvalidCoefficient {
        /// The invalid value.
        value: f64,
    },
    /// The timestep is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The invalid value.
        value: f64,
    },
    /// An extent is not a whole number of cells.
    NonIntegralCellCount {
        /// Physical extent.
        extent: f64,
        /// Spacing along that extent.
        spacing: f64,
    },
    /// Fewer than [`MIN_CELLS`] cells along an axis.
    GridTooSmall {
        /// Derived row count.
        rows: usize,
        /// Derived column count.
        cols: usize,
    },
    /// More than [`MAX_CELLS`] cells in total.
    GridTooLarge {
        /// Derived row count.
        rows: f64,
        /// Derived column count.
        cols: f64,
        /// The cell limit.
        max: usize,
    },
    /// The parameters violate the scheme's stability bound.
    UnstableParameters {
        /// Scheme whose bound was checked.
        scheme: Scheme,
        /// Stability number of the configured parameters.
        number: f64,
        /// Largest stable value.
        limit: f64,
    },
    /// Initial grid data could not be loaded.
    Field(FieldError),
    /// The stepper could not be prepared from the initial grid.
    Stepper(StepError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid has zero cells"),
            Self::InvalidExtent { value } => {
                write!(f, "extent must be finite and positive, got {value}")
            }
            Self::InvalidSpacing { value } => {
                write!(f, "spacing must be finite and positive, got {value}")
            }
            Self::InvalidCoefficient { value } => {
                write!(f, "diffusion coefficient must be finite and non-negative, got {value}")
            }
            Self::InvalidTimeStep { value } => {
                write!(f, "timestep must be finite and positive, got {value}")
            }
            Self::NonIntegralCellCount { extent, spacing } => {
                write!(f, "extent {extent} is not a whole number of cells of size {spacing}")
            }
            Self::GridTooSmall { rows, cols } => {
                write!(f, "{rows}x{cols} grid is below the minimum of {MIN_CELLS}x{MIN_CELLS}")
            }
            Self::GridTooLarge { rows, cols, max } => {
                write!(f, "{rows}x{cols} grid exceeds the limit of {max} cells")
            }
            Self::UnstableParameters {
                scheme,
                number,
                limit,
            } => write!(
                f,
                "{scheme} stability number {number} exceeds limit {limit}"
            ),
            Self::Field(e) => write!(f, "field: {e}"),
            Self::Stepper(e) => write!(f, "stepper: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            Self::Stepper(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for ConfigError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<StepError> for ConfigError {
    fn from(e: StepError) -> Self {
        Self::Stepper(e)
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for constructing a simulation.
///
/// Parameters are fixed for the lifetime of the run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Numerical scheme.
    pub scheme: Scheme,
    /// Physical extent along the row index.
    pub width: f64,
    /// Physical extent along the column index.
    pub height: f64,
    /// Spacing along the row index.
    pub dx: f64,
    /// Spacing along the column index.
    pub dy: f64,
    /// Diffusion coefficient `D`.
    pub diffusion: f64,
    /// Timestep.
    pub dt: f64,
    /// Profile the field starts from.
    pub initial: InitialCondition,
    /// Deposit mode override. `None` uses the scheme's default.
    pub deposit: Option<DepositMode>,
    /// Reject parameters that violate the stability bound. When off, a
    /// violation is logged and the run diverges.
    pub check_stability: bool,
}

impl SimConfig {
    /// Reference parameters for `scheme`.
    ///
    /// | Scheme | Grid | Spacing | D | dt | Initial |
    /// |--------|------|---------|---|----|---------|
    /// | finite-difference | 200×200 | 1 | 2 | 0.1 | zero |
    /// | flux-Euler | 100×100 | 0.5 | 10 | 0.01 | zero |
    /// | spectral | 100×100 | 1 | 10 | 0.01 | `exp(-r²)` |
    pub fn reference(scheme: Scheme) -> Self {
        let (extent, spacing, diffusion, dt, initial) = match scheme {
            Scheme::FiniteDifference => (200.0, 1.0, 2.0, 0.1, InitialCondition::Zero),
            Scheme::FluxEuler => (100.0, 0.5, 10.0, 0.01, InitialCondition::Zero),
            Scheme::Spectral => (100.0, 1.0, 10.0, 0.01, InitialCondition::unit_gaussian()),
        };
        Self {
            scheme,
            width: extent,
            height: extent,
            dx: spacing,
            dy: spacing,
            diffusion,
            dt,
            initial,
            deposit: None,
            check_stability: true,
        }
    }

    /// Deposit mode in effect: the override if set, else the scheme default.
    pub fn deposit_mode(&self) -> DepositMode {
        self.deposit.unwrap_or_else(|| self.scheme.default_deposit())
    }

    /// Derive the grid shape from extents and spacing.
    pub fn shape(&self) -> Result<GridShape, ConfigError> {
        let rows_f = cell_count(self.width, self.dx)?;
        let cols_f = cell_count(self.height, self.dy)?;
        if rows_f == 0.0 || cols_f == 0.0 {
            return Err(ConfigError::EmptyGrid);
        }
        let too_large = ConfigError::GridTooLarge {
            rows: rows_f,
            cols: cols_f,
            max: MAX_CELLS,
        };
        // Each count is at least 1, so both fit once the product does.
        if rows_f * cols_f > MAX_CELLS as f64 {
            return Err(too_large);
        }
        let (rows, cols) = (rows_f as usize, cols_f as usize);
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => return Err(too_large),
        }
        if rows < MIN_CELLS || cols < MIN_CELLS {
            return Err(ConfigError::GridTooSmall { rows, cols });
        }
        Ok(GridShape::new(rows, cols, self.dx, self.dy))
    }

    /// Validate all structural invariants and, if enabled, stability.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.build()?;
        Ok(())
    }

    /// Validate and produce the shape plus the stepper for this config.
    pub(crate) fn build(&self) -> Result<(GridShape, Box<dyn Stepper>), ConfigError> {
        // 1. Coefficients.
        if !self.diffusion.is_finite() || self.diffusion < 0.0 {
            return Err(ConfigError::InvalidCoefficient {
                value: self.diffusion,
            });
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { value: self.dt });
        }
        // 2. Geometry.
        let shape = self.shape()?;
        // 3. Stability.
        let stepper = stepper_for(self.scheme, shape, self.diffusion);
        if let Some(s) = stepper.stability(shape, self.dt) {
            if !s.is_stable() {
                if self.check_stability {
                    return Err(ConfigError::UnstableParameters {
                        scheme: self.scheme,
                        number: s.number,
                        limit: s.limit,
                    });
                }
                warn!(
                    scheme = %self.scheme,
                    number = s.number,
                    limit = s.limit,
                    "stability check disabled; parameters exceed the bound and the run will diverge"
                );
            }
        }
        Ok((shape, stepper))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::reference(Scheme::FiniteDifference)
    }
}

/// Whole number of cells of size `spacing` in `extent`, still as `f64`.
fn cell_count(extent: f64, spacing: f64) -> Result<f64, ConfigError> {
    if !extent.is_finite() || extent <= 0.0 {
        return Err(ConfigError::InvalidExtent { value: extent });
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(ConfigError::InvalidSpacing { value: spacing });
    }
    let exact = extent / spacing;
    let rounded = exact.round();
    if !exact.is_finite() || (exact - rounded).abs() > INTEGRAL_TOLERANCE * rounded.max(1.0) {
        return Err(ConfigError::NonIntegralCellCount { extent, spacing });
    }
    Ok(rounded)
}

// ── LoopConfig ─────────────────────────────────────────────────────

/// Pacing and run length for [`SimulationLoop`](crate::SimulationLoop).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopConfig {
    /// Minimum wall time between the starts of consecutive ticks.
    /// `None` runs as fast as the stepper allows.
    pub pace: Option<Duration>,
    /// Stop after this many ticks. `None` runs until stopped.
    pub max_ticks: Option<u64>,
}

impl LoopConfig {
    /// Pacing of the interactive reference programs: 1 ms, 10 ms and
    /// 200 ms between ticks. The spectral animation ran for 1000 frames.
    pub fn reference(scheme: Scheme) -> Self {
        match scheme {
            Scheme::FiniteDifference => Self {
                pace: Some(Duration::from_millis(1)),
                max_ticks: None,
            },
            Scheme::FluxEuler => Self {
                pace: Some(Duration::from_millis(10)),
                max_ticks: None,
            },
            Scheme::Spectral => Self {
                pace: Some(Duration::from_millis(200)),
                max_ticks: Some(1000),
            },
        }
    }

    /// Unpaced run of exactly `ticks` ticks.
    pub fn ticks(ticks: u64) -> Self {
        Self {
            pace: None,
            max_ticks: Some(ticks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_configs_validate() {
        for scheme in Scheme::ALL {
            let cfg = SimConfig::reference(scheme);
            assert!(cfg.validate().is_ok(), "{scheme} reference rejected");
        }
    }

    #[test]
    fn reference_shapes() {
        let fd = SimConfig::reference(Scheme::FiniteDifference).shape().unwrap();
        assert_eq!((fd.rows(), fd.cols()), (200, 200));
        let flux = SimConfig::reference(Scheme::FluxEuler).shape().unwrap();
        assert_eq!((flux.rows(), flux.cols()), (200, 200));
        assert_eq!(flux.dx(), 0.5);
        let spectral = SimConfig::reference(Scheme::Spectral).shape().unwrap();
        assert_eq!((spectral.rows(), spectral.cols()), (100, 100));
    }

    #[test]
    fn deposit_mode_defaults_to_scheme() {
        let mut cfg = SimConfig::reference(Scheme::Spectral);
        assert_eq!(cfg.deposit_mode(), DepositMode::Additive);
        cfg.deposit = Some(DepositMode::Absolute);
        assert_eq!(cfg.deposit_mode(), DepositMode::Absolute);
        assert_eq!(SimConfig::default().deposit_mode(), DepositMode::Absolute);
    }

    #[test]
    fn non_integral_cell_count_rejected() {
        let cfg = SimConfig {
            width: 10.0,
            dx: 0.3,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonIntegralCellCount {
                extent: 10.0,
                spacing: 0.3
            })
        );
    }

    #[test]
    fn tiny_grid_rejected() {
        let cfg = SimConfig {
            width: 2.0,
            height: 10.0,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::GridTooSmall { rows: 2, cols: 10 })
        );
    }

    #[test]
    fn huge_grid_rejected_before_allocation() {
        let cfg = SimConfig {
            width: 1e30,
            height: 1e30,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::GridTooLarge { max: MAX_CELLS, .. })
        ));

        // Each axis fits on its own; the product does not.
        let wide = SimConfig {
            width: 65536.0,
            height: 65536.0,
            ..SimConfig::default()
        };
        assert_eq!(
            wide.shape(),
            Err(ConfigError::GridTooLarge {
                rows: 65536.0,
                cols: 65536.0,
                max: MAX_CELLS,
            })
        );

        let at_limit = SimConfig {
            width: 32768.0,
            height: 32768.0,
            ..SimConfig::default()
        };
        let shape = at_limit.shape().unwrap();
        assert_eq!(shape.cell_count(), MAX_CELLS);
    }

    #[test]
    fn bad_scalars_rejected() {
        let base = SimConfig::default();
        let cases = [
            (
                SimConfig { width: -1.0, ..base.clone() },
                ConfigError::InvalidExtent { value: -1.0 },
            ),
            (
                SimConfig { dy: 0.0, ..base.clone() },
                ConfigError::InvalidSpacing { value: 0.0 },
            ),
            (
                SimConfig { diffusion: -2.0, ..base.clone() },
                ConfigError::InvalidCoefficient { value: -2.0 },
            ),
            (
                SimConfig { dt: 0.0, ..base.clone() },
                ConfigError::InvalidTimeStep { value: 0.0 },
            ),
        ];
        for (cfg, expected) in cases {
            assert_eq!(cfg.validate(), Err(expected));
        }
        let nan_dt = SimConfig { dt: f64::NAN, ..base };
        assert!(matches!(
            nan_dt.validate(),
            Err(ConfigError::InvalidTimeStep { .. })
        ));
    }

    #[test]
    fn unstable_parameters_rejected_when_checked() {
        let cfg = SimConfig {
            dt: 1.0,
            ..SimConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::UnstableParameters {
                scheme,
                number,
                limit,
            }) => {
                assert_eq!(scheme, Scheme::FiniteDifference);
                assert!((number - 4.0).abs() < 1e-12);
                assert_eq!(limit, 0.5);
            }
            other => panic!("expected UnstableParameters, got {other:?}"),
        }
    }

    #[test]
    fn unstable_parameters_allowed_when_unchecked() {
        let cfg = SimConfig {
            dt: 1.0,
            check_stability: false,
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn spectral_accepts_any_timestep() {
        let cfg = SimConfig {
            dt: 1000.0,
            ..SimConfig::reference(Scheme::Spectral)
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn error_display_and_source() {
        let e = ConfigError::from(FieldError::ShapeMismatch {
            expected: 9,
            got: 4,
        });
        assert!(e.to_string().starts_with("field:"));
        assert!(e.source().is_some());
        assert!(ConfigError::EmptyGrid.source().is_none());
    }

    #[test]
    fn loop_reference_pacing() {
        assert_eq!(
            LoopConfig::reference(Scheme::Spectral).max_ticks,
            Some(1000)
        );
        assert_eq!(
            LoopConfig::reference(Scheme::FluxEuler).pace,
            Some(Duration::from_millis(10))
        );
        assert_eq!(LoopConfig::ticks(5).max_ticks, Some(5));
        assert_eq!(LoopConfig::default().pace, None);
    }
}
