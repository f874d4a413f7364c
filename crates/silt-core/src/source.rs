//! Circular pollution source parameters.

use crate::error::FieldError;

/// A circular deposit centred on a grid cell.
///
/// `radius` is in grid cells and `intensity` in concentration units. Both
/// are validated on construction against [`SourceSpec::RADIUS_RANGE`] and
/// [`SourceSpec::INTENSITY_RANGE`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceSpec {
    center: (usize, usize),
    radius: u32,
    intensity: f64,
}

impl SourceSpec {
    /// Permitted radius, inclusive.
    pub const RADIUS_RANGE: (u32, u32) = (1, 10);
    /// Permitted intensity, inclusive.
    pub const INTENSITY_RANGE: (f64, f64) = (1.0, 10.0);

    /// Create a source at `center = (row, col)`.
    ///
    /// Returns `Err(FieldError::InvalidSource)` if `radius` or `intensity`
    /// falls outside its permitted range. The center itself is not checked
    /// against any grid: cells of the disc that fall outside the grid are
    /// skipped at deposit time.
    pub fn new(center: (usize, usize), radius: u32, intensity: f64) -> Result<Self, FieldError> {
        let (rmin, rmax) = Self::RADIUS_RANGE;
        if !(rmin..=rmax).contains(&radius) {
            return Err(FieldError::InvalidSource {
                reason: format!("radius must be in [{rmin}, {rmax}], got {radius}"),
            });
        }
        let (imin, imax) = Self::INTENSITY_RANGE;
        if !(imin..=imax).contains(&intensity) {
            return Err(FieldError::InvalidSource {
                reason: format!("intensity must be in [{imin}, {imax}], got {intensity}"),
            });
        }
        Ok(Self {
            center,
            radius,
            intensity,
        })
    }

    /// Center cell as `(row, col)`.
    pub fn center(&self) -> (usize, usize) {
        self.center
    }

    /// Radius in grid cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Deposit intensity.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Whether `(row, col)` lies within the disc, boundary included.
    ///
    /// Compares squared distances in `i128`, so any pair of `usize`
    /// coordinates is exact and no square root is taken.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        let dr = row as i128 - self.center.0 as i128;
        let dc = col as i128 - self.center.1 as i128;
        let r = i128::from(self.radius);
        dr * dr + dc * dc <= r * r
    }
}
