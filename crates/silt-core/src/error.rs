//! Error types shared across the silt workspace.
//!
//! Organized by subsystem: field access ([`FieldError`]) and stepper
//! execution ([`StepError`]). Configuration errors live with the
//! configuration in `silt-engine`.

use std::error::Error;
use std::fmt;

/// Errors from field access and source deposits.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// A coordinate falls outside the grid.
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Number of rows in the grid.
        rows: usize,
        /// Number of columns in the grid.
        cols: usize,
    },
    /// A buffer does not match the grid's cell count.
    ShapeMismatch {
        /// Expected number of cells.
        expected: usize,
        /// Number of cells supplied.
        got: usize,
    },
    /// A source specification is outside its permitted range.
    InvalidSource {
        /// Description of the offending parameter.
        reason: String,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                row,
                col,
                rows,
                cols,
            } => write!(
                f,
                "cell ({row}, {col}) out of range for {rows}x{cols} grid"
            ),
            Self::ShapeMismatch { expected, got } => {
                write!(f, "buffer has {got} cells, grid has {expected}")
            }
            Self::InvalidSource { reason } => write!(f, "invalid source: {reason}"),
        }
    }
}

impl Error for FieldError {}

/// Errors from a stepper during one tick.
///
/// These signal internal inconsistency only. Numerical divergence from an
/// unstable parameter choice is never reported here.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The buffers handed to a stepper do not match the shape it was built for.
    ShapeMismatch {
        /// Name of the stepper.
        stepper: String,
        /// Cell count the stepper was planned for.
        expected: usize,
        /// Cell count of the supplied buffers.
        got: usize,
    },
    /// A Fourier transform could not be carried out.
    Transform {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                stepper,
                expected,
                got,
            } => write!(
                f,
                "stepper '{stepper}' planned for {expected} cells, got {got}"
            ),
            Self::Transform { reason } => write!(f, "transform failed: {reason}"),
        }
    }
}

impl Error for StepError {}
