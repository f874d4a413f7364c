//! Test utilities for silt development.
//!
//! Grid fixtures and numeric comparisons live in [`fixtures`]; mock
//! steppers for exercising the engine without real numerics live in
//! [`steppers`].

#![allow(missing_docs)]
#![forbid(unsafe_code)]

pub mod fixtures;
pub mod steppers;

pub use fixtures::{
    interior_sum, max_abs_diff, peak, point_source, reference_shape, total, uniform,
};
pub use steppers::{ConstStepper, FailingStepper, IdentityStepper};
