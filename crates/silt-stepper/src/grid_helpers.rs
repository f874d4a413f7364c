//! Periodic index arithmetic shared by the grid-space steppers.

/// Index before `i` on an axis of length `len`, wrapping `0` to `len - 1`.
pub(crate) fn wrap_prev(i: usize, len: usize) -> usize {
    if i == 0 {
        len - 1
    } else {
        i - 1
    }
}

/// Index after `i` on an axis of length `len`, wrapping `len - 1` to `0`.
pub(crate) fn wrap_next(i: usize, len: usize) -> usize {
    if i + 1 == len {
        0
    } else {
        i + 1
    }
}

/// Check that both buffers hold `expected` cells.
pub(crate) fn check_len(
    name: &str,
    expected: usize,
    prev: &[f64],
    next: &[f64],
) -> Result<(), silt_core::StepError> {
    for got in [prev.len(), next.len()] {
        if got != expected {
            return Err(silt_core::StepError::ShapeMismatch {
                stepper: name.to_string(),
                expected,
                got,
            });
        }
    }
    Ok(())
}
