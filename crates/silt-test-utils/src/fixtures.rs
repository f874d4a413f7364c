//! Grid fixtures and numeric comparison helpers.

use silt_core::Scheme;
use silt_field::GridShape;

/// The grid each scheme's reference configuration runs on.
pub fn reference_shape(scheme: Scheme) -> GridShape {
    match scheme {
        Scheme::FiniteDifference => GridShape::new(200, 200, 1.0, 1.0),
        Scheme::FluxEuler => GridShape::new(200, 200, 0.5, 0.5),
        Scheme::Spectral => GridShape::new(100, 100, 1.0, 1.0),
    }
}

/// A zero grid with a single non-zero cell.
///
/// # Panics
///
/// Panics if `(row, col)` is outside `shape`.
pub fn point_source(shape: GridShape, row: usize, col: usize, value: f64) -> Vec<f64> {
    let mut grid = vec![0.0; shape.cell_count()];
    let i = shape
        .index(row, col)
        .unwrap_or_else(|| panic!("({row}, {col}) outside {}x{}", shape.rows(), shape.cols()));
    grid[i] = value;
    grid
}

/// A grid with every cell set to `value`.
pub fn uniform(shape: GridShape, value: f64) -> Vec<f64> {
    vec![value; shape.cell_count()]
}

/// Sum over all cells.
pub fn total(grid: &[f64]) -> f64 {
    grid.iter().sum()
}

/// Sum over the cells not on the outer border.
pub fn interior_sum(shape: GridShape, grid: &[f64]) -> f64 {
    let cols = shape.cols();
    (1..shape.rows().saturating_sub(1))
        .flat_map(|r| (1..cols.saturating_sub(1)).map(move |c| r * cols + c))
        .map(|i| grid[i])
        .sum()
}

/// Largest cell value, or negative infinity for an empty grid.
pub fn peak(grid: &[f64]) -> f64 {
    grid.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Largest absolute element-wise difference.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
