//! Grid dimensions and physical spacing.

/// The fixed shape of a field: cell counts plus physical spacing.
///
/// `rows` runs along the first index (spacing `dx`), `cols` along the
/// second (spacing `dy`). Storage is row-major: cell `(r, c)` lives at
/// flat index `r * cols + c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridShape {
    rows: usize,
    cols: usize,
    dx: f64,
    dy: f64,
}

impl GridShape {
    /// Create a shape from cell counts and spacing.
    ///
    /// Callers validate the values; `silt-engine` derives them from
    /// physical extents and rejects non-integral counts.
    pub fn new(rows: usize, cols: usize, dx: f64, dy: f64) -> Self {
        Self { rows, cols, dx, dy }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Spacing along the row index.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Spacing along the column index.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Physical extent along the row index (`rows * dx`).
    pub fn width(&self) -> f64 {
        self.rows as f64 * self.dx
    }

    /// Physical extent along the column index (`cols * dy`).
    pub fn height(&self) -> f64 {
        self.cols as f64 * self.dy
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index of `(row, col)`, or `None` if out of range.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Whether `(row, col)` lies on the outermost ring of cells.
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.rows || col + 1 == self.cols
    }
}
