//! Initial concentration profiles.

use crate::shape::GridShape;

/// The concentration profile a field starts from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InitialCondition {
    /// Every cell zero.
    #[default]
    Zero,
    /// `amplitude * exp(-(r / width)^2)`, with `r` the physical distance
    /// from the domain centre. Cell `(row, col)` sits at
    /// `(row * dx, col * dy)`.
    Gaussian {
        /// Peak value at the centre.
        amplitude: f64,
        /// Physical length over which the profile falls by `1/e`.
        width: f64,
    },
    /// Cells within `radius` cells of the centre cell set to `value`.
    Disc {
        /// Radius in grid cells, boundary inclusive.
        radius: u32,
        /// Concentration inside the disc.
        value: f64,
    },
}

impl InitialCondition {
    /// The unit Gaussian `exp(-r^2)` centred on the domain.
    pub fn unit_gaussian() -> Self {
        Self::Gaussian {
            amplitude: 1.0,
            width: 1.0,
        }
    }

    /// Write this profile into `buf`, which holds `shape.cell_count()` cells.
    pub fn fill(&self, shape: GridShape, buf: &mut [f64]) {
        let (rows, cols) = (shape.rows(), shape.cols());
        match *self {
            Self::Zero => buf.fill(0.0),
            Self::Gaussian { amplitude, width } => {
                let (cx, cy) = (shape.width() / 2.0, shape.height() / 2.0);
                for r in 0..rows {
                    let x = r as f64 * shape.dx() - cx;
                    for c in 0..cols {
                        let y = c as f64 * shape.dy() - cy;
                        buf[r * cols + c] = amplitude * (-(x * x + y * y) / (width * width)).exp();
                    }
                }
            }
            Self::Disc { radius, value } => {
                let (cr, cc) = ((rows / 2) as i64, (cols / 2) as i64);
                let r2 = (radius as i64).pow(2);
                for r in 0..rows {
                    let dr = r as i64 - cr;
                    for c in 0..cols {
                        let dc = c as i64 - cc;
                        buf[r * cols + c] = if dr * dr + dc * dc <= r2 { value } else { 0.0 };
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_clears_buffer() {
        let shape = GridShape::new(3, 3, 1.0, 1.0);
        let mut buf = vec![5.0; 9];
        InitialCondition::Zero.fill(shape, &mut buf);
        assert!(buf.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn unit_gaussian_peaks_at_domain_centre() {
        let shape = GridShape::new(100, 100, 1.0, 1.0);
        let mut buf = vec![0.0; shape.cell_count()];
        InitialCondition::unit_gaussian().fill(shape, &mut buf);
        // Centre (50, 50) sits exactly at L/2.
        assert!((buf[50 * 100 + 50] - 1.0).abs() < 1e-12);
        let one_off = (-1.0f64).exp();
        assert!((buf[51 * 100 + 50] - one_off).abs() < 1e-12);
        assert!(buf[0] < 1e-300);
    }

    #[test]
    fn disc_is_inclusive() {
        let shape = GridShape::new(21, 21, 0.5, 0.5);
        let mut buf = vec![0.0; shape.cell_count()];
        InitialCondition::Disc {
            radius: 5,
            value: 1.0,
        }
        .fill(shape, &mut buf);
        assert_eq!(buf[10 * 21 + 10], 1.0);
        assert_eq!(buf[15 * 21 + 10], 1.0);
        assert_eq!(buf[16 * 21 + 10], 0.0);
        // 81 lattice points satisfy dr^2 + dc^2 <= 25.
        assert_eq!(buf.iter().filter(|&&v| v == 1.0).count(), 81);
    }
}
