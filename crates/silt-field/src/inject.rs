//! Circular source deposits.

use silt_core::{DepositMode, SourceSpec};
use tracing::debug;

use crate::field::Field;

/// Applies circular deposits to a [`Field`] under a fixed [`DepositMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceInjector {
    mode: DepositMode,
}

impl SourceInjector {
    /// Create an injector using `mode`.
    pub fn new(mode: DepositMode) -> Self {
        Self { mode }
    }

    /// The deposit mode in effect.
    pub fn mode(&self) -> DepositMode {
        self.mode
    }

    /// Deposit `source` onto `field`.
    ///
    /// Every cell within `radius` of the centre (boundary inclusive) is
    /// combined with the intensity under the injector's mode. Cells of the
    /// disc that fall outside the grid are skipped. Returns the number of
    /// cells written.
    pub fn deposit(&self, field: &mut Field, source: &SourceSpec) -> usize {
        let shape = field.shape();
        let (rows, cols) = (shape.rows(), shape.cols());
        let (cr, cc) = source.center();
        let radius = source.radius() as usize;
        let intensity = source.intensity();

        // Bounding box of the disc clipped to the grid; empty when the
        // centre lies further than `radius` beyond an edge.
        let r_lo = cr.saturating_sub(radius);
        let c_lo = cc.saturating_sub(radius);
        let r_hi = cr.saturating_add(radius).min(rows.saturating_sub(1));
        let c_hi = cc.saturating_add(radius).min(cols.saturating_sub(1));
        let mut touched = 0;
        if rows > 0 && cols > 0 && r_lo <= r_hi && c_lo <= c_hi {
            let cells = field.cells_mut();
            for r in r_lo..=r_hi {
                for c in c_lo..=c_hi {
                    if source.covers(r, c) {
                        let i = r * cols + c;
                        cells[i] = self.mode.apply(cells[i], intensity);
                        touched += 1;
                    }
                }
            }
        }

        debug!(
            center = ?source.center(),
            radius = source.radius(),
            intensity,
            mode = ?self.mode,
            touched,
            "source deposited"
        );
        touched
    }
}
