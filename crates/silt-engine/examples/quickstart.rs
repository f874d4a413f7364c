//! Inject a source into each reference configuration and watch it spread.
//!
//! ```text
//! cargo run -p silt-engine --example quickstart
//! ```

use silt_core::Scheme;
use silt_engine::{Flow, Frame, LoopConfig, SimConfig, Simulation, SimulationLoop};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for scheme in Scheme::ALL {
        let mut sim = Simulation::new(SimConfig::reference(scheme))?;
        let shape = sim.shape();
        let center = (shape.rows() / 2, shape.cols() / 2);
        let touched = sim.inject(center, 5, 10.0)?;
        println!("{scheme}: {}x{} grid, deposited on {touched} cells", shape.rows(), shape.cols());

        let mut lp = SimulationLoop::new(sim, LoopConfig::ticks(100));
        let summary = lp.run(&mut |frame: &Frame<'_>| {
            if frame.metrics.tick.0 % 25 == 0 {
                println!(
                    "  tick {:>3}  peak {:>8.4}  mass {:>10.4}",
                    frame.metrics.tick, frame.metrics.peak, frame.metrics.total_mass
                );
            }
            Flow::Continue
        })?;

        let sim = lp.into_simulation();
        println!(
            "  stopped after {} ticks, centre = {:.4}",
            summary.ticks,
            sim.sample(center.0, center.1)?
        );
    }
    Ok(())
}
