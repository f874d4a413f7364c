//! Silt: a 2-D pollutant diffusion engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all silt sub-crates. For most users, adding `silt` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use silt::prelude::*;
//!
//! // 200x200 cells, D=2, dt=0.1, zero field.
//! let mut sim = Simulation::new(SimConfig::reference(Scheme::FiniteDifference)).unwrap();
//! sim.inject((100, 100), 5, 10.0).unwrap();
//!
//! for _ in 0..10 {
//!     let step = sim.tick().unwrap();
//!     assert!(step.metrics.is_finite());
//! }
//! assert!(sim.sample(100, 100).unwrap() < 10.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `silt-core` | tick IDs, errors, schemes, deposit modes, sources |
//! | [`field`] | `silt-field` | grid shape, double-buffered field, views, injection |
//! | [`stepper`] | `silt-stepper` | `Stepper` trait and the three integrators |
//! | [`engine`] | `silt-engine` | configuration, simulation context, tick loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors and IDs (`silt-core`).
pub use silt_core as types;

/// Field storage, read views and source injection (`silt-field`).
///
/// Most users only need [`field::FieldRead`] from this module; it is also
/// in the [`prelude`].
pub use silt_field as field;

/// Time steppers (`silt-stepper`).
///
/// The [`stepper::Stepper`] trait is the extension point for custom
/// integrators; [`stepper::Spectral`] exposes its Fourier state for
/// inspection.
pub use silt_stepper as stepper;

/// Simulation engine (`silt-engine`).
///
/// [`engine::Simulation`] for direct stepping, [`engine::SimulationLoop`]
/// for a paced run driven by a presenter and command channel.
pub use silt_engine as engine;

/// Common imports for typical silt usage.
///
/// ```rust
/// use silt::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use silt_core::{BoundaryPolicy, DepositMode, Scheme, SourceSpec, TickId};

    // Errors
    pub use silt_core::{FieldError, StepError};
    pub use silt_engine::{ConfigError, SimError};

    // Field
    pub use silt_field::{FieldRead, FieldSnapshot, FieldView, GridShape, InitialCondition};

    // Stepper
    pub use silt_stepper::{Stability, StepContext, Stepper};

    // Engine
    pub use silt_engine::{
        Command, ControlHandle, Flow, Frame, LoopConfig, Presenter, SimConfig, Simulation,
        SimulationLoop, StepMetrics, StepResult,
    };
}
