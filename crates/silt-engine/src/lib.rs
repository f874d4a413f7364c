//! Simulation engine for the silt diffusion workspace.
//!
//! - [`SimConfig`] describes a run and validates it up front.
//! - [`Simulation`] owns the field, the active stepper and the injector,
//!   and exposes the tick/inject/reset/sample operations.
//! - [`SimulationLoop`] drives a simulation tick by tick, handing each
//!   published frame to a [`Presenter`] and applying [`Command`]s from a
//!   [`ControlHandle`] only at the yield point between ticks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod metrics;
pub mod simulation;

pub use config::{ConfigError, LoopConfig, SimConfig};
pub use driver::{
    Command, ControlHandle, Flow, Frame, LoopState, Presenter, RunSummary, SimulationLoop,
    StopReason,
};
pub use metrics::StepMetrics;
pub use simulation::{SimError, Simulation, StepResult};
