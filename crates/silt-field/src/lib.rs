//! Concentration field storage for the silt diffusion engine.
//!
//! A [`Field`] is a fixed-shape 2-D grid of concentrations indexed
//! `[row, col]`, stored row-major and double-buffered: a tick computes
//! into the staging buffer and swaps it in as a whole, so no reader ever
//! observes a half-stepped grid.
//!
//! Reads go through the [`FieldRead`] trait, implemented by the borrowed
//! [`FieldView`] and the owned, cheaply clonable [`FieldSnapshot`].
//! External deposits go through [`SourceInjector`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod field;
pub mod initial;
pub mod inject;
pub mod read;
pub mod shape;

pub use field::Field;
pub use initial::InitialCondition;
pub use inject::SourceInjector;
pub use read::{FieldRead, FieldSnapshot, FieldView};
pub use shape::GridShape;
