//! Core types for the silt diffusion engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the field, stepper and engine crates: tick IDs,
//! error types, numerical scheme and boundary policy tags, and the
//! [`SourceSpec`] describing a pollution deposit.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod scheme;
pub mod source;

pub use error::{FieldError, StepError};
pub use id::TickId;
pub use scheme::{BoundaryPolicy, DepositMode, Scheme};
pub use source::SourceSpec;
