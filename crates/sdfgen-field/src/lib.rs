#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the field module.
pub mod error;

/// module containing parallelization utilities.
pub mod parallel;

/// signed distance field computation module.
pub mod sdf;

pub use crate::error::SdfError;
pub use crate::parallel::ExecutionStrategy;
pub use crate::sdf::{compute_max_radius, distance_field, distance_field_with, sample_distance};
