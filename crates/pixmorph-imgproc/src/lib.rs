#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// runtime settings shared by pipeline operations.
pub mod context;

/// image filtering module.
pub mod filter;

/// utilities for interpolation.
pub mod interpolation;

/// the common interface of image operations.
pub mod operation;

/// module containing parallization utilities.
pub mod parallel;

/// sequential execution of operations with progress notifications.
pub mod pipeline;

/// whole-image geometric transforms.
pub mod transform;

/// coordinate mappings for geometric transformations.
pub mod warp;

pub use operation::Operation;
