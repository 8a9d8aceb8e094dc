//! Coordinate mappings used to warp images.
//!
//! Every transformation is expressed as an inverse mapping: for each destination pixel the
//! mapping returns the source position to sample. Positions without a source are reported
//! as [`OUT_OF_RANGE`] and left untouched by the rasterizer.

mod affine;
mod control_points;
mod geometric;
mod mapping;

pub use affine::{
    affine_output_bounds, get_rotation_matrix2d, invert_affine_transform, AffineMap,
    OutputBounds, SINGULAR_EPSILON,
};
pub use control_points::{ControlPointSet, WarpMethod, DEFAULT_STIFFNESS};
pub use geometric::GeometricKind;
pub use mapping::{
    build_mapping, rotated_output_size, CoordinateMapping, PixelMapping, OUT_OF_RANGE,
};
