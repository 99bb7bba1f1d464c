//! Data reduction: from snapshots to plottable samples
//!
//! - **slice**: 2-D planar cuts resampled onto an image buffer
//! - **ray**: 1-D profiles of leaf-cell data sorted by position
//! - **sequence**: ordering of plotfile names into a time sequence

pub mod ray;
pub mod sequence;
pub mod slice;

pub use ray::{extract_ray, ProfileSample, Ray};
pub use sequence::{SnapshotIndex, SnapshotSeries};
pub use slice::{extract_slice, SliceImage, SliceSpec, DEFAULT_RESOLUTION};
