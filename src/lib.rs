//! castro-plots: slice and profile plots of AMReX/Castro plotfiles
//!
//! Reads plotfiles written by the Castro hydrodynamics code and renders two
//! kinds of figures with `plotters`.
//!
//! # Architecture
//!
//! Both pipelines are straight sequences of data transformations:
//!
//! 1. **Slice pipeline** ([`pipeline::run_slice`])
//!    - load one plotfile ([`dataset`])
//!    - cut each field through the domain center ([`analysis::slice`])
//!    - style it per field ([`output::visualization::policy`])
//!    - compose a 2×2 grid with color bars and save it
//!      ([`output::visualization::slice_grid`])
//!
//! 2. **Profile pipeline** ([`pipeline::run_profiles`])
//!    - order plotfile names into a sequence ([`analysis::sequence`])
//!    - load each snapshot and sort its cells by x ([`analysis::ray`])
//!    - color curves by sequence position, thin the legend and save two
//!      stacked panels ([`output::visualization::profiles`])
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use castro_plots::pipeline::{run_profiles, run_slice, ProfileOptions, SliceOptions};
//!
//! # fn main() -> castro_plots::Result<()> {
//! // run_plt00100_slice.png in the current directory
//! run_slice("run_plt00100", ".", &SliceOptions::default())?;
//!
//! // det.png from every second plotfile
//! let options = ProfileOptions {
//!     skip: 2,
//!     ..ProfileOptions::default()
//! };
//! run_profiles(&["det_plt00000", "det_plt00100", "det_plt00200"], &options, "det.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: plotfile reader and the `Dataset` abstraction
//! - [`analysis`]: slices, rays and snapshot sequences
//! - [`output`]: figures, color maps and display policy
//! - [`pipeline`]: the two end-to-end pipelines
//! - [`cli`]: argument parsing and logging setup for the binaries

pub mod error;

pub mod analysis;
pub mod dataset;
pub mod output;

pub mod cli;
pub mod pipeline;

pub use error::{Error, Result};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use castro_plots::prelude::*;
    //! ```
    pub use crate::analysis::{extract_ray, extract_slice, ProfileSample, SliceSpec, SnapshotSeries};
    pub use crate::dataset::{AmrField, Axis, Dataset, DomainBox, MemoryDataset, Patch, Plotfile};
    pub use crate::error::{Error, Result};
    pub use crate::output::visualization::{
        policy_for, Colormap, GridConfig, Panel, ProfileConfig, ProfileFigure, SliceGrid,
    };
    pub use crate::pipeline::{run_profiles, run_slice, ProfileOptions, SliceOptions};
}
