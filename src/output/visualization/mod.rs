//! Visualization of plotfile data with the `plotters` library
//!
//! # Organization
//!
//! - **config**: figure configuration (`GridConfig`, `ProfileConfig`)
//! - **colormap**: named color maps and `#RRGGBB` colors
//! - **policy**: per-field display policy (scale, color limits, color map)
//! - **format**: `%g`-style number formatting for labels and ticks
//! - **slice_grid**: multi-panel slice figures with color bars
//! - **profiles**: sequence colors, legend thinning and stacked profile figures
//!
//! # Quick Start
//!
//! ## Slice grid
//!
//! ```rust,ignore
//! use castro_plots::output::visualization::{GridConfig, Panel, SliceGrid};
//!
//! let mut grid = SliceGrid::new(GridConfig::default());
//! grid.add_panel(Panel::new(temp_slice))?;
//! grid.save("plt00100_slice.png")?;
//! ```
//!
//! ## Profiles
//!
//! ```rust,ignore
//! use castro_plots::output::visualization::{sequence_colors, ProfileConfig, ProfileFigure};
//!
//! let colors = sequence_colors(samples.len(), config.palette);
//! let mut figure = ProfileFigure::new(ProfileConfig::default());
//! figure.add_curve(sample, colors[0], Some(legend_label(sample.time)));
//! figure.save("det.png")?;
//! ```
//!
//! | Figure | Type | Written by |
//! |--------|------|------------|
//! | 2×2 slices of one plotfile | `SliceGrid` | `pipeline::run_slice` |
//! | T and S_nuc profiles of a sequence | `ProfileFigure` | `pipeline::run_profiles` |

pub mod colormap;
pub mod config;
pub mod format;
pub mod policy;
pub mod profiles;
pub mod slice_grid;

pub use colormap::{Colormap, HexColor};
pub use config::{GridConfig, LabelMode, OutputFormat, ProfileConfig};
pub use format::{format_general, legend_label};
pub use policy::{policy_for, DisplayPolicy, Scale};
pub use profiles::{
    sequence_colors, sequence_positions, LabelThinning, ProfileCurve, ProfileFigure, PALETTE_SPAN,
};
pub use slice_grid::{Panel, SliceGrid};
