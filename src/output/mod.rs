//! Output of analysis results
//!
//! Everything written by the pipelines is an image produced by the
//! **visualization** module:
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── visualization/      ← Figures, color maps and display policy
//!     ├── mod.rs
//!     ├── config.rs
//!     ├── colormap.rs
//!     ├── policy.rs
//!     ├── format.rs
//!     ├── slice_grid.rs
//!     └── profiles.rs
//! ```

pub mod visualization;

pub use visualization::{GridConfig, ProfileConfig, ProfileFigure, SliceGrid};
