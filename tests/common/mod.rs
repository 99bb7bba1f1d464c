//! Common utilities for integration tests

pub mod plotfile_writer;

// Re-export commonly used items
pub use plotfile_writer::{write_plotfile, PlotfileLayout, Refinement};
