//! Command-line arguments shared by the binaries

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crate::pipeline::{ProfileOptions, SliceOptions};

/// Install the fmt subscriber; `RUST_LOG` takes precedence over `level`
///
/// Records emitted through the `log` facade are forwarded as well.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Plot Temp, magvel, X(C12) and enuc slices of one plotfile on a 2x2 grid
#[derive(Parser, Debug)]
#[command(name = "slice_multi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "2x2 grid of slices through a plotfile", long_about = None)]
pub struct SliceArgs {
    /// Plotfile directory
    pub plotfile: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl SliceArgs {
    pub fn options(&self) -> SliceOptions {
        SliceOptions::default()
    }
}

/// Take a sequence of plotfiles and plot T and enuc vs. position
#[derive(Parser, Debug)]
#[command(name = "profiles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "T and enuc profiles of a plotfile sequence", long_about = None)]
pub struct ProfileArgs {
    /// Interval between plotfiles
    #[arg(long, default_value_t = 1)]
    pub skip: usize,

    /// Minimum x-coordinate to show
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub xmin: f64,

    /// Maximum x-coordinate to show (non-positive shows everything)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub xmax: f64,

    /// Show all labels (default) or reduce to about this many
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub limitlabels: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Plotfiles to plot
    #[arg(required = true, num_args = 1..)]
    pub plotfiles: Vec<String>,
}

impl ProfileArgs {
    pub fn options(&self) -> ProfileOptions {
        ProfileOptions {
            skip: self.skip,
            xmin: self.xmin,
            xmax: self.xmax,
            limit_labels: self.limitlabels,
            ..ProfileOptions::default()
        }
    }
}
