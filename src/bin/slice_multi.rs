//! Plot a 2x2 grid of slices of one plotfile into `<basename>_slice.png`

use clap::Parser;

use castro_plots::cli::{init_logging, SliceArgs};
use castro_plots::pipeline::run_slice;

fn main() -> anyhow::Result<()> {
    let args = SliceArgs::parse();
    init_logging(&args.log_level);

    let output = run_slice(&args.plotfile, ".", &args.options())?;
    log::info!("done: {}", output.display());
    Ok(())
}
