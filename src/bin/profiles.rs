//! Plot T and enuc versus x for a sequence of plotfiles into `det.png`

use clap::Parser;

use castro_plots::cli::{init_logging, ProfileArgs};
use castro_plots::pipeline::{run_profiles, PROFILE_OUTPUT};

fn main() -> anyhow::Result<()> {
    let args = ProfileArgs::parse();
    init_logging(&args.log_level);

    let figure = run_profiles(&args.plotfiles, &args.options(), PROFILE_OUTPUT)?;
    log::info!("done: {} curves in {}", figure.curve_count(), PROFILE_OUTPUT);
    Ok(())
}
