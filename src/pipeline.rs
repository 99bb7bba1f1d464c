//! End-to-end pipelines
//!
//! - [`run_slice`]: one plotfile → `<basename>_slice.png`, a 2×2 grid of
//!   `Temp`, `magvel`, `X(C12)` and `enuc` slices through the domain center.
//! - [`run_profiles`]: a plotfile sequence → `det.png`, temperature and
//!   energy generation rate versus x, one curve per snapshot.
//!
//! Both abort on the first error and write nothing in that case. Input
//! validation happens before any plotfile is opened.

use std::path::{Path, PathBuf};

use crate::analysis::{extract_slice, ProfileSample, SliceSpec, SnapshotSeries, DEFAULT_RESOLUTION};
use crate::dataset::{self, Dataset};
use crate::error::{Error, Result};
use crate::output::visualization::{
    legend_label, sequence_colors, GridConfig, LabelThinning, Panel, ProfileConfig, ProfileFigure,
    SliceGrid,
};

/// Fields of the slice grid, row-major
pub const SLICE_FIELDS: [&str; 4] = ["Temp", "magvel", "X(C12)", "enuc"];

/// Suffix appended to the plotfile name for the slice figure
pub const SLICE_SUFFIX: &str = "_slice.png";

/// File name of the profile figure
pub const PROFILE_OUTPUT: &str = "det.png";

// =================================================================================================
// Slice pipeline
// =================================================================================================

/// Options of the slice pipeline
#[derive(Debug, Clone)]
pub struct SliceOptions {
    /// Image buffer size per slice (default: 2000×2000)
    pub resolution: (usize, usize),
    /// Fields to slice, one panel each (default: [`SLICE_FIELDS`])
    pub fields: Vec<String>,
    pub grid: GridConfig,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            resolution: (DEFAULT_RESOLUTION, DEFAULT_RESOLUTION),
            fields: SLICE_FIELDS.iter().map(|f| f.to_string()).collect(),
            grid: GridConfig::default(),
        }
    }
}

/// `<basename>_slice.png` for the plotfile at `plotfile`
///
/// Trailing path separators are ignored.
pub fn slice_output_name(plotfile: &Path) -> Result<PathBuf> {
    let base = plotfile.file_name().ok_or_else(|| {
        Error::InvalidArgument(format!("`{}` does not name a plotfile", plotfile.display()))
    })?;
    Ok(PathBuf::from(format!("{}{}", base.to_string_lossy(), SLICE_SUFFIX)))
}

/// Slice every field of `options` through the center of `dataset`
pub fn slice_figure(dataset: &dyn Dataset, options: &SliceOptions) -> Result<SliceGrid> {
    let spec = SliceSpec::through_center(dataset.domain(), options.resolution);
    let mut grid = SliceGrid::new(options.grid.clone());

    for field in &options.fields {
        let image = extract_slice(dataset, field, &spec)?;
        grid.add_panel(Panel::new(image))?;
    }
    Ok(grid)
}

/// Run the slice pipeline on one plotfile, writing into `out_dir`
///
/// Returns the path of the written figure.
///
/// # Errors
///
/// - [`Error::Load`] if the plotfile cannot be read
/// - [`Error::FieldNotFound`] if a field is missing
/// - [`Error::Write`] if the figure cannot be written
pub fn run_slice(
    plotfile: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    options: &SliceOptions,
) -> Result<PathBuf> {
    let plotfile = plotfile.as_ref();
    let output = out_dir.as_ref().join(slice_output_name(plotfile)?);

    let dataset = dataset::load(plotfile)?;
    let grid = slice_figure(&dataset, options)?;
    grid.save(&output)?;

    Ok(output)
}

// =================================================================================================
// Profile pipeline
// =================================================================================================

/// Options of the profile pipeline
#[derive(Debug, Clone)]
pub struct ProfileOptions {
    /// Plot every `skip`-th plotfile (default: 1)
    pub skip: usize,
    /// Lower x clip, used when `xmax > 0` (default: 0)
    pub xmin: f64,
    /// Upper x clip; non-positive disables clipping (default: -1)
    pub xmax: f64,
    /// Approximate number of legend labels; values up to 1 label every
    /// curve (default: 1)
    pub limit_labels: f64,
    pub figure: ProfileConfig,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            skip: 1,
            xmin: 0.0,
            xmax: -1.0,
            limit_labels: 1.0,
            figure: ProfileConfig::default(),
        }
    }
}

impl ProfileOptions {
    fn validate(&self) -> Result<()> {
        if self.skip == 0 {
            return Err(Error::InvalidArgument("skip must be at least 1".to_string()));
        }
        if self.xmax > 0.0 && self.xmin >= self.xmax {
            return Err(Error::InvalidArgument(format!(
                "xmin ({}) must be below xmax ({})",
                self.xmin, self.xmax
            )));
        }
        Ok(())
    }
}

/// Build the profile figure of `series`, opening plotfiles with `load`
///
/// Every `skip`-th plotfile is loaded in turn; curve `k` gets sequence color
/// `k` and a legend label when the label thinning selects it.
pub fn profile_figure<D, F>(
    series: &SnapshotSeries,
    options: &ProfileOptions,
    mut load: F,
) -> Result<ProfileFigure>
where
    D: Dataset,
    F: FnMut(&Path) -> Result<D>,
{
    options.validate()?;
    let numplots = series.len() / options.skip;
    let thinning = LabelThinning::new(options.limit_labels, numplots)?;
    let colors = sequence_colors(numplots, options.figure.palette);

    let mut figure = ProfileFigure::new(options.figure.clone());
    if options.xmax > 0.0 {
        figure.set_xlim(options.xmin, options.xmax);
    }

    let paths = series.strided_paths(options.skip);
    let total = paths.len();
    for (index, path) in paths.iter().enumerate() {
        let dataset = load(path.as_path())?;
        let sample = ProfileSample::from_dataset(&dataset)?;
        log::info!(
            "[{}/{}] {}: t = {:e} s",
            index + 1,
            total,
            dataset.name(),
            sample.time
        );

        let label = thinning
            .shows_label(index)
            .then(|| legend_label(sample.time));
        let color = colors[index.min(colors.len() - 1)];
        figure.add_curve(sample, color, label);
    }

    Ok(figure)
}

/// Run the profile pipeline on `plotfiles`, writing the figure to `output`
///
/// An empty plotfile list still writes a figure, with no curves.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] for a negative label limit, a zero skip,
///   inverted clip bounds or a plotfile name without `plt<digits>`; raised
///   before any plotfile is opened
/// - [`Error::Load`] / [`Error::FieldNotFound`] if a plotfile cannot be used
/// - [`Error::Write`] if the figure cannot be written
pub fn run_profiles<S: AsRef<str>>(
    plotfiles: &[S],
    options: &ProfileOptions,
    output: impl AsRef<Path>,
) -> Result<ProfileFigure> {
    let series = SnapshotSeries::from_names(plotfiles)?;
    log::info!(
        "{} plotfile(s) with prefix `{}`, plotting every {}",
        series.len(),
        series.prefix,
        options.skip
    );

    let figure = profile_figure(&series, options, |path: &Path| dataset::load(path))?;
    figure.save(output)?;
    Ok(figure)
}

// =================================================================================================
// Tests
// =================================================================================================
