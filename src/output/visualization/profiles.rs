//! Time-sequence profile plots
//!
//! One curve per snapshot is overlaid on two stacked panels: temperature
//! (linear y) on top, nuclear energy generation rate (logarithmic y)
//! below. Curves are colored by their position in the sequence and only a
//! thinned subset of them is named in the legend.
//!
//! # Usage
//!
//! ```rust,ignore
//! use castro_plots::output::visualization::{
//!     legend_label, sequence_colors, LabelThinning, ProfileConfig, ProfileFigure,
//! };
//!
//! let config = ProfileConfig::default();
//! let colors = sequence_colors(samples.len(), config.palette);
//! let thinning = LabelThinning::new(5.0, samples.len())?;
//!
//! let mut figure = ProfileFigure::new(config);
//! for (i, sample) in samples.into_iter().enumerate() {
//!     let label = thinning.shows_label(i).then(|| legend_label(sample.time));
//!     figure.add_curve(sample, colors[i], label);
//! }
//! figure.save("det.png")?;
//! ```

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::{Colormap, HexColor};
use super::config::{OutputFormat, ProfileConfig};
use super::format::tick_label;
use crate::analysis::ProfileSample;
use crate::error::{DrawError, Error, Result};

/// Fraction of the palette a sequence spans; the bright tail is left out
pub const PALETTE_SPAN: f64 = 0.95;

// =================================================================================================
// Sequence colors
// =================================================================================================

/// Palette positions for a sequence of `count` snapshots
///
/// Returns `count + 1` evenly spaced positions from 0 to [`PALETTE_SPAN`];
/// `count == 0` yields the single position 0.
pub fn sequence_positions(count: usize) -> Vec<f64> {
    if count == 0 {
        return vec![0.0];
    }
    (0..=count)
        .map(|i| PALETTE_SPAN * i as f64 / count as f64)
        .collect()
}

/// Colors for a sequence of `count` snapshots, sampled from `palette`
pub fn sequence_colors(count: usize, palette: Colormap) -> Vec<HexColor> {
    sequence_positions(count)
        .into_iter()
        .map(|x| HexColor::from_rgb(palette.rgb(x)))
        .collect()
}

// =================================================================================================
// Label thinning
// =================================================================================================

/// Which curves get a legend entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelThinning {
    stride: usize,
}

impl LabelThinning {
    /// Label every `floor(numplots / limit)`-th curve when `limit > 1`,
    /// every curve when `0 <= limit <= 1`
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a negative (or NaN) `limit`.
    pub fn new(limit: f64, numplots: usize) -> Result<Self> {
        if limit.is_nan() || limit < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "label limit must be non-negative, got {}",
                limit
            )));
        }

        let stride = if limit > 1.0 {
            ((numplots as f64 / limit).floor() as usize).max(1)
        } else {
            1
        };
        log::debug!("labelling every {} of {} curves", stride, numplots);

        Ok(Self { stride })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shows_label(&self, index: usize) -> bool {
        index % self.stride == 0
    }
}

// =================================================================================================
// Profile figure
// =================================================================================================

/// One snapshot's curves
#[derive(Debug, Clone)]
pub struct ProfileCurve {
    pub sample: ProfileSample,
    pub color: HexColor,
    pub label: Option<String>,
}

/// Stacked temperature and energy generation profiles written to one image
#[derive(Debug)]
pub struct ProfileFigure {
    config: ProfileConfig,
    curves: Vec<ProfileCurve>,
    xlim: Option<(f64, f64)>,
}

impl ProfileFigure {
    pub fn new(config: ProfileConfig) -> Self {
        Self {
            config,
            curves: Vec::new(),
            xlim: None,
        }
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn add_curve(&mut self, sample: ProfileSample, color: HexColor, label: Option<String>) {
        log::debug!(
            "curve {} ({} points, {}){}",
            self.curves.len(),
            sample.x.len(),
            color,
            label.as_deref().map(|l| format!(", \"{}\"", l)).unwrap_or_default()
        );
        self.curves.push(ProfileCurve {
            sample,
            color,
            label,
        });
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    pub fn curves(&self) -> &[ProfileCurve] {
        &self.curves
    }

    /// Clip the x axis of both panels to `[xmin, xmax]`
    pub fn set_xlim(&mut self, xmin: f64, xmax: f64) {
        self.xlim = Some((xmin, xmax));
    }

    pub fn xlim(&self) -> Option<(f64, f64)> {
        self.xlim
    }

    /// x range shown: the clip bounds, else the data extent padded by 5%
    pub(crate) fn x_range(&self) -> (f64, f64) {
        if let Some(range) = self.xlim {
            return range;
        }
        match extent(self.curves.iter().flat_map(|c| c.sample.x.iter().copied())) {
            Some(range) => padded(range),
            None => (0.0, 1.0),
        }
    }

    /// Temperature range over every plotted point, padded by 5%
    ///
    /// x clipping does not change it.
    pub(crate) fn temperature_range(&self) -> (f64, f64) {
        match extent(self.curves.iter().flat_map(|c| c.sample.temperature.iter().copied())) {
            Some(range) => padded(range),
            None => (0.0, 1.0),
        }
    }

    /// Energy generation range in decades: `[log10(floor * max), log10(max)]`
    ///
    /// `max` is taken over every plotted point, clipped or not.
    pub(crate) fn enuc_decades(&self) -> (f64, f64) {
        let max = self
            .curves
            .iter()
            .flat_map(|c| c.sample.enuc.iter().copied())
            .filter(|e| e.is_finite() && *e > 0.0)
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return (0.0, 1.0);
        }
        let top = max.log10();
        (top + self.config.log_floor.log10(), top)
    }

    /// Render the figure to `path` (`.svg` or PNG)
    ///
    /// A figure without curves is still written, with empty axes.
    ///
    /// # Errors
    ///
    /// [`Error::Write`] if the image cannot be rendered or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let size = (self.config.width, self.config.height);

        let drawn = match OutputFormat::from_path(path) {
            OutputFormat::Svg => self.draw(SVGBackend::new(path, size).into_drawing_area()),
            OutputFormat::Png => self.draw(BitMapBackend::new(path, size).into_drawing_area()),
        };
        drawn.map_err(|e| Error::write(path, e.0))?;

        log::info!("wrote {} ({} curves)", path.display(), self.curves.len());
        Ok(())
    }

    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> std::result::Result<(), DrawError> {
        root.fill(&self.config.background)?;
        let panels = root.split_evenly((2, 1));
        self.draw_temperature(&panels[0])?;
        self.draw_enuc(&panels[1])?;
        root.present()?;
        Ok(())
    }

    fn draw_temperature<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> std::result::Result<(), DrawError> {
        let config = &self.config;
        let (x0, x1) = self.x_range();
        let (y0, y1) = self.temperature_range();
        let visible = in_range((x0, x1));

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .label_style(font(config.font_size))
            .y_desc(config.temperature_label.as_str())
            .x_label_formatter(&|x| tick_label(*x))
            .y_label_formatter(&|y| tick_label(*y))
            .draw()?;

        for curve in &self.curves {
            let color = RGBColor::from(curve.color);
            let points = curve
                .sample
                .x
                .iter()
                .zip(&curve.sample.temperature)
                .filter(|(x, t)| visible(**x) && t.is_finite())
                .map(|(x, t)| (*x, *t));
            let series = chart.draw_series(LineSeries::new(
                points,
                color.stroke_width(config.line_width),
            ))?;
            if let Some(label) = &curve.label {
                let line_width = config.line_width;
                series
                    .label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(line_width)));
            }
        }

        if self.curves.iter().any(|c| c.label.is_some()) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(font(config.font_size))
                .draw()?;
        }
        Ok(())
    }

    fn draw_enuc<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> std::result::Result<(), DrawError> {
        let config = &self.config;
        let (x0, x1) = self.x_range();
        let (d0, d1) = self.enuc_decades();
        let visible = in_range((x0, x1));

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, d0..d1)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .label_style(font(config.font_size))
            .x_desc(config.xlabel.as_str())
            .y_desc(config.enuc_label.as_str())
            .x_label_formatter(&|x| tick_label(*x))
            .y_label_formatter(&|d| tick_label(10f64.powf(*d)))
            .draw()?;

        for curve in &self.curves {
            let color = RGBColor::from(curve.color);
            for segment in positive_runs(&curve.sample.x, &curve.sample.enuc, &visible) {
                chart.draw_series(LineSeries::new(
                    segment.into_iter().map(|(x, e)| (x, e.log10().max(d0))),
                    color.stroke_width(config.line_width),
                ))?;
            }
        }
        Ok(())
    }
}

fn font(size: u32) -> FontDesc<'static> {
    ("sans-serif", size as f64).into_font()
}

fn in_range((lo, hi): (f64, f64)) -> impl Fn(f64) -> bool {
    move |x| x >= lo && x <= hi
}

/// Finite min and max of `values`
fn extent<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Data limits with a 5% margin on both sides
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    let pad = 0.05 * (hi - lo);
    widen((lo - pad, hi + pad))
}

fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Split a curve at non-positive (masked) values
fn positive_runs<F>(x: &[f64], y: &[f64], visible: F) -> Vec<Vec<(f64, f64)>>
where
    F: Fn(f64) -> bool,
{
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&xi, &yi) in x.iter().zip(y) {
        if yi > 0.0 && yi.is_finite() && visible(xi) {
            current.push((xi, yi));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(time: f64) -> ProfileSample {
        let x: Vec<f64> = (0..50).map(|i| i as f64 + 0.5).collect();
        ProfileSample {
            time,
            temperature: x.iter().map(|x| 1.0e8 + 1.0e6 * x).collect(),
            enuc: x.iter().map(|x| if *x < 10.0 { 0.0 } else { 1.0e12 * x }).collect(),
            x,
        }
    }

    #[test]
    fn test_sequence_positions() {
        let positions = sequence_positions(4);
        assert_eq!(positions.len(), 5);
        for (i, p) in positions.iter().enumerate() {
            assert_relative_eq!(*p, 0.95 * i as f64 / 4.0);
        }
        assert_eq!(sequence_positions(0), vec![0.0]);
    }

    #[test]
    fn test_sequence_colors_are_hex_codes() {
        let colors = sequence_colors(7, Colormap::NipySpectral);
        assert_eq!(colors.len(), 8);
        for c in &colors {
            let s = c.to_string();
            assert_eq!(s.len(), 7);
            assert!(s.starts_with('#'));
            assert!(s[1..].chars().all(|ch| ch.is_ascii_hexdigit()));
        }
        assert_eq!(colors[0].to_string(), "#000000");
        assert_eq!(sequence_colors(7, Colormap::NipySpectral), colors);
    }

    #[test]
    fn test_label_stride() {
        let thinning = LabelThinning::new(5.0, 10).unwrap();
        assert_eq!(thinning.stride(), 2);
        let shown: Vec<usize> = (0..10).filter(|&i| thinning.shows_label(i)).collect();
        assert_eq!(shown, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_label_limit_of_one_or_less_labels_everything() {
        for limit in [0.0, 0.5, 1.0] {
            let thinning = LabelThinning::new(limit, 10).unwrap();
            assert!((0..10).all(|i| thinning.shows_label(i)));
        }
    }

    #[test]
    fn test_label_stride_never_zero() {
        let thinning = LabelThinning::new(20.0, 3).unwrap();
        assert_eq!(thinning.stride(), 1);
    }

    #[test]
    fn test_negative_label_limit_is_rejected() {
        assert!(matches!(
            LabelThinning::new(-1.0, 10),
            Err(Error::InvalidArgument(_))
        ));
        assert!(LabelThinning::new(f64::NAN, 10).is_err());
    }

    #[test]
    fn test_positive_runs_mask_non_positive_values() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 2.0, 0.0, -1.0, 3.0, 4.0];
        let runs = positive_runs(&x, &y, |_| true);
        assert_eq!(runs, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(4.0, 3.0), (5.0, 4.0)]]);
        assert!(positive_runs(&x, &y, |x| x > 10.0).is_empty());
    }

    #[test]
    fn test_axis_ranges() {
        let mut figure = ProfileFigure::new(ProfileConfig::default());
        figure.add_curve(sample(0.1), HexColor(0, 0, 0), None);
        let (x0, x1) = figure.x_range();
        assert_relative_eq!(x0, 0.5 - 2.45, epsilon = 1e-12);
        assert_relative_eq!(x1, 49.5 + 2.45, epsilon = 1e-12);

        let (d0, d1) = figure.enuc_decades();
        assert_relative_eq!(d1, (49.5e12f64).log10());
        assert_relative_eq!(d1 - d0, 10.0);

        figure.set_xlim(0.0, 20.0);
        assert_eq!(figure.x_range(), (0.0, 20.0));
    }

    #[test]
    fn test_y_ranges_ignore_x_clipping() {
        let x: Vec<f64> = (0..10).map(|i| i as f64 + 0.5).collect();
        let hot = ProfileSample {
            time: 0.0,
            temperature: x.iter().map(|x| if *x <= 5.0 { 1.0e8 } else { 4.0e9 }).collect(),
            enuc: x.iter().map(|x| if *x <= 5.0 { 1.0e12 } else { 1.0e20 }).collect(),
            x,
        };
        let mut figure = ProfileFigure::new(ProfileConfig::default());
        figure.add_curve(hot, HexColor(0, 0, 0), None);
        let unclipped = (figure.temperature_range(), figure.enuc_decades());

        figure.set_xlim(0.0, 4.0);
        assert_eq!(figure.x_range(), (0.0, 4.0));

        let (d0, d1) = figure.enuc_decades();
        assert_relative_eq!(d1, 20.0, epsilon = 1e-12);
        assert_relative_eq!(d0, 10.0, epsilon = 1e-12);

        let (t0, t1) = figure.temperature_range();
        assert!(t1 > 4.0e9 && t0 < 1.0e8);
        assert_eq!((figure.temperature_range(), figure.enuc_decades()), unclipped);
    }

    #[test]
    fn test_empty_figure_is_written() {
        let figure = ProfileFigure::new(ProfileConfig::default());
        assert_eq!(figure.curve_count(), 0);
        assert_eq!(figure.x_range(), (0.0, 1.0));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("det.png");
        figure.save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_with_labels() {
        let mut figure = ProfileFigure::new(ProfileConfig::default());
        let colors = sequence_colors(2, Colormap::NipySpectral);
        figure.add_curve(sample(0.0), colors[0], Some("t =      0 s".to_string()));
        figure.add_curve(sample(0.5), colors[1], None);
        figure.set_xlim(0.0, 30.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("det.svg");
        figure.save(&path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert_eq!(figure.curve_count(), 2);
    }
}
