//! Figure configuration shared across visualization modules
//!
//! [`GridConfig`] describes the multi-panel slice figure and
//! [`ProfileConfig`] the stacked profile figure. Both default to the
//! layout the pipelines write; callers tweak individual fields.

use std::path::Path;

use plotters::prelude::*;

use super::colormap::Colormap;

/// Which grid panels carry axis tick labels and descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// y labels on the left column, x labels on the bottom row
    #[default]
    L,
    /// Every panel is labeled
    All,
}

/// Configuration of the slice grid figure
///
/// # Example
///
/// ```rust,ignore
/// use castro_plots::output::visualization::{GridConfig, LabelMode};
///
/// let mut config = GridConfig::default();
/// config.label_mode = LabelMode::All;
/// config.width = 1600;
/// config.height = 1600;
/// ```
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Image width in pixels (default: 800)
    pub width: u32,

    /// Image height in pixels (default: 800)
    pub height: u32,

    /// Panel rows (default: 2)
    pub rows: usize,

    /// Panel columns (default: 2)
    pub cols: usize,

    /// Space between neighbouring panels in pixels (default: 75)
    pub axes_pad: u32,

    /// Gap between a panel and its color bar, as a fraction of the panel
    /// width (default: 0.02)
    pub cbar_pad: f64,

    /// Color bar width as a fraction of the panel width (default: 0.05)
    pub cbar_size: f64,

    /// Axis labelling (default: [`LabelMode::L`])
    pub label_mode: LabelMode,

    /// Figure background, also used for pixels with no data (default: WHITE)
    pub background: RGBColor,

    /// Font size for captions and ticks (default: 12)
    pub font_size: u32,

    /// Unit of the spatial axes (default: "cm")
    pub axis_unit: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            rows: 2,
            cols: 2,
            axes_pad: 75,
            cbar_pad: 0.02,
            cbar_size: 0.05,
            label_mode: LabelMode::L,
            background: WHITE,
            font_size: 12,
            axis_unit: "cm".to_string(),
        }
    }
}

impl GridConfig {
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the panel at `index` (row-major) shows x labels
    pub(crate) fn shows_x_labels(&self, index: usize) -> bool {
        match self.label_mode {
            LabelMode::All => true,
            LabelMode::L => index / self.cols.max(1) + 1 == self.rows,
        }
    }

    /// Whether the panel at `index` (row-major) shows y labels
    pub(crate) fn shows_y_labels(&self, index: usize) -> bool {
        match self.label_mode {
            LabelMode::All => true,
            LabelMode::L => index % self.cols.max(1) == 0,
        }
    }
}

/// Configuration of the stacked temperature / energy profile figure
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    /// Image width in pixels (default: 700)
    pub width: u32,

    /// Image height in pixels (default: 900)
    pub height: u32,

    /// Palette the curve colors are drawn from (default: nipy_spectral)
    pub palette: Colormap,

    /// Lower y limit of the energy panel relative to its maximum
    /// (default: 1e-10)
    pub log_floor: f64,

    /// Temperature axis label (default: "T (K)")
    pub temperature_label: String,

    /// Energy generation axis label (default: "S_nuc (erg/g/s)")
    pub enuc_label: String,

    /// Shared x axis label (default: "x (cm)")
    pub xlabel: String,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 1)
    pub line_width: u32,

    /// Font size for ticks and legend (default: 14)
    pub font_size: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 900,
            palette: Colormap::NipySpectral,
            log_floor: 1.0e-10,
            temperature_label: "T (K)".to_string(),
            enuc_label: "S_nuc (erg/g/s)".to_string(),
            xlabel: "x (cm)".to_string(),
            background: WHITE,
            line_width: 1,
            font_size: 14,
        }
    }
}

/// Raster or vector output, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// `.svg` selects SVG; anything else is written as a PNG bitmap
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Png,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
