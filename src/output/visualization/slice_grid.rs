//! Multi-panel slice figures
//!
//! A [`SliceGrid`] owns a fixed number of [`Panel`]s laid out row-major on a
//! `rows × cols` grid. Each panel is an image of one resampled slice with
//! its own color bar to the right. Construction and [`SliceGrid::save`] are
//! the only lifecycle events; nothing is drawn until the figure is saved.
//!
//! # Usage
//!
//! ```rust,ignore
//! use castro_plots::output::visualization::{GridConfig, Panel, SliceGrid};
//!
//! let mut grid = SliceGrid::new(GridConfig::default());
//! for field in ["Temp", "magvel", "X(C12)", "enuc"] {
//!     grid.add_panel(Panel::new(extract_slice(&plotfile, field, &spec)?))?;
//! }
//! grid.save("run_plt00100_slice.png")?;
//! ```

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::config::{GridConfig, OutputFormat};
use super::format::{offset_exponent, tick_label};
use super::policy::{policy_for, DisplayPolicy};
use crate::analysis::SliceImage;
use crate::error::{DrawError, Error, Result};

const COLORBAR_STEPS: usize = 256;
const X_LABEL_AREA: i32 = 40;
const Y_LABEL_AREA: i32 = 55;
const COLORBAR_LABEL_AREA: i32 = 60;

fn font(size: u32) -> FontDesc<'static> {
    ("sans-serif", size as f64).into_font()
}

/// One styled slice
#[derive(Debug, Clone)]
pub struct Panel {
    pub image: SliceImage,
    pub policy: DisplayPolicy,
    /// Color limits in data units
    pub range: (f64, f64),
}

impl Panel {
    /// Style `image` with the display policy of its field
    pub fn new(image: SliceImage) -> Self {
        let policy = policy_for(&image.field);
        let range = policy.resolve_range(image.finite_values());
        log::debug!(
            "{}: {:?} scale, colors over [{:e}, {:e}], {} map",
            image.field,
            policy.scale,
            range.0,
            range.1,
            policy.colormap
        );
        Self {
            image,
            policy,
            range,
        }
    }

    pub fn caption(&self) -> String {
        self.policy.caption(&self.image.field)
    }

    /// Display color of `value`, `None` for values drawn as background
    pub fn color_at(&self, value: f64) -> Option<RGBColor> {
        self.policy
            .normalize(value, self.range)
            .map(|x| self.policy.colormap.color(x))
    }
}

/// A grid of slice panels written to one image
#[derive(Debug)]
pub struct SliceGrid {
    config: GridConfig,
    panels: Vec<Panel>,
}

impl SliceGrid {
    pub fn new(config: GridConfig) -> Self {
        Self {
            panels: Vec::with_capacity(config.capacity()),
            config,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Place `panel` in the next free grid cell
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when every cell is taken.
    pub fn add_panel(&mut self, panel: Panel) -> Result<()> {
        if self.panels.len() >= self.config.capacity() {
            return Err(Error::InvalidArgument(format!(
                "a {}x{} grid holds at most {} panels",
                self.config.rows,
                self.config.cols,
                self.config.capacity()
            )));
        }
        self.panels.push(panel);
        Ok(())
    }

    /// The x offset annotation is drawn on the last panel only, and only
    /// when that panel has x tick labels
    pub(crate) fn shows_x_offset(&self, index: usize) -> bool {
        index + 1 == self.panels.len() && self.config.shows_x_labels(index)
    }

    /// The y offset annotation goes with the y tick labels
    pub(crate) fn shows_y_offset(&self, index: usize) -> bool {
        index < self.panels.len() && self.config.shows_y_labels(index)
    }

    /// Render the figure to `path` (`.svg` or PNG)
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

        log::info!("wrote {} ({} panels)", path.display(), self.panels.len());
        Ok(())
    }

    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> std::result::Result<(), DrawError> {
        root.fill(&self.config.background)?;

        let half_pad = (self.config.axes_pad / 2) as i32;
        let cells = root.margin(10, 10, 10, 10).split_evenly((self.config.rows, self.config.cols));

        for (index, (panel, cell)) in self.panels.iter().zip(&cells).enumerate() {
            let cell = cell.margin(half_pad, half_pad, half_pad, half_pad);
            self.draw_panel(index, panel, &cell)?;
        }

        root.present()?;
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        index: usize,
        panel: &Panel,
        cell: &DrawingArea<DB, Shift>,
    ) -> std::result::Result<(), DrawError> {
        let config = &self.config;
        let show_x = config.shows_x_labels(index);
        let show_y = config.shows_y_labels(index);

        let (cell_width, _) = cell.dim_in_pixel();
        let bar_width = (cell_width as f64 * config.cbar_size).round() as i32;
        let gap = (cell_width as f64 * config.cbar_pad).round() as i32;
        let image_width = (cell_width as i32 - bar_width - gap - COLORBAR_LABEL_AREA).max(1);
        let (image_area, bar_area) = cell.split_horizontally(image_width);

        // Image
        let (lo, hi) = panel.image.spec.bounds();
        let (u_axis, v_axis) = panel.image.spec.plane_axes();
        let x_exp = offset_exponent(lo[0].abs().max(hi[0].abs()));
        let y_exp = offset_exponent(lo[1].abs().max(hi[1].abs()));
        let x_unit = 10f64.powi(x_exp.unwrap_or(0));
        let y_unit = 10f64.powi(y_exp.unwrap_or(0));

        let mut chart = ChartBuilder::on(&image_area)
            .caption(panel.caption(), font(config.font_size + 2))
            .margin(5)
            .x_label_area_size(if show_x { X_LABEL_AREA } else { 0 })
            .y_label_area_size(if show_y { Y_LABEL_AREA } else { 0 })
            .build_cartesian_2d(lo[0]..hi[0], lo[1]..hi[1])?;

        let x_desc = format!("{} ({})", u_axis.name(), config.axis_unit);
        let y_desc = format!("{} ({})", v_axis.name(), config.axis_unit);
        let x_fmt = |x: &f64| tick_label(*x / x_unit);
        let y_fmt = |y: &f64| tick_label(*y / y_unit);

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .label_style(font(config.font_size))
            .x_labels(if show_x { 5 } else { 0 })
            .y_labels(if show_y { 5 } else { 0 })
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt);
        if show_x {
            mesh.x_desc(x_desc.as_str());
        }
        if show_y {
            mesh.y_desc(y_desc.as_str());
        }
        mesh.draw()?;

        let plot = chart.plotting_area().strip_coord_spec();
        let (w, h) = plot.dim_in_pixel();
        for py in 0..h {
            let v = hi[1] - (py as f64 + 0.5) / h as f64 * (hi[1] - lo[1]);
            for px in 0..w {
                let u = lo[0] + (px as f64 + 0.5) / w as f64 * (hi[0] - lo[0]);
                if let Some(color) = panel.image.value_at(u, v).and_then(|val| panel.color_at(val)) {
                    plot.draw_pixel((px as i32, py as i32), &color)?;
                }
            }
        }

        let offset_font = font(config.font_size);
        if let Some(e) = x_exp.filter(|_| self.shows_x_offset(index)) {
            plot.draw(&Text::new(
                format!("×1e{}", e),
                (w as i32 - 45, h as i32 - config.font_size as i32 - 4),
                offset_font.clone(),
            ))?;
        }
        if let Some(e) = y_exp.filter(|_| self.shows_y_offset(index)) {
            plot.draw(&Text::new(format!("×1e{}", e), (4, 4), offset_font))?;
        }

        // Color bar, in the space the color map is linear in
        let scale = panel.policy.scale;
        let t0 = scale.forward(panel.range.0);
        let t1 = scale.forward(panel.range.1);
        let bar_fmt = |t: &f64| tick_label(scale.inverse(*t));

        let mut bar = ChartBuilder::on(&bar_area)
            .margin_top(config.font_size as i32 + 15)
            .margin_bottom(if show_x { X_LABEL_AREA + 5 } else { 5 })
            .margin_left(gap)
            .x_label_area_size(0)
            .right_y_label_area_size(COLORBAR_LABEL_AREA)
            .build_cartesian_2d(0.0..1.0, t0..t1)?;

        bar.configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(6)
            .label_style(font(config.font_size))
            .y_label_formatter(&bar_fmt)
            .draw()?;

        let colormap = panel.policy.colormap;
        bar.draw_series((0..COLORBAR_STEPS).map(|k| {
            let a = t0 + (t1 - t0) * k as f64 / COLORBAR_STEPS as f64;
            let b = t0 + (t1 - t0) * (k + 1) as f64 / COLORBAR_STEPS as f64;
            let color = colormap.color((k as f64 + 0.5) / COLORBAR_STEPS as f64);
            Rectangle::new([(0.0, a), (1.0, b)], color.filled())
        }))?;

        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
