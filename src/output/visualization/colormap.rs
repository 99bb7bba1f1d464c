//! Color maps
//!
//! Each map is a piecewise-linear table of RGB anchors, sampled through a
//! 256-entry lookup table: a scalar `x` in [0, 1] selects entry
//! `min(floor(256 x), 255)`, and entry `k` is the table interpolated at
//! `k / 255`. This is the quantization scientific plotting tools apply, so
//! sampled colors match theirs.

use std::fmt;

use plotters::style::RGBColor;

const LUT_SIZE: usize = 256;

/// (position, r, g, b) anchors, positions ascending from 0 to 1
type Anchors = &'static [(f64, f64, f64, f64)];

const VIRIDIS: Anchors = &[
    (0.0, 0.266667, 0.003922, 0.329412),
    (0.125, 0.278431, 0.176471, 0.482353),
    (0.25, 0.231373, 0.321569, 0.545098),
    (0.375, 0.172549, 0.447059, 0.556863),
    (0.5, 0.129412, 0.568627, 0.549020),
    (0.625, 0.156863, 0.682353, 0.501961),
    (0.75, 0.368627, 0.788235, 0.384314),
    (0.875, 0.678431, 0.862745, 0.188235),
    (1.0, 0.992157, 0.905882, 0.145098),
];

const MAGMA: Anchors = &[
    (0.0, 0.000000, 0.000000, 0.015686),
    (0.125, 0.109804, 0.062745, 0.266667),
    (0.25, 0.309804, 0.070588, 0.482353),
    (0.375, 0.505882, 0.145098, 0.505882),
    (0.5, 0.709804, 0.211765, 0.478431),
    (0.625, 0.898039, 0.313725, 0.392157),
    (0.75, 0.984314, 0.533333, 0.380392),
    (0.875, 0.996078, 0.760784, 0.529412),
    (1.0, 0.988235, 0.992157, 0.749020),
];

const PLASMA: Anchors = &[
    (0.0, 0.050980, 0.031373, 0.529412),
    (0.125, 0.298039, 0.007843, 0.631373),
    (0.25, 0.494118, 0.011765, 0.658824),
    (0.375, 0.662745, 0.137255, 0.584314),
    (0.5, 0.800000, 0.278431, 0.470588),
    (0.625, 0.898039, 0.419608, 0.364706),
    (0.75, 0.972549, 0.580392, 0.254902),
    (0.875, 0.992157, 0.764706, 0.156863),
    (1.0, 0.941176, 0.976471, 0.129412),
];

const CIVIDIS: Anchors = &[
    (0.0, 0.000000, 0.133333, 0.305882),
    (0.125, 0.070588, 0.207843, 0.439216),
    (0.25, 0.231373, 0.286275, 0.423529),
    (0.375, 0.341176, 0.364706, 0.427451),
    (0.5, 0.439216, 0.443137, 0.450980),
    (0.625, 0.541176, 0.525490, 0.470588),
    (0.75, 0.647059, 0.611765, 0.454902),
    (0.875, 0.764706, 0.701961, 0.411765),
    (1.0, 0.996078, 0.909804, 0.219608),
];

const NIPY_SPECTRAL: Anchors = &[
    (0.00, 0.0, 0.0, 0.0),
    (0.05, 0.4667, 0.0, 0.5333),
    (0.10, 0.5333, 0.0, 0.6),
    (0.15, 0.0, 0.0, 0.6667),
    (0.20, 0.0, 0.0, 0.8667),
    (0.25, 0.0, 0.4667, 0.8667),
    (0.30, 0.0, 0.6, 0.8667),
    (0.35, 0.0, 0.6667, 0.6667),
    (0.40, 0.0, 0.6667, 0.5333),
    (0.45, 0.0, 0.6, 0.0),
    (0.50, 0.0, 0.7333, 0.0),
    (0.55, 0.0, 0.8667, 0.0),
    (0.60, 0.0, 1.0, 0.0),
    (0.65, 0.7333, 1.0, 0.0),
    (0.70, 0.9333, 0.9333, 0.0),
    (0.75, 1.0, 0.8, 0.0),
    (0.80, 1.0, 0.6, 0.0),
    (0.85, 1.0, 0.0, 0.0),
    (0.90, 0.8667, 0.0, 0.0),
    (0.95, 0.8, 0.0, 0.0),
    (1.00, 0.8, 0.8, 0.8),
];

/// Named color maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Colormap {
    #[default]
    Viridis,
    Magma,
    Plasma,
    Cividis,
    NipySpectral,
}

impl Colormap {
    pub const ALL: [Colormap; 5] = [
        Colormap::Viridis,
        Colormap::Magma,
        Colormap::Plasma,
        Colormap::Cividis,
        Colormap::NipySpectral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Viridis => "viridis",
            Colormap::Magma => "magma",
            Colormap::Plasma => "plasma",
            Colormap::Cividis => "cividis",
            Colormap::NipySpectral => "nipy_spectral",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn anchors(self) -> Anchors {
        match self {
            Colormap::Viridis => VIRIDIS,
            Colormap::Magma => MAGMA,
            Colormap::Plasma => PLASMA,
            Colormap::Cividis => CIVIDIS,
            Colormap::NipySpectral => NIPY_SPECTRAL,
        }
    }

    fn interpolate(self, t: f64) -> [f64; 3] {
        let anchors = self.anchors();
        let upper = anchors
            .iter()
            .position(|a| a.0 >= t)
            .unwrap_or(anchors.len() - 1)
            .max(1);
        let (p0, r0, g0, b0) = anchors[upper - 1];
        let (p1, r1, g1, b1) = anchors[upper];
        let w = ((t - p0) / (p1 - p0)).clamp(0.0, 1.0);
        [r0 + w * (r1 - r0), g0 + w * (g1 - g0), b0 + w * (b1 - b0)]
    }

    /// RGB channels in [0, 1] for `x` in [0, 1] (clamped)
    pub fn rgb(self, x: f64) -> [f64; 3] {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let entry = ((x * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
        self.interpolate(entry as f64 / (LUT_SIZE - 1) as f64)
    }

    pub fn color(self, x: f64) -> RGBColor {
        HexColor::from_rgb(self.rgb(x)).into()
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An opaque 8-bit color, displayed as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(pub u8, pub u8, pub u8);

impl HexColor {
    /// Channels in [0, 1] are scaled by 255 and truncated
    pub fn from_rgb(rgb: [f64; 3]) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        HexColor(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl From<HexColor> for RGBColor {
    fn from(c: HexColor) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}
