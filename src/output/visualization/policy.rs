//! Per-field display policy
//!
//! Every field is drawn with exactly one [`DisplayPolicy`], looked up once
//! from a static table. Unknown fields get a linear, auto-ranged policy.
//!
//! | Field    | Scale                 | Range          | Color map |
//! |----------|-----------------------|----------------|-----------|
//! | `Temp`   | log                   | [5e7, 2e8]     | viridis   |
//! | `magvel` | linear                | auto           | cividis   |
//! | `X(C12)` | log                   | [1e-8, 1e-4]   | magma     |
//! | `enuc`   | symlog, linthresh 1e11| [1e11, 1e14]   | plasma    |

use super::colormap::Colormap;

/// Mapping from data values to the color-map axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Linear,
    Log,
    /// Logarithmic above `linthresh` in magnitude, linear below
    SymLog { linthresh: f64 },
}

impl Scale {
    /// Monotonic transform into the space the color map is linear in
    ///
    /// Returns NaN where the scale is undefined (non-positive values on
    /// `Log`).
    pub fn forward(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Log => {
                if v > 0.0 {
                    v.log10()
                } else {
                    f64::NAN
                }
            }
            Scale::SymLog { linthresh } => {
                // base 10, linscale 1
                let linscale_adj = 1.0 / (1.0 - 0.1);
                let a = v.abs();
                if a <= linthresh {
                    v * linscale_adj / linthresh
                } else {
                    v.signum() * (linscale_adj + (a / linthresh).log10())
                }
            }
        }
    }

    /// Inverse of [`Scale::forward`]
    pub fn inverse(self, t: f64) -> f64 {
        match self {
            Scale::Linear => t,
            Scale::Log => 10f64.powf(t),
            Scale::SymLog { linthresh } => {
                let linscale_adj = 1.0 / (1.0 - 0.1);
                let a = t.abs();
                if a <= linscale_adj {
                    t * linthresh / linscale_adj
                } else {
                    t.signum() * linthresh * 10f64.powf(a - linscale_adj)
                }
            }
        }
    }

    pub fn is_logarithmic(self) -> bool {
        !matches!(self, Scale::Linear)
    }
}

/// How one field is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPolicy {
    pub scale: Scale,
    /// Fixed color limits; `None` uses the data range
    pub range: Option<(f64, f64)>,
    pub colormap: Colormap,
    pub units: Option<&'static str>,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            scale: Scale::Linear,
            range: None,
            colormap: Colormap::default(),
            units: None,
        }
    }
}

/// Look up the display policy of `field`
pub fn policy_for(field: &str) -> DisplayPolicy {
    match field {
        "Temp" => DisplayPolicy {
            scale: Scale::Log,
            range: Some((5.0e7, 2.0e8)),
            units: Some("K"),
            ..DisplayPolicy::default()
        },
        "magvel" => DisplayPolicy {
            scale: Scale::Linear,
            range: None,
            colormap: Colormap::Cividis,
            units: Some("cm/s"),
        },
        "X(C12)" => DisplayPolicy {
            scale: Scale::Log,
            range: Some((1.0e-8, 1.0e-4)),
            colormap: Colormap::Magma,
            units: None,
        },
        "enuc" => DisplayPolicy {
            scale: Scale::SymLog { linthresh: 1.0e11 },
            range: Some((1.0e11, 1.0e14)),
            colormap: Colormap::Plasma,
            units: Some("erg/g/s"),
        },
        _ => DisplayPolicy::default(),
    }
}

impl DisplayPolicy {
    /// Color limits: the fixed range, or the data range
    ///
    /// On `Log` only positive values count toward the data range.
    /// Degenerate ranges are widened so the normalization stays finite.
    pub fn resolve_range<I>(&self, values: I) -> (f64, f64)
    where
        I: IntoIterator<Item = f64>,
    {
        if let Some(range) = self.range {
            return range;
        }

        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite() && (self.scale != Scale::Log || *v > 0.0))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        match self.scale {
            Scale::Log if lo > hi => (1.0, 10.0),
            Scale::Log if lo == hi => (lo / 10.0, hi * 10.0),
            _ if lo > hi => (0.0, 1.0),
            _ if lo == hi => (lo - 1.0, hi + 1.0),
            _ => (lo, hi),
        }
    }

    /// Position of `value` on the color-map axis, clipped to [0, 1]
    ///
    /// `None` for values the scale cannot represent (NaN, non-positive on
    /// `Log`); those are drawn in the background color.
    pub fn normalize(&self, value: f64, range: (f64, f64)) -> Option<f64> {
        let t = self.scale.forward(value);
        if !t.is_finite() {
            return None;
        }
        let t0 = self.scale.forward(range.0);
        let t1 = self.scale.forward(range.1);
        if !(t1 - t0).is_normal() {
            return Some(0.0);
        }
        Some(((t - t0) / (t1 - t0)).clamp(0.0, 1.0))
    }

    /// Panel caption, e.g. `Temp (K)`
    pub fn caption(&self, field: &str) -> String {
        match self.units {
            Some(units) => format!("{} ({})", field, units),
            None => field.to_string(),
        }
    }
}
