//! Planar slices resampled onto a fixed-resolution image
//!
//! The slice plane is perpendicular to `normal` and passes through
//! `center`; the image covers `width` along each in-plane axis. Every
//! pixel takes the value of the cell that contains its center, with finer
//! levels overriding coarser ones, so the result depends only on
//! (dataset, field, spec).

use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::dataset::{AmrField, Axis, Dataset, DomainBox, Patch};
use crate::error::{Error, Result};

/// Default image buffer size along each in-plane axis
pub const DEFAULT_RESOLUTION: usize = 2000;

/// Geometry of a slice
#[derive(Debug, Clone, PartialEq)]
pub struct SliceSpec {
    pub normal: Axis,
    pub center: [f64; 3],
    pub width: [f64; 3],
    /// Samples along the (horizontal, vertical) image axes
    pub resolution: (usize, usize),
}

impl SliceSpec {
    /// z-normal slice through the domain midpoint covering the full extent
    pub fn through_center(domain: &DomainBox, resolution: (usize, usize)) -> Self {
        Self {
            normal: Axis::Z,
            center: domain.center(),
            width: domain.width(),
            resolution,
        }
    }

    /// (horizontal, vertical) image axes
    pub fn plane_axes(&self) -> (Axis, Axis) {
        match self.normal {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Physical bounds of the image: `([u_lo, v_lo], [u_hi, v_hi])`
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (u, v) = self.plane_axes();
        let (u, v) = (u.index(), v.index());
        (
            [
                self.center[u] - 0.5 * self.width[u],
                self.center[v] - 0.5 * self.width[v],
            ],
            [
                self.center[u] + 0.5 * self.width[u],
                self.center[v] + 0.5 * self.width[v],
            ],
        )
    }

    fn validate(&self, dim: usize) -> Result<()> {
        if dim < 2 {
            return Err(Error::InvalidArgument(format!(
                "cannot slice a {}D dataset",
                dim
            )));
        }
        let (u, v) = self.plane_axes();
        if u.index() >= dim || v.index() >= dim {
            return Err(Error::InvalidArgument(format!(
                "a {}-normal slice needs a 3D dataset",
                self.normal.name()
            )));
        }
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err(Error::InvalidArgument(format!(
                "slice resolution must be positive, got {}x{}",
                self.resolution.0, self.resolution.1
            )));
        }
        Ok(())
    }
}

/// A resampled slice of one field
///
/// `values[(i, j)]` is the pixel at horizontal index `i` and vertical index
/// `j` (from the lower edge). Pixels outside every patch are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceImage {
    pub field: String,
    pub spec: SliceSpec,
    pub values: DMatrix<f64>,
}

impl SliceImage {
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }

    /// Value at the pixel containing the physical point `(u, v)`
    pub fn value_at(&self, u: f64, v: f64) -> Option<f64> {
        let (lo, hi) = self.spec.bounds();
        let (nu, nv) = self.spec.resolution;
        if u < lo[0] || u >= hi[0] || v < lo[1] || v >= hi[1] {
            return None;
        }
        let i = (((u - lo[0]) / (hi[0] - lo[0])) * nu as f64) as usize;
        let j = (((v - lo[1]) / (hi[1] - lo[1])) * nv as f64) as usize;
        Some(self.values[(i.min(nu - 1), j.min(nv - 1))])
    }
}

/// Slice `field` of `dataset` with the given geometry
pub fn extract_slice(dataset: &dyn Dataset, field: &str, spec: &SliceSpec) -> Result<SliceImage> {
    spec.validate(dataset.domain().dim)?;
    let amr = dataset.field(field)?;
    let values = resample(&amr, spec);

    log::debug!(
        "resampled {} of {} onto {}x{} pixels",
        field,
        dataset.name(),
        spec.resolution.0,
        spec.resolution.1
    );

    Ok(SliceImage {
        field: field.to_string(),
        spec: spec.clone(),
        values,
    })
}

fn cell_index(x: f64, lo: f64, dx: f64, n: usize) -> usize {
    (((x - lo) / dx).floor().max(0.0) as usize).min(n - 1)
}

/// Nearest-cell resampling of `field` onto the slice image
pub fn resample(field: &AmrField, spec: &SliceSpec) -> DMatrix<f64> {
    let (nu, nv) = spec.resolution;
    let (u_axis, v_axis) = spec.plane_axes();
    let (u, v, n) = (u_axis.index(), v_axis.index(), spec.normal.index());
    let (lo, hi) = spec.bounds();
    let pu = (hi[0] - lo[0]) / nu as f64;
    let pv = (hi[1] - lo[1]) / nv as f64;
    let plane = spec.center[n];
    let cuts_normal = n < field.dim;

    // Coarse to fine: later patches overwrite earlier ones
    let patches: Vec<&Patch> = field
        .patches
        .iter()
        .filter(|p| !cuts_normal || (plane >= p.lo[n] && plane < p.hi()[n]))
        .collect();

    let fill_column = |j: usize, column: &mut [f64]| {
        let y = lo[1] + (j as f64 + 0.5) * pv;
        for patch in &patches {
            let p_hi = patch.hi();
            if y < patch.lo[v] || y >= p_hi[v] {
                continue;
            }
            let shape = patch.shape();
            let mut idx = [0usize; 3];
            idx[v] = cell_index(y, patch.lo[v], patch.dx[v], shape[v]);
            if cuts_normal {
                idx[n] = cell_index(plane, patch.lo[n], patch.dx[n], shape[n]);
            }

            let i_start = (((patch.lo[u] - lo[0]) / pu - 0.5).ceil().max(0.0) as usize).min(nu);
            let i_end = (((p_hi[u] - lo[0]) / pu - 0.5).ceil().max(0.0) as usize).min(nu);
            for (i, pixel) in column.iter_mut().enumerate().take(i_end).skip(i_start) {
                let x = lo[0] + (i as f64 + 0.5) * pu;
                idx[u] = cell_index(x, patch.lo[u], patch.dx[u], shape[u]);
                *pixel = patch.data[idx];
            }
        }
    };

    let mut values = DMatrix::from_element(nu, nv, f64::NAN);

    // Column-major storage: each chunk is one vertical index
    #[cfg(feature = "parallel")]
    values
        .as_mut_slice()
        .par_chunks_mut(nu)
        .enumerate()
        .for_each(|(j, column)| fill_column(j, column));
    #[cfg(not(feature = "parallel"))]
    values
        .as_mut_slice()
        .chunks_mut(nu)
        .enumerate()
        .for_each(|(j, column)| fill_column(j, column));

    values
}

// =================================================================================================
// Tests
// =================================================================================================
