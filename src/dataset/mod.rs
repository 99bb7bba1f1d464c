//! Simulation snapshots ("plotfiles")
//!
//! A [`Dataset`] is one read-only snapshot: its domain geometry, its
//! simulation time and a set of named cell-centered fields stored on a
//! hierarchy of refinement levels.
//!
//! # Organization
//!
//! - **plotfile**: AMReX native plotfile reader (`Header` + `Level_N/Cell_H`)
//! - **fab**: VisMF `Cell_H` headers and binary FAB payloads
//! - **memory**: in-memory datasets built from closures (tests, benchmarks)
//!
//! # Example
//!
//! ```rust,ignore
//! use castro_plots::dataset::{self, Dataset};
//!
//! let ds = dataset::load("run_plt00100")?;
//! println!("t = {} s", ds.time());
//! let temp = ds.field("Temp")?;
//! ```
//!
//! Fields are read on demand; nothing is cached across calls or snapshots.

pub mod fab;
pub mod memory;
pub mod plotfile;

use std::path::Path;

use ndarray::Array3;

use crate::error::Result;

pub use memory::MemoryDataset;
pub use plotfile::Plotfile;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Axis-aligned bounding box of the computational domain
///
/// Axes beyond `dim` are degenerate (`lo == hi == 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct DomainBox {
    pub dim: usize,
    pub lo: [f64; 3],
    pub hi: [f64; 3],
}

impl DomainBox {
    pub fn new(dim: usize, lo: [f64; 3], hi: [f64; 3]) -> Self {
        Self { dim, lo, hi }
    }

    /// Midpoint of every axis
    pub fn center(&self) -> [f64; 3] {
        [
            0.5 * (self.lo[0] + self.hi[0]),
            0.5 * (self.lo[1] + self.hi[1]),
            0.5 * (self.lo[2] + self.hi[2]),
        ]
    }

    /// Full extent of every axis
    pub fn width(&self) -> [f64; 3] {
        [
            self.hi[0] - self.lo[0],
            self.hi[1] - self.lo[1],
            self.hi[2] - self.lo[2],
        ]
    }
}

/// One grid box of one refinement level
///
/// `data` is indexed `[i, j, k]`; unused dimensions have length 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub level: usize,
    /// Physical coordinates of the lower corner of cell `[0, 0, 0]`
    pub lo: [f64; 3],
    /// Cell size per axis
    pub dx: [f64; 3],
    pub data: Array3<f64>,
}

impl Patch {
    pub fn new(level: usize, lo: [f64; 3], dx: [f64; 3], data: Array3<f64>) -> Self {
        Self { level, lo, dx, data }
    }

    pub fn shape(&self) -> [usize; 3] {
        let (nx, ny, nz) = self.data.dim();
        [nx, ny, nz]
    }

    /// Physical upper corner
    pub fn hi(&self) -> [f64; 3] {
        let n = self.shape();
        [
            self.lo[0] + n[0] as f64 * self.dx[0],
            self.lo[1] + n[1] as f64 * self.dx[1],
            self.lo[2] + n[2] as f64 * self.dx[2],
        ]
    }

    pub fn cell_center(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        [
            self.lo[0] + (i as f64 + 0.5) * self.dx[0],
            self.lo[1] + (j as f64 + 0.5) * self.dx[1],
            self.lo[2] + (k as f64 + 0.5) * self.dx[2],
        ]
    }

    /// Whether `point` lies inside the patch on the first `dim` axes
    pub fn contains(&self, point: &[f64; 3], dim: usize) -> bool {
        let hi = self.hi();
        (0..dim).all(|a| point[a] >= self.lo[a] && point[a] < hi[a])
    }
}

/// A value at the center of a leaf cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafCell {
    pub center: [f64; 3],
    pub value: f64,
}

/// A cell-centered field on every refinement level of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct AmrField {
    pub name: String,
    pub dim: usize,
    /// Sorted by level, coarsest first
    pub patches: Vec<Patch>,
}

impl AmrField {
    pub fn new(name: impl Into<String>, dim: usize, mut patches: Vec<Patch>) -> Self {
        patches.sort_by_key(|p| p.level);
        Self {
            name: name.into(),
            dim,
            patches,
        }
    }

    pub fn finest_level(&self) -> usize {
        self.patches.iter().map(|p| p.level).max().unwrap_or(0)
    }

    pub fn num_cells(&self) -> usize {
        self.patches.iter().map(|p| p.data.len()).sum()
    }

    /// Whether `other` stores its values on exactly the same boxes
    pub fn same_layout(&self, other: &AmrField) -> bool {
        self.patches.len() == other.patches.len()
            && self
                .patches
                .iter()
                .zip(&other.patches)
                .all(|(a, b)| a.level == b.level && a.lo == b.lo && a.shape() == b.shape())
    }

    /// Combine two fields cell by cell
    ///
    /// The layouts must match (see [`AmrField::same_layout`]).
    pub fn zip_with<F>(&self, other: &AmrField, name: &str, f: F) -> AmrField
    where
        F: Fn(f64, f64) -> f64,
    {
        let patches = self
            .patches
            .iter()
            .zip(&other.patches)
            .map(|(a, b)| {
                let mut data = a.data.clone();
                data.zip_mut_with(&b.data, |x, &y| *x = f(*x, y));
                Patch::new(a.level, a.lo, a.dx, data)
            })
            .collect();
        AmrField::new(name, self.dim, patches)
    }

    /// Cells not covered by any patch of the next finer level
    ///
    /// Cells are visited patch by patch in storage order (`i` fastest), so
    /// two fields with the same layout yield their leaves in the same order.
    pub fn leaf_cells(&self) -> Vec<LeafCell> {
        let mut leaves = Vec::with_capacity(self.num_cells());

        for patch in &self.patches {
            let finer: Vec<&Patch> = self
                .patches
                .iter()
                .filter(|p| p.level == patch.level + 1)
                .collect();

            let [nx, ny, nz] = patch.shape();
            for k in 0..nz {
                for j in 0..ny {
                    for i in 0..nx {
                        let center = patch.cell_center(i, j, k);
                        if finer.iter().any(|f| f.contains(&center, self.dim)) {
                            continue;
                        }
                        leaves.push(LeafCell {
                            center,
                            value: patch.data[[i, j, k]],
                        });
                    }
                }
            }
        }

        leaves
    }
}

/// A read-only simulation snapshot
pub trait Dataset {
    /// Snapshot identifier (plotfile directory name)
    fn name(&self) -> &str;

    fn domain(&self) -> &DomainBox;

    /// Simulation time [s]
    fn time(&self) -> f64;

    /// Stored field names, in file order
    fn field_names(&self) -> Vec<String>;

    /// Read one field on all levels
    ///
    /// # Errors
    ///
    /// [`crate::Error::FieldNotFound`] when the field is neither stored nor
    /// derivable, [`crate::Error::Load`] when the data cannot be read.
    fn field(&self, name: &str) -> Result<AmrField>;
}

/// Open the plotfile at `path`
pub fn load(path: impl AsRef<Path>) -> Result<Plotfile> {
    Plotfile::open(path)
}

// =================================================================================================
// Tests
// =================================================================================================
