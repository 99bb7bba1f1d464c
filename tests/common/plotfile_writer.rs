//! Writes small AMReX plotfiles to disk
//!
//! The output follows the native layout (`Header`, `Level_N/Cell_H`,
//! `Level_N/Cell_D_00000`) with little-endian doubles. The base level is
//! split into `grids` boxes along x so that several FABs share one data
//! file; an optional refinement adds one box on level 1.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const LE_DOUBLE: &str = "((8, (64 11 52 0 1 12 0 1023)),(8, (8 7 6 5 4 3 2 1)))";

type IndexRange = ([usize; 3], [usize; 3]);

/// One refined box on level 1, inclusive, in level-1 index space
#[derive(Debug, Clone)]
pub struct Refinement {
    pub ratio: usize,
    pub lo: [usize; 3],
    pub hi: [usize; 3],
}

/// Geometry of a test plotfile
#[derive(Debug, Clone)]
pub struct PlotfileLayout {
    pub dim: usize,
    pub cells: [usize; 3],
    pub lo: [f64; 3],
    pub hi: [f64; 3],
    pub time: f64,
    pub step: u64,
    /// Number of level-0 boxes along x
    pub grids: usize,
    pub refinement: Option<Refinement>,
}

struct Level {
    dx: [f64; 3],
    domain_hi: [usize; 3],
    boxes: Vec<IndexRange>,
}

impl PlotfileLayout {
    pub fn one_d(cells: usize, length: f64, time: f64) -> Self {
        Self {
            dim: 1,
            cells: [cells, 1, 1],
            lo: [0.0; 3],
            hi: [length, 0.0, 0.0],
            time,
            step: 0,
            grids: 1,
            refinement: None,
        }
    }

    pub fn two_d(cells: [usize; 2], hi: [f64; 2], time: f64) -> Self {
        Self {
            dim: 2,
            cells: [cells[0], cells[1], 1],
            lo: [0.0; 3],
            hi: [hi[0], hi[1], 0.0],
            time,
            step: 0,
            grids: 2,
            refinement: None,
        }
    }

    pub fn three_d(cells: [usize; 3], hi: [f64; 3], time: f64) -> Self {
        Self {
            dim: 3,
            cells,
            lo: [0.0; 3],
            hi,
            time,
            step: 0,
            grids: 2,
            refinement: None,
        }
    }

    /// Add a level-1 box covering fine cells `lo..=hi`
    pub fn refined(mut self, ratio: usize, lo: [usize; 3], hi: [usize; 3]) -> Self {
        self.refinement = Some(Refinement { ratio, lo, hi });
        self
    }

    /// Cell size on `level`
    pub fn dx(&self, level: usize) -> [f64; 3] {
        let ratio = match (&self.refinement, level) {
            (Some(r), 1) => r.ratio as f64,
            _ => 1.0,
        };
        let mut dx = [1.0; 3];
        for a in 0..self.dim {
            dx[a] = (self.hi[a] - self.lo[a]) / self.cells[a] as f64 / ratio;
        }
        dx
    }

    fn levels(&self) -> Vec<Level> {
        let dim = self.dim;
        let nx = self.cells[0];
        let grids = self.grids.clamp(1, nx.max(1));

        let mut domain_hi = [0; 3];
        for a in 0..dim {
            domain_hi[a] = self.cells[a] - 1;
        }
        let mut boxes = Vec::with_capacity(grids);
        let mut start = 0;
        for g in 0..grids {
            let end = nx * (g + 1) / grids;
            let mut lo = [0; 3];
            let mut hi = domain_hi;
            lo[0] = start;
            hi[0] = end - 1;
            boxes.push((lo, hi));
            start = end;
        }
        let mut levels = vec![Level {
            dx: self.dx(0),
            domain_hi,
            boxes,
        }];

        if let Some(r) = &self.refinement {
            let mut fine_hi = [0; 3];
            let mut lo = [0; 3];
            let mut hi = [0; 3];
            for a in 0..dim {
                fine_hi[a] = self.cells[a] * r.ratio - 1;
                lo[a] = r.lo[a];
                hi[a] = r.hi[a];
            }
            levels.push(Level {
                dx: self.dx(1),
                domain_hi: fine_hi,
                boxes: vec![(lo, hi)],
            });
        }
        levels
    }

    fn box_text(&self, lo: [usize; 3], hi: [usize; 3]) -> String {
        let join = |v: [usize; 3]| {
            v[..self.dim]
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        let zeros = vec!["0"; self.dim].join(",");
        format!("(({}) ({}) ({}))", join(lo), join(hi), zeros)
    }

    fn reals(&self, v: [f64; 3]) -> String {
        v[..self.dim]
            .iter()
            .map(|x| format!("{:e}", x))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Write plotfile `dir/name` holding one component per entry of `fields`,
/// each sampled at cell centers on every level
pub fn write_plotfile(
    dir: &Path,
    name: &str,
    layout: &PlotfileLayout,
    fields: &[(&str, &dyn Fn([f64; 3]) -> f64)],
) -> PathBuf {
    let root = dir.join(name);
    let dim = layout.dim;
    let levels = layout.levels();

    // Header
    let mut header = String::new();
    header.push_str("HyperCLaw-V1.1\n");
    header.push_str(&format!("{}\n", fields.len()));
    for (field, _) in fields {
        header.push_str(&format!("{}\n", field));
    }
    header.push_str(&format!("{}\n", dim));
    header.push_str(&format!("{:e}\n", layout.time));
    header.push_str(&format!("{}\n", levels.len() - 1));
    header.push_str(&format!("{}\n", layout.reals(layout.lo)));
    header.push_str(&format!("{}\n", layout.reals(layout.hi)));
    match &layout.refinement {
        Some(r) => header.push_str(&format!("{}\n", r.ratio)),
        None => header.push('\n'),
    }
    let domains: Vec<String> = levels
        .iter()
        .map(|l| layout.box_text([0; 3], l.domain_hi))
        .collect();
    header.push_str(&format!("{}\n", domains.join(" ")));
    let steps = vec![layout.step.to_string(); levels.len()];
    header.push_str(&format!("{}\n", steps.join(" ")));
    for level in &levels {
        header.push_str(&format!("{}\n", layout.reals(level.dx)));
    }
    header.push_str("0\n0\n");
    for (lev, level) in levels.iter().enumerate() {
        header.push_str(&format!("{} {} {:e}\n", lev, level.boxes.len(), layout.time));
        header.push_str(&format!("{}\n", layout.step));
        for (lo, hi) in &level.boxes {
            for a in 0..dim {
                let glo = layout.lo[a] + lo[a] as f64 * level.dx[a];
                let ghi = layout.lo[a] + (hi[a] + 1) as f64 * level.dx[a];
                header.push_str(&format!("{:e} {:e}\n", glo, ghi));
            }
        }
        header.push_str(&format!("Level_{}/Cell\n", lev));
    }

    for (lev, level) in levels.iter().enumerate() {
        write_level(&root.join(format!("Level_{}", lev)), layout, level, fields);
    }
    fs::write(root.join("Header"), header).expect("write Header");

    root
}

/// `Cell_D_00000` with one FAB per box, then `Cell_H` pointing into it
fn write_level(
    level_dir: &Path,
    layout: &PlotfileLayout,
    level: &Level,
    fields: &[(&str, &dyn Fn([f64; 3]) -> f64)],
) {
    fs::create_dir_all(level_dir).expect("create level directory");

    let mut data = Vec::new();
    let mut offsets = Vec::with_capacity(level.boxes.len());
    for (lo, hi) in &level.boxes {
        offsets.push(data.len());
        writeln!(
            data,
            "FAB {}{} {}",
            LE_DOUBLE,
            layout.box_text(*lo, *hi),
            fields.len()
        )
        .expect("write FAB header");

        for (_, f) in fields {
            // Fortran order: x fastest
            for k in lo[2]..=hi[2] {
                for j in lo[1]..=hi[1] {
                    for i in lo[0]..=hi[0] {
                        let idx = [i, j, k];
                        let mut center = [0.0; 3];
                        for a in 0..layout.dim {
                            center[a] = layout.lo[a] + (idx[a] as f64 + 0.5) * level.dx[a];
                        }
                        data.extend_from_slice(&f(center).to_le_bytes());
                    }
                }
            }
        }
    }
    fs::write(level_dir.join("Cell_D_00000"), data).expect("write Cell_D");

    let mut cell_h = String::new();
    cell_h.push_str(&format!("1\n0\n{}\n0\n", fields.len()));
    cell_h.push_str(&format!("({} 0\n", level.boxes.len()));
    for (lo, hi) in &level.boxes {
        cell_h.push_str(&format!("{}\n", layout.box_text(*lo, *hi)));
    }
    cell_h.push_str(")\n");
    cell_h.push_str(&format!("{}\n", level.boxes.len()));
    for offset in &offsets {
        cell_h.push_str(&format!("FabOnDisk: Cell_D_00000 {}\n", offset));
    }
    fs::write(level_dir.join("Cell_H"), cell_h).expect("write Cell_H");
}
