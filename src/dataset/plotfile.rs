//! AMReX native plotfile reader
//!
//! A plotfile is a directory:
//!
//! ```text
//! run_plt00100/
//! ├── Header            ← variables, geometry, time, level/grid listing
//! ├── Level_0/
//! │   ├── Cell_H        ← box array + FAB locations
//! │   └── Cell_D_00000  ← binary FABs
//! └── Level_1/ …
//! ```
//!
//! Only the `Header` is read when the plotfile is opened; field data is
//! read from disk each time [`Dataset::field`] is called.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::fab::{self, ParseResult};
use super::{AmrField, Dataset, DomainBox, Patch};
use crate::error::{Error, Result};

/// Version tag written by AMReX for cell-centered plotfiles
const VERSION_PREFIX: &str = "HyperCLaw";

/// Per-level entries of the `Header`
#[derive(Debug, Clone, PartialEq)]
pub struct LevelHeader {
    pub level: usize,
    pub step: u64,
    pub dx: [f64; 3],
    pub num_grids: usize,
    /// Relative multifab path, e.g. `Level_0/Cell`
    pub cell_path: String,
}

/// Parsed plotfile `Header`
#[derive(Debug, Clone, PartialEq)]
pub struct PlotfileHeader {
    pub version: String,
    pub variables: Vec<String>,
    pub domain: DomainBox,
    pub time: f64,
    pub ref_ratios: Vec<i64>,
    pub coord_sys: i32,
    pub levels: Vec<LevelHeader>,
}

fn parse_floats(line: &str, expected: usize, what: &str) -> ParseResult<Vec<f64>> {
    let values = line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| format!("bad {} value `{}`", what, tok))
        })
        .collect::<ParseResult<Vec<f64>>>()?;
    if values.len() < expected {
        return Err(format!(
            "expected {} {} values, found {}",
            expected,
            what,
            values.len()
        ));
    }
    Ok(values)
}

fn parse_one<T: std::str::FromStr>(line: &str, what: &str) -> ParseResult<T> {
    line.split_whitespace()
        .next()
        .and_then(|tok| tok.parse::<T>().ok())
        .ok_or_else(|| format!("bad {} `{}`", what, line))
}

fn to_xyz(values: &[f64], dim: usize) -> [f64; 3] {
    let mut out = [0.0; 3];
    out[..dim].copy_from_slice(&values[..dim]);
    out
}

/// Parse the text of a plotfile `Header`
pub fn parse_header(text: &str) -> ParseResult<PlotfileHeader> {
    let mut lines = text.lines().map(str::trim);
    let mut next = |what: &str| {
        lines
            .next()
            .ok_or_else(|| format!("Header truncated before {}", what))
    };

    let version = next("version")?.to_string();
    if !version.starts_with(VERSION_PREFIX) {
        return Err(format!("unrecognized plotfile version `{}`", version));
    }

    let nvars: usize = parse_one(next("variable count")?, "variable count")?;
    let mut variables = Vec::with_capacity(nvars);
    for _ in 0..nvars {
        variables.push(next("variable name")?.to_string());
    }

    let dim: usize = parse_one(next("dimension")?, "dimension")?;
    if !(1..=3).contains(&dim) {
        return Err(format!("unsupported dimension {}", dim));
    }

    let time: f64 = parse_one(next("time")?, "time")?;
    let finest_level: usize = parse_one(next("finest level")?, "finest level")?;
    let prob_lo = parse_floats(next("prob_lo")?, dim, "prob_lo")?;
    let prob_hi = parse_floats(next("prob_hi")?, dim, "prob_hi")?;

    // One ratio per coarse level; the line is blank for single-level files
    let ref_ratios: Vec<i64> = next("refinement ratios")?
        .split_whitespace()
        .map(|tok| tok.parse::<i64>().map_err(|_| format!("bad refinement ratio `{}`", tok)))
        .collect::<ParseResult<_>>()?;

    let domain_boxes = fab::parse_boxes(next("domain boxes")?, dim)?;
    if domain_boxes.len() != finest_level + 1 {
        return Err(format!(
            "expected {} domain boxes, found {}",
            finest_level + 1,
            domain_boxes.len()
        ));
    }

    let steps: Vec<u64> = next("level steps")?
        .split_whitespace()
        .map(|tok| tok.parse::<u64>().map_err(|_| format!("bad level step `{}`", tok)))
        .collect::<ParseResult<_>>()?;

    let mut cell_sizes = Vec::with_capacity(finest_level + 1);
    for _ in 0..=finest_level {
        cell_sizes.push(to_xyz(&parse_floats(next("cell size")?, dim, "cell size")?, dim));
    }

    let coord_sys: i32 = parse_one(next("coordinate system")?, "coordinate system")?;
    let _bwidth = next("boundary width")?;

    let mut levels = Vec::with_capacity(finest_level + 1);
    for (lev, dx) in cell_sizes.into_iter().enumerate() {
        let info = next("level info")?;
        let num_grids: usize = info
            .split_whitespace()
            .nth(1)
            .and_then(|tok| tok.parse().ok())
            .ok_or_else(|| format!("bad level info `{}`", info))?;
        let step: u64 = parse_one(next("level step")?, "level step")?;

        // Physical extents of every grid; the index boxes in Cell_H are authoritative
        for _ in 0..num_grids * dim {
            next("grid extents")?;
        }

        let cell_path = next("multifab path")?.to_string();
        levels.push(LevelHeader {
            level: lev,
            step: steps.get(lev).copied().unwrap_or(step),
            dx,
            num_grids,
            cell_path,
        });
    }

    Ok(PlotfileHeader {
        version,
        variables,
        domain: DomainBox::new(dim, to_xyz(&prob_lo, dim), to_xyz(&prob_hi, dim)),
        time,
        ref_ratios,
        coord_sys,
        levels,
    })
}

/// An opened plotfile
#[derive(Debug, Clone)]
pub struct Plotfile {
    path: PathBuf,
    name: String,
    header: PlotfileHeader,
}

impl Plotfile {
    /// Open the plotfile directory at `path` and parse its `Header`
    ///
    /// # Errors
    ///
    /// [`Error::Load`] if the directory or `Header` is missing, unreadable or
    /// not an AMReX plotfile header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let header_path = path.join("Header");
        let text = fs::read_to_string(&header_path)
            .map_err(|e| Error::load(path, format!("cannot read {}: {}", header_path.display(), e)))?;
        let header = parse_header(&text).map_err(|reason| Error::load(path, reason))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log::info!(
            "opened {} ({}D, {} level(s), {} field(s), t = {:e} s)",
            name,
            header.domain.dim,
            header.levels.len(),
            header.variables.len(),
            header.time
        );

        Ok(Self {
            path: path.to_path_buf(),
            name,
            header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &PlotfileHeader {
        &self.header
    }

    fn has_variable(&self, name: &str) -> bool {
        self.header.variables.iter().any(|v| v == name)
    }

    /// Read one stored component on every level
    fn read_component(&self, comp: usize) -> Result<AmrField> {
        let dim = self.header.domain.dim;
        let prob_lo = self.header.domain.lo;
        let mut patches = Vec::new();

        for level in &self.header.levels {
            let cell_h = self.path.join(format!("{}_H", level.cell_path));
            let text = fs::read_to_string(&cell_h).map_err(|e| {
                Error::load(&self.path, format!("cannot read {}: {}", cell_h.display(), e))
            })?;
            let mf = fab::parse_multifab_header(&text, dim)
                .map_err(|reason| Error::load(&self.path, format!("{}: {}", cell_h.display(), reason)))?;

            if comp >= mf.ncomp {
                return Err(Error::load(
                    &self.path,
                    format!("{} holds {} components, wanted {}", cell_h.display(), mf.ncomp, comp),
                ));
            }

            let level_dir = cell_h.parent().unwrap_or(&self.path).to_path_buf();
            let mut readers: HashMap<&str, BufReader<File>> = HashMap::new();

            for fod in &mf.fabs {
                if !readers.contains_key(fod.file.as_str()) {
                    let data_path = level_dir.join(&fod.file);
                    let file = File::open(&data_path).map_err(|e| {
                        Error::load(&self.path, format!("cannot open {}: {}", data_path.display(), e))
                    })?;
                    readers.insert(fod.file.as_str(), BufReader::new(file));
                }
                let reader = readers
                    .get_mut(fod.file.as_str())
                    .ok_or_else(|| Error::load(&self.path, "FAB reader missing"))?;

                let (fab_header, data) = fab::read_fab_component(reader, fod.offset, dim, comp)
                    .map_err(|reason| Error::load(&self.path, format!("{}: {}", fod.file, reason)))?;

                let mut lo = [0.0; 3];
                for a in 0..dim {
                    lo[a] = prob_lo[a] + fab_header.index_box.lo[a] as f64 * level.dx[a];
                }
                let mut dx = [1.0; 3];
                dx[..dim].copy_from_slice(&level.dx[..dim]);

                patches.push(Patch::new(level.level, lo, dx, data));
            }
        }

        let field = AmrField::new(self.header.variables[comp].clone(), dim, patches);
        log::debug!(
            "read {} from {} ({} patches, {} cells)",
            field.name,
            self.name,
            field.patches.len(),
            field.num_cells()
        );
        Ok(field)
    }

    /// `magvel` from stored velocities, or from momenta and density
    fn velocity_magnitude(&self) -> Result<AmrField> {
        let velocities: Vec<&str> = ["x_velocity", "y_velocity", "z_velocity"]
            .into_iter()
            .filter(|v| self.has_variable(v))
            .collect();

        let components = if !velocities.is_empty() {
            velocities
                .iter()
                .map(|v| self.field(v))
                .collect::<Result<Vec<_>>>()?
        } else {
            let momenta: Vec<&str> = ["xmom", "ymom", "zmom"]
                .into_iter()
                .filter(|v| self.has_variable(v))
                .collect();
            if momenta.is_empty() || !self.has_variable("density") {
                return Err(self.not_found("magvel"));
            }
            let density = self.field("density")?;
            momenta
                .iter()
                .map(|m| -> Result<AmrField> {
                    Ok(self.field(m)?.zip_with(&density, m, |p, rho| p / rho))
                })
                .collect::<Result<Vec<_>>>()?
        };

        let first = &components[0];
        let mut sum = first.zip_with(first, "magvel", |v, _| v * v);
        for c in &components[1..] {
            sum = sum.zip_with(c, "magvel", |acc, v| acc + v * v);
        }
        for patch in &mut sum.patches {
            patch.data.mapv_inplace(f64::sqrt);
        }
        Ok(sum)
    }

    fn not_found(&self, field: &str) -> Error {
        Error::FieldNotFound {
            field: field.to_string(),
            available: self.header.variables.clone(),
        }
    }
}

impl Dataset for Plotfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &DomainBox {
        &self.header.domain
    }

    fn time(&self) -> f64 {
        self.header.time
    }

    fn field_names(&self) -> Vec<String> {
        self.header.variables.clone()
    }

    fn field(&self, name: &str) -> Result<AmrField> {
        match self.header.variables.iter().position(|v| v == name) {
            Some(comp) => self.read_component(comp),
            None if name == "magvel" => self.velocity_magnitude(),
            None => Err(self.not_found(name)),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_LEVEL_2D: &str = "HyperCLaw-V1.1
2
Temp
enuc
2
0.5
0
0 0
4 2

((0,0) (3,1) (0,0))
10
1 1
0
0
0 1 0.5
10
0 4
0 2
Level_0/Cell
";

    const TWO_LEVEL_1D: &str = "HyperCLaw-V1.1
1
Temp
1
1.25e-3
1
0
1.0e8
2
((0) (15) (0)) ((0) (31) (0))
20 40
6250000
3125000
0
0
0 1 1.25e-3
20
0 1e8
Level_0/Cell
1 2 1.25e-3
40
0 2.5e7
5e7 1e8
Level_1/Cell
";

    #[test]
    fn test_parse_single_level_header() {
        let h = parse_header(SINGLE_LEVEL_2D).unwrap();
        assert_eq!(h.variables, vec!["Temp", "enuc"]);
        assert_eq!(h.domain.dim, 2);
        assert_eq!(h.domain.hi, [4.0, 2.0, 0.0]);
        assert_eq!(h.time, 0.5);
        assert!(h.ref_ratios.is_empty());
        assert_eq!(h.levels.len(), 1);
        assert_eq!(h.levels[0].dx, [1.0, 1.0, 0.0]);
        assert_eq!(h.levels[0].cell_path, "Level_0/Cell");
        assert_eq!(h.levels[0].step, 10);
    }

    #[test]
    fn test_parse_two_level_header() {
        let h = parse_header(TWO_LEVEL_1D).unwrap();
        assert_eq!(h.domain.dim, 1);
        assert_eq!(h.ref_ratios, vec![2]);
        assert_eq!(h.levels.len(), 2);
        assert_eq!(h.levels[1].num_grids, 2);
        assert_eq!(h.levels[1].dx[0], 3125000.0);
        assert_eq!(h.levels[1].cell_path, "Level_1/Cell");
        assert_eq!(h.levels[1].step, 40);
    }

    #[test]
    fn test_parse_header_rejects_unknown_version() {
        let text = SINGLE_LEVEL_2D.replacen("HyperCLaw-V1.1", "NFiles-V2", 1);
        let err = parse_header(&text).unwrap_err();
        assert!(err.contains("unrecognized"));
    }

    #[test]
    fn test_parse_header_rejects_truncation() {
        let text: String = SINGLE_LEVEL_2D.lines().take(9).collect::<Vec<_>>().join("\n");
        assert!(parse_header(&text).is_err());
    }

    #[test]
    fn test_open_missing_directory_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Plotfile::open(dir.path().join("nope_plt00000")).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }
}
