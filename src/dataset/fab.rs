//! VisMF multifab headers and FAB payloads
//!
//! Each level of a plotfile stores its data as a `Cell_H` text header that
//! lists the grid boxes and, for every box, the data file and byte offset of
//! its FAB. A FAB is a one-line ASCII header followed by raw reals:
//!
//! ```text
//! FAB ((8, (64 11 52 0 1 12 0 1023)),(8, (8 7 6 5 4 3 2 1)))((0,0) (15,15) (0,0)) 5
//! <ncomp × ncells reals, component-major, i fastest>
//! ```
//!
//! The first descriptor is the real format, the second the byte order:
//! `(8 7 … 1)` is little-endian, `(1 2 … 8)` big-endian.

use std::io::{BufRead, Seek, SeekFrom};

use ndarray::{Array3, ShapeBuilder};

pub(crate) type ParseResult<T> = std::result::Result<T, String>;

/// Index-space box, inclusive on both ends; unused axes are `0..=0`
///
/// Boxes built by the parsers always have `lo <= hi` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBox {
    pub lo: [i64; 3],
    pub hi: [i64; 3],
}

impl IndexBox {
    pub fn shape(&self) -> [usize; 3] {
        [
            (self.hi[0] - self.lo[0] + 1) as usize,
            (self.hi[1] - self.lo[1] + 1) as usize,
            (self.hi[2] - self.lo[2] + 1) as usize,
        ]
    }

    /// Cell count, `None` if it does not fit in `usize`
    pub fn num_cells(&self) -> Option<usize> {
        self.shape()
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }
}

/// Strip box punctuation and parse every integer in `s`
pub(crate) fn parse_ints(s: &str) -> ParseResult<Vec<i64>> {
    s.replace(['(', ')', ','], " ")
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i64>()
                .map_err(|_| format!("expected an integer, found `{}`", tok))
        })
        .collect()
}

/// Parse every box of the form `((lo) (hi) (type))` in `s`
pub(crate) fn parse_boxes(s: &str, dim: usize) -> ParseResult<Vec<IndexBox>> {
    let ints = parse_ints(s)?;
    let stride = 3 * dim;
    if ints.len() % stride != 0 {
        return Err(format!("malformed box list `{}`", s.trim()));
    }
    ints.chunks_exact(stride)
        .map(|c| box_from_ints(&c[..2 * dim], dim))
        .collect()
}

fn box_from_ints(ints: &[i64], dim: usize) -> ParseResult<IndexBox> {
    let mut lo = [0i64; 3];
    let mut hi = [0i64; 3];
    lo[..dim].copy_from_slice(&ints[..dim]);
    hi[..dim].copy_from_slice(&ints[dim..2 * dim]);
    if let Some(a) = (0..dim).find(|&a| hi[a] < lo[a]) {
        return Err(format!(
            "inverted box on axis {}: lo {} > hi {}",
            a, lo[a], hi[a]
        ));
    }
    Ok(IndexBox { lo, hi })
}

/// Location of one FAB inside the level's data files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FabOnDisk {
    pub file: String,
    pub offset: u64,
}

/// Contents of a `Cell_H` file
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFabHeader {
    pub ncomp: usize,
    pub boxes: Vec<IndexBox>,
    pub fabs: Vec<FabOnDisk>,
}

/// Parse a VisMF `Cell_H` header
///
/// Layout: version, "how", ncomp, nghost, a box array `(n 0 … )`, the box
/// count again, then one `FabOnDisk: <file> <offset>` line per box. The
/// trailing min/max tables are ignored.
pub fn parse_multifab_header(text: &str, dim: usize) -> ParseResult<MultiFabHeader> {
    let mut lines = text.lines().map(str::trim);

    let _version = lines.next().ok_or("empty Cell_H")?;
    let _how = lines.next().ok_or("truncated Cell_H")?;
    let ncomp = lines
        .next()
        .ok_or("truncated Cell_H")?
        .parse::<usize>()
        .map_err(|e| format!("bad component count: {}", e))?;

    let mut boxes = Vec::new();
    let mut fabs = Vec::new();
    for line in lines {
        if line.starts_with("((") {
            boxes.extend(parse_boxes(line, dim)?);
        } else if let Some(rest) = line.strip_prefix("FabOnDisk:") {
            let mut parts = rest.split_whitespace();
            let file = parts.next().ok_or("FabOnDisk without file name")?;
            let offset = parts
                .next()
                .ok_or("FabOnDisk without offset")?
                .parse::<u64>()
                .map_err(|e| format!("bad FabOnDisk offset: {}", e))?;
            fabs.push(FabOnDisk {
                file: file.to_string(),
                offset,
            });
        }
    }

    if boxes.len() != fabs.len() {
        return Err(format!(
            "Cell_H lists {} boxes but {} FabOnDisk entries",
            boxes.len(),
            fabs.len()
        ));
    }

    Ok(MultiFabHeader { ncomp, boxes, fabs })
}

/// Binary layout of the reals in a FAB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealFormat {
    pub bytes: usize,
    pub little_endian: bool,
}

/// Parsed FAB header line
#[derive(Debug, Clone, PartialEq)]
pub struct FabHeader {
    pub format: RealFormat,
    pub index_box: IndexBox,
    pub ncomp: usize,
}

/// Parse a `FAB ((…),(…))box ncomp` line
pub fn parse_fab_header(line: &str, dim: usize) -> ParseResult<FabHeader> {
    let body = line
        .trim()
        .strip_prefix("FAB")
        .ok_or_else(|| format!("not a FAB header: `{}`", line.trim()))?;
    let ints = parse_ints(body)?;

    // bytes, 8 format ints, bytes, `bytes` order ints
    let bytes = *ints.first().ok_or("empty FAB header")? as usize;
    if bytes != 4 && bytes != 8 {
        return Err(format!("unsupported real size {}", bytes));
    }
    let order_start = 10;
    let box_start = order_start + bytes;
    if ints.len() != box_start + 3 * dim + 1 {
        return Err(format!("malformed FAB header `{}`", line.trim()));
    }

    let order = &ints[order_start..box_start];
    let little_endian = order[0] as usize == bytes;

    let ncomp = ints[ints.len() - 1];
    let ncomp = usize::try_from(ncomp)
        .map_err(|_| format!("bad FAB component count {}", ncomp))?;

    Ok(FabHeader {
        format: RealFormat {
            bytes,
            little_endian,
        },
        index_box: box_from_ints(&ints[box_start..box_start + 2 * dim], dim)?,
        ncomp,
    })
}

fn decode_reals(raw: &[u8], format: RealFormat) -> Vec<f64> {
    match (format.bytes, format.little_endian) {
        (8, true) => raw
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect(),
        (8, false) => raw
            .chunks_exact(8)
            .map(|c| f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect(),
        (_, true) => raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        (_, false) => raw
            .chunks_exact(4)
            .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
    }
}

/// Read component `comp` of the FAB that starts at `offset`
pub fn read_fab_component<R: BufRead + Seek>(
    reader: &mut R,
    offset: u64,
    dim: usize,
    comp: usize,
) -> ParseResult<(FabHeader, Array3<f64>)> {
    reader
        .seek(SeekFrom::Start(offset))
        .map_err(|e| format!("seek to {} failed: {}", offset, e))?;

    let mut header_line = Vec::new();
    reader
        .read_until(b'\n', &mut header_line)
        .map_err(|e| format!("reading FAB header failed: {}", e))?;
    let header = parse_fab_header(&String::from_utf8_lossy(&header_line), dim)?;

    if comp >= header.ncomp {
        return Err(format!(
            "component {} out of range (FAB has {})",
            comp, header.ncomp
        ));
    }

    let too_large = || format!("FAB box {:?} is too large", header.index_box);
    let ncells = header.index_box.num_cells().ok_or_else(too_large)?;
    let comp_bytes = ncells
        .checked_mul(header.format.bytes)
        .ok_or_else(too_large)?;
    let comp_offset = comp
        .checked_mul(comp_bytes)
        .and_then(|b| u64::try_from(b).ok())
        .ok_or_else(too_large)?;

    let data_start = offset + header_line.len() as u64;
    let start = data_start.checked_add(comp_offset).ok_or_else(too_large)?;
    let end = start
        .checked_add(comp_bytes as u64)
        .ok_or_else(too_large)?;
    let len = reader
        .seek(SeekFrom::End(0))
        .map_err(|e| format!("seek to end failed: {}", e))?;
    if end > len {
        return Err(format!(
            "FAB data truncated: component {} ends at byte {}, file has {}",
            comp, end, len
        ));
    }

    reader
        .seek(SeekFrom::Start(start))
        .map_err(|e| format!("seek to component {} failed: {}", comp, e))?;

    let mut raw = vec![0u8; comp_bytes];
    reader
        .read_exact(&mut raw)
        .map_err(|e| format!("FAB data truncated: {}", e))?;

    let [nx, ny, nz] = header.index_box.shape();
    let data = Array3::from_shape_vec((nx, ny, nz).f(), decode_reals(&raw, header.format))
        .map_err(|e| format!("FAB shape mismatch: {}", e))?;

    Ok((header, data))
}

// =================================================================================================
// Tests
// =================================================================================================
