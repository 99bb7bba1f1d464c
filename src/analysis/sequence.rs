//! Time-ordered plotfile sequences
//!
//! Plotfiles are named `<prefix>plt<step>` (e.g. `det_x_plt00120`). A
//! sequence is rebuilt from a list of such names: the prefix comes from the
//! first name, the step digits from each name, and the steps are ordered
//! numerically whatever order the names were given in.

use std::path::PathBuf;

use crate::error::{Error, Result};

const PLT_MARKER: &str = "plt";

/// Step number of one plotfile, with its original zero padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotIndex {
    pub number: u64,
    pub digits: String,
}

/// Split `name` at the last `plt` into `(prefix including "plt", index)`
fn split_name(name: &str) -> Result<(String, SnapshotIndex)> {
    let name = name.trim_end_matches(['/', '\\']);
    let pos = name.rfind(PLT_MARKER).ok_or_else(|| {
        Error::InvalidArgument(format!("`{}` is not a plotfile name (no `plt`)", name))
    })?;
    let (prefix, digits) = name.split_at(pos + PLT_MARKER.len());
    let number = digits.parse::<u64>().map_err(|_| {
        Error::InvalidArgument(format!("`{}` has no numeric step after `plt`", name))
    })?;

    Ok((
        prefix.to_string(),
        SnapshotIndex {
            number,
            digits: digits.to_string(),
        },
    ))
}

/// A prefix plus ascending plotfile indices
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnapshotSeries {
    pub prefix: String,
    pub indices: Vec<SnapshotIndex>,
}

impl SnapshotSeries {
    /// Build the sequence from plotfile names
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if a name has no `plt` followed by digits.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut prefix = None;
        let mut indices = Vec::with_capacity(names.len());

        for name in names {
            let (p, index) = split_name(name.as_ref())?;
            prefix.get_or_insert(p);
            indices.push(index);
        }
        indices.sort_by_key(|idx| idx.number);

        Ok(Self {
            prefix: prefix.unwrap_or_default(),
            indices,
        })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn numbers(&self) -> Vec<u64> {
        self.indices.iter().map(|idx| idx.number).collect()
    }

    pub fn path(&self, index: &SnapshotIndex) -> PathBuf {
        PathBuf::from(format!("{}{}", self.prefix, index.digits))
    }

    /// Paths of every `skip`-th plotfile, starting with the first
    pub fn strided_paths(&self, skip: usize) -> Vec<PathBuf> {
        self.indices
            .iter()
            .step_by(skip.max(1))
            .map(|idx| self.path(idx))
            .collect()
    }
}
