//! In-memory datasets
//!
//! Used to exercise the extraction and plotting code without plotfiles on
//! disk (unit tests, benchmarks).

use ndarray::Array3;

use super::{AmrField, Dataset, DomainBox, Patch};
use crate::error::{Error, Result};

/// A snapshot whose fields live in memory
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    name: String,
    domain: DomainBox,
    time: f64,
    fields: Vec<AmrField>,
}

impl MemoryDataset {
    pub fn new(name: impl Into<String>, domain: DomainBox, time: f64) -> Self {
        Self {
            name: name.into(),
            domain,
            time,
            fields: Vec::new(),
        }
    }

    /// Add a field built elsewhere (e.g. a multi-level hierarchy)
    pub fn with_field(mut self, field: AmrField) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    /// Add a single-level field covering the domain with `cells` cells,
    /// each set to `f(cell center)`
    pub fn with_uniform_field<F>(self, name: &str, cells: [usize; 3], f: F) -> Self
    where
        F: Fn([f64; 3]) -> f64,
    {
        let field = self.uniform_field(name, cells, f);
        self.with_field(field)
    }

    fn uniform_field<F>(&self, name: &str, cells: [usize; 3], f: F) -> AmrField
    where
        F: Fn([f64; 3]) -> f64,
    {
        let dim = self.domain.dim;
        let width = self.domain.width();
        let mut n = [1usize; 3];
        let mut dx = [1.0; 3];
        for a in 0..dim {
            n[a] = cells[a].max(1);
            dx[a] = width[a] / n[a] as f64;
        }

        let mut patch = Patch::new(0, self.domain.lo, dx, Array3::zeros((n[0], n[1], n[2])));
        for ((i, j, k), value) in patch.data.indexed_iter_mut() {
            let center = [
                self.domain.lo[0] + (i as f64 + 0.5) * dx[0],
                self.domain.lo[1] + (j as f64 + 0.5) * dx[1],
                self.domain.lo[2] + (k as f64 + 0.5) * dx[2],
            ];
            *value = f(center);
        }

        AmrField::new(name, dim, vec![patch])
    }
}

impl Dataset for MemoryDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &DomainBox {
        &self.domain
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    fn field(&self, name: &str) -> Result<AmrField> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .ok_or_else(|| Error::FieldNotFound {
                field: name.to_string(),
                available: self.field_names(),
            })
    }
}
