//! 1-D profiles from unstructured cell data
//!
//! Every leaf cell of the snapshot contributes one sample; the samples are
//! ordered by one coordinate so that a line plot through them does not
//! jump back and forth.

use crate::dataset::{AmrField, Axis, Dataset};
use crate::error::{Error, Result};

/// Field values at leaf cells, sorted by one coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub time: f64,
    pub axis: Axis,
    /// Non-decreasing
    pub coord: Vec<f64>,
    pub fields: Vec<(String, Vec<f64>)>,
}

impl Ray {
    pub fn len(&self) -> usize {
        self.coord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coord.is_empty()
    }

    pub fn values(&self, field: &str) -> Option<&[f64]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v.as_slice())
    }
}

/// Extract `fields` at every leaf cell, sorted ascending by `axis`
pub fn extract_ray(dataset: &dyn Dataset, axis: Axis, fields: &[&str]) -> Result<Ray> {
    let amr: Vec<AmrField> = fields
        .iter()
        .map(|f| dataset.field(f))
        .collect::<Result<_>>()?;

    if let Some(first) = amr.first() {
        if let Some(other) = amr.iter().find(|f| !f.same_layout(first)) {
            return Err(Error::InvalidArgument(format!(
                "fields `{}` and `{}` are stored on different grids",
                first.name, other.name
            )));
        }
    }

    let leaves: Vec<_> = amr.iter().map(AmrField::leaf_cells).collect();
    let a = axis.index();
    let coord: Vec<f64> = leaves
        .first()
        .map(|cells| cells.iter().map(|c| c.center[a]).collect())
        .unwrap_or_default();

    let mut order: Vec<usize> = (0..coord.len()).collect();
    order.sort_by(|&i, &j| coord[i].total_cmp(&coord[j]));

    let fields = fields
        .iter()
        .zip(&leaves)
        .map(|(name, cells)| {
            (
                name.to_string(),
                order.iter().map(|&i| cells[i].value).collect(),
            )
        })
        .collect();
    let coord = order.iter().map(|&i| coord[i]).collect();

    Ok(Ray {
        time: dataset.time(),
        axis,
        coord,
        fields,
    })
}

/// Temperature and nuclear energy generation rate along x
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSample {
    pub time: f64,
    pub x: Vec<f64>,
    pub temperature: Vec<f64>,
    pub enuc: Vec<f64>,
}

impl ProfileSample {
    pub fn from_dataset(dataset: &dyn Dataset) -> Result<Self> {
        let ray = extract_ray(dataset, Axis::X, &["Temp", "enuc"])?;
        let temperature = ray.values("Temp").unwrap_or_default().to_vec();
        let enuc = ray.values("enuc").unwrap_or_default().to_vec();

        log::debug!(
            "profile of {}: {} cells, t = {:e} s",
            dataset.name(),
            ray.len(),
            ray.time
        );

        Ok(Self {
            time: ray.time,
            x: ray.coord,
            temperature,
            enuc,
        })
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DomainBox, MemoryDataset, Patch};
    use ndarray::Array3;

    fn shuffled_1d() -> MemoryDataset {
        // Three patches stored out of spatial order, one level
        let make = |lo: f64, base: f64| {
            let data = Array3::from_shape_fn((4, 1, 1), |(i, _, _)| base + i as f64);
            Patch::new(0, [lo, 0.0, 0.0], [1.0, 1.0, 1.0], data)
        };
        let temp = AmrField::new("Temp", 1, vec![make(8.0, 80.0), make(0.0, 0.0), make(4.0, 40.0)]);
        let enuc = AmrField::new("enuc", 1, vec![make(8.0, 8.0), make(0.0, 0.0), make(4.0, 4.0)]);
        MemoryDataset::new("det", DomainBox::new(1, [0.0; 3], [12.0, 0.0, 0.0]), 2.5)
            .with_field(temp)
            .with_field(enuc)
    }

    #[test]
    fn test_ray_is_sorted_by_coordinate() {
        let ray = extract_ray(&shuffled_1d(), Axis::X, &["Temp", "enuc"]).unwrap();
        assert_eq!(ray.len(), 12);
        assert!(ray.coord.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ray.coord[0], 0.5);
        assert_eq!(ray.coord[11], 11.5);
    }

    #[test]
    fn test_values_follow_their_coordinates() {
        let profile = ProfileSample::from_dataset(&shuffled_1d()).unwrap();
        assert_eq!(profile.time, 2.5);
        assert_eq!(profile.temperature[..5], [0.0, 1.0, 2.0, 3.0, 40.0]);
        assert_eq!(profile.enuc[4], 4.0);
        assert_eq!(profile.enuc[11], 11.0);
        assert_eq!(profile.x.len(), profile.temperature.len());
    }

    #[test]
    fn test_refined_cells_replace_coarse_ones() {
        let coarse = Patch::new(0, [0.0; 3], [2.0, 1.0, 1.0], Array3::from_elem((2, 1, 1), 1.0));
        let fine = Patch::new(1, [2.0, 0.0, 0.0], [1.0, 1.0, 1.0], Array3::from_elem((2, 1, 1), 2.0));
        let field = AmrField::new("Temp", 1, vec![coarse, fine]);
        let ds = MemoryDataset::new("amr", DomainBox::new(1, [0.0; 3], [4.0, 0.0, 0.0]), 0.0)
            .with_field(field);

        let ray = extract_ray(&ds, Axis::X, &["Temp"]).unwrap();
        assert_eq!(ray.coord, vec![1.0, 2.5, 3.5]);
        assert_eq!(ray.values("Temp").unwrap(), &[1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_dataset_gives_empty_profile() {
        let ds = MemoryDataset::new("empty", DomainBox::new(1, [0.0; 3], [1.0, 0.0, 0.0]), 0.0)
            .with_field(AmrField::new("Temp", 1, Vec::new()))
            .with_field(AmrField::new("enuc", 1, Vec::new()));
        let profile = ProfileSample::from_dataset(&ds).unwrap();
        assert!(profile.x.is_empty());
        assert!(profile.temperature.is_empty());
        assert!(profile.enuc.is_empty());
    }

    #[test]
    fn test_mismatched_layouts_are_rejected() {
        let a = AmrField::new("Temp", 1, vec![Patch::new(0, [0.0; 3], [1.0; 3], Array3::zeros((4, 1, 1)))]);
        let b = AmrField::new("enuc", 1, vec![Patch::new(0, [0.0; 3], [1.0; 3], Array3::zeros((2, 1, 1)))]);
        let ds = MemoryDataset::new("bad", DomainBox::new(1, [0.0; 3], [4.0, 0.0, 0.0]), 0.0)
            .with_field(a)
            .with_field(b);
        assert!(extract_ray(&ds, Axis::X, &["Temp", "enuc"]).is_err());
    }
}
