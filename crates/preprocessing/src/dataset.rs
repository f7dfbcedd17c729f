//! Aligned output arrays and their tensor view.

use std::borrow::Cow;

use grid_processor::SurfaceWindow;
use ocean_common::GridCell;
use serde::Serialize;

use crate::error::{PreprocessError, Result};

/// Everything one accepted profile contributes to the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow {
    pub cell: GridCell,
    pub salinity: Vec<f64>,
    pub temperature: Vec<f64>,
    pub ssh: SurfaceWindow,
    pub sst: SurfaceWindow,
}

/// Parallel arrays indexed by profile.
///
/// Row `i` of every array comes from the same source profile. Values are
/// stored flat and row-major as `f32`; a `Dataset` can only be built
/// through [`DatasetBuilder`] and is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pressure: Vec<f32>,
    window_size: usize,
    info: Vec<GridCell>,
    salinity: Vec<f32>,
    temperature: Vec<f32>,
    maps: Vec<f32>,
}

impl Dataset {
    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// The shared pressure grid.
    pub fn pressure(&self) -> &[f32] {
        &self.pressure
    }

    pub fn levels(&self) -> usize {
        self.pressure.len()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn info(&self) -> &[GridCell] {
        &self.info
    }

    pub fn salinity(&self, index: usize) -> &[f32] {
        let p = self.levels();
        &self.salinity[index * p..(index + 1) * p]
    }

    pub fn temperature(&self, index: usize) -> &[f32] {
        let p = self.levels();
        &self.temperature[index * p..(index + 1) * p]
    }

    /// SSH window of profile `index`, row-major.
    pub fn ssh(&self, index: usize) -> &[f32] {
        let cell = self.window_size * self.window_size;
        let start = index * 2 * cell;
        &self.maps[start..start + cell]
    }

    /// SST window of profile `index`, row-major.
    pub fn sst(&self, index: usize) -> &[f32] {
        let cell = self.window_size * self.window_size;
        let start = index * 2 * cell + cell;
        &self.maps[start..start + cell]
    }

    /// Borrow the dataset as named tensors.
    pub fn to_tensors(&self) -> TensorBundle<'_> {
        let n = self.len();
        let p = self.levels();
        let w = self.window_size;

        let info: Vec<f32> = self.info.iter().flat_map(GridCell::to_row).collect();

        TensorBundle {
            info: Tensor::new("info", vec![n, 3], &["profile", "field"], Cow::Owned(info)),
            pressure: Tensor::new("pressure", vec![p], &["level"], Cow::Borrowed(&self.pressure)),
            salinity: Tensor::new(
                "salinity",
                vec![n, p],
                &["profile", "level"],
                Cow::Borrowed(&self.salinity),
            ),
            temperature: Tensor::new(
                "temperature",
                vec![n, p],
                &["profile", "level"],
                Cow::Borrowed(&self.temperature),
            ),
            maps: Tensor::new(
                "maps",
                vec![n, 2, w, w],
                &["profile", "variable", "lat", "lon"],
                Cow::Borrowed(&self.maps),
            ),
        }
    }
}

/// Accumulates rows into a [`Dataset`], checking every row's shape.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl DatasetBuilder {
    /// Builder for rows on the given pressure levels and window size.
    pub fn new(pressure: &[f64], window_size: usize) -> Self {
        Self {
            dataset: Dataset {
                pressure: pressure.iter().map(|&p| p as f32).collect(),
                window_size,
                info: Vec::new(),
                salinity: Vec::new(),
                temperature: Vec::new(),
                maps: Vec::new(),
            },
        }
    }

    /// Append one row.
    pub fn push(&mut self, row: ProfileRow) -> Result<()> {
        let levels = self.dataset.levels();
        let window = self.dataset.window_size;

        if row.salinity.len() != levels || row.temperature.len() != levels {
            return Err(PreprocessError::ShapeMismatch(format!(
                "profile has {}/{} levels, dataset has {}",
                row.salinity.len(),
                row.temperature.len(),
                levels
            )));
        }
        for map in [&row.ssh, &row.sst] {
            if map.size != window || map.values.len() != window * window {
                return Err(PreprocessError::ShapeMismatch(format!(
                    "{} window is {}x{}, dataset expects {}x{}",
                    map.kind, map.size, map.size, window, window
                )));
            }
        }

        let ds = &mut self.dataset;
        ds.info.push(row.cell);
        ds.salinity.extend(row.salinity.iter().map(|&v| v as f32));
        ds.temperature.extend(row.temperature.iter().map(|&v| v as f32));
        ds.maps.extend_from_slice(&row.ssh.values);
        ds.maps.extend_from_slice(&row.sst.values);
        Ok(())
    }

    /// Append rows in order.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = ProfileRow>) -> Result<()> {
        for row in rows {
            self.push(row)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn finish(self) -> Dataset {
        self.dataset
    }
}

/// One named array with its shape and axis names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tensor<'a> {
    pub name: &'static str,
    pub shape: Vec<usize>,
    pub axes: Vec<&'static str>,
    #[serde(skip)]
    pub data: Cow<'a, [f32]>,
}

impl<'a> Tensor<'a> {
    fn new(
        name: &'static str,
        shape: Vec<usize>,
        axes: &[&'static str],
        data: Cow<'a, [f32]>,
    ) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self {
            name,
            shape,
            axes: axes.to_vec(),
            data,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The dataset as the arrays handed to model training.
///
/// - `info`: `[N, 3]` rows of `[day_index, grid_lat, grid_lon]`
/// - `pressure`: `[P]`
/// - `salinity`, `temperature`: `[N, P]`
/// - `maps`: `[N, 2, W, W]` with SSH before SST
#[derive(Debug, Clone, PartialEq)]
pub struct TensorBundle<'a> {
    pub info: Tensor<'a>,
    pub pressure: Tensor<'a>,
    pub salinity: Tensor<'a>,
    pub temperature: Tensor<'a>,
    pub maps: Tensor<'a>,
}

impl<'a> TensorBundle<'a> {
    /// All tensors in output order.
    pub fn tensors(&self) -> [&Tensor<'a>; 5] {
        [
            &self.info,
            &self.pressure,
            &self.salinity,
            &self.temperature,
            &self.maps,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcdf_parser::MapKind;

    fn window(kind: MapKind, size: usize, value: f32) -> SurfaceWindow {
        SurfaceWindow {
            kind,
            size,
            values: vec![value; size * size],
        }
    }

    fn row(day: i64, value: f32) -> ProfileRow {
        ProfileRow {
            cell: GridCell {
                day_index: day,
                grid_lat: 10.25,
                grid_lon: 140.75,
            },
            salinity: vec![35.0, 34.5, 34.0],
            temperature: vec![20.0, 10.0, 4.0],
            ssh: window(MapKind::Ssh, 2, value),
            sst: window(MapKind::Sst, 2, value + 100.0),
        }
    }

    #[test]
    fn test_rows_stay_aligned() {
        let mut builder = DatasetBuilder::new(&[0.0, 500.0, 1000.0], 2);
        builder.push(row(1, 1.0)).unwrap();
        builder.push(row(2, 2.0)).unwrap();
        let dataset = builder.finish();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.info()[1].day_index, 2);
        assert_eq!(dataset.salinity(1), &[35.0, 34.5, 34.0]);
        assert_eq!(dataset.ssh(1), &[2.0; 4]);
        assert_eq!(dataset.sst(1), &[102.0; 4]);
    }

    #[test]
    fn test_shape_checked() {
        let mut builder = DatasetBuilder::new(&[0.0, 1000.0], 2);
        assert!(matches!(
            builder.push(row(1, 1.0)),
            Err(PreprocessError::ShapeMismatch(_))
        ));

        let mut builder = DatasetBuilder::new(&[0.0, 500.0, 1000.0], 3);
        assert!(builder.push(row(1, 1.0)).is_err());
        assert!(builder.is_empty());
    }

    #[test]
    fn test_tensor_shapes() {
        let mut builder = DatasetBuilder::new(&[0.0, 500.0, 1000.0], 2);
        builder.extend([row(1, 1.0), row(2, 2.0), row(3, 3.0)]).unwrap();
        let dataset = builder.finish();
        let tensors = dataset.to_tensors();

        assert_eq!(tensors.info.shape, vec![3, 3]);
        assert_eq!(tensors.pressure.shape, vec![3]);
        assert_eq!(tensors.salinity.shape, vec![3, 3]);
        assert_eq!(tensors.maps.shape, vec![3, 2, 2, 2]);
        assert_eq!(tensors.maps.len(), 24);
        assert_eq!(&tensors.info.data[..3], &[1.0, 10.25, 140.75]);
        for tensor in tensors.tensors() {
            assert_eq!(tensor.shape.len(), tensor.axes.len(), "{}", tensor.name);
        }
    }

    #[test]
    fn test_empty_dataset_tensors() {
        let dataset = DatasetBuilder::new(&[10.0, 20.0], 5).finish();
        let tensors = dataset.to_tensors();
        assert_eq!(tensors.maps.shape, vec![0, 2, 5, 5]);
        assert!(tensors.maps.is_empty());
    }
}
