use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::{ConversionError, Result};

/// Shared time, latitude and longitude axes of a CDS grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    pub times: Vec<DateTime<Utc>>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl GridAxes {
    pub fn new(times: Vec<DateTime<Utc>>, latitudes: Vec<f64>, longitudes: Vec<f64>) -> Self {
        Self {
            times,
            latitudes,
            longitudes,
        }
    }

    /// Expected variable shape: time × latitude × longitude
    pub fn shape(&self) -> Vec<usize> {
        vec![self.times.len(), self.latitudes.len(), self.longitudes.len()]
    }

    pub fn cell_count(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    pub fn record_count(&self) -> usize {
        self.times.len() * self.cell_count()
    }
}

/// One gridded variable, stored row-major. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    name: String,
    shape: Vec<usize>,
    values: Vec<Option<f64>>,
}

impl GridField {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, values: Vec<Option<f64>>) -> Result<Self> {
        let name = name.into();
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(ConversionError::InputFile(format!(
                "Variable '{}' has {} values but shape {:?} needs {}",
                name,
                values.len(),
                shape,
                expected
            )));
        }

        Ok(Self {
            name,
            shape,
            values,
        })
    }

    /// Build a field from dense values, treating NaN as missing.
    pub fn from_dense(name: impl Into<String>, shape: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        let values = values
            .into_iter()
            .map(|v| if v.is_nan() { None } else { Some(v) })
            .collect();
        Self::new(name, shape, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Value at (time, lat, lon). The field must be three-dimensional.
    pub fn get(&self, time_idx: usize, lat_idx: usize, lon_idx: usize) -> Option<f64> {
        let (n_lat, n_lon) = (self.shape[1], self.shape[2]);
        let idx = time_idx * n_lat * n_lon + lat_idx * n_lon + lon_idx;
        self.values.get(idx).copied().flatten()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Axes and fields read from one netCDF file.
#[derive(Debug, Clone)]
pub struct SourceGrid {
    pub source: String,
    pub axes: GridAxes,
    pub fields: HashMap<String, GridField>,
}

impl SourceGrid {
    pub fn new(source: impl Into<String>, axes: GridAxes) -> Self {
        Self {
            source: source.into(),
            axes,
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, field: GridField) -> Self {
        self.fields.insert(key.to_string(), field);
        self
    }

    pub fn take_field(&mut self, key: &str) -> Result<GridField> {
        self.fields
            .remove(key)
            .ok_or_else(|| ConversionError::MissingVariable {
                name: key.to_string(),
                file: self.source.clone(),
            })
    }
}

/// Accumulated radiation fields, J/m² over the accumulation interval.
#[derive(Debug, Clone)]
pub struct AccumulatedFields {
    pub ssrd: GridField,
    pub fdir: GridField,
}

/// Instantaneous fields: 2 m temperature and 100 m wind components.
#[derive(Debug, Clone)]
pub struct InstantaneousFields {
    pub t2m: GridField,
    pub u100: GridField,
    pub v100: GridField,
}
