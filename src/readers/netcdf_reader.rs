use std::path::Path;
use tracing::{debug, info};

use crate::error::{ConversionError, Result};
use crate::models::{GridAxes, GridField, SourceGrid};
use crate::utils::constants::{
    FDIR_VARIABLES, LATITUDE_VARIABLES, LONGITUDE_VARIABLES, SSRD_VARIABLES, T2M_VARIABLES,
    TIME_VARIABLES, U100_VARIABLES, V100_VARIABLES,
};
use crate::utils::time::TimeUnits;

/// Canonical field key and the CDS names it may appear under.
pub type VariableSpec = (&'static str, &'static [&'static str]);

pub const ACCUMULATED_VARIABLES: &[VariableSpec] =
    &[("ssrd", SSRD_VARIABLES), ("fdir", FDIR_VARIABLES)];

pub const INSTANTANEOUS_VARIABLES: &[VariableSpec] = &[
    ("t2m", T2M_VARIABLES),
    ("u100", U100_VARIABLES),
    ("v100", V100_VARIABLES),
];

/// Values at or above this are netCDF default fill values for floats.
const DEFAULT_FILL_THRESHOLD: f64 = 9.9e36;

/// Reads CDS netCDF4 files into [`SourceGrid`]s.
pub struct NetCdfReader;

impl NetCdfReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the grid axes and the requested variables from `path`.
    pub fn read(&self, path: &Path, variables: &[VariableSpec]) -> Result<SourceGrid> {
        if !path.is_file() {
            return Err(ConversionError::InputFile(format!(
                "Input file {} not found",
                path.display()
            )));
        }

        let source = path.display().to_string();
        let file = netcdf::open(path)?;

        let dimensions: Vec<String> = file
            .dimensions()
            .map(|d| format!("{}={}", d.name(), d.len()))
            .collect();
        info!(file = %source, dimensions = ?dimensions, "Opened netCDF file");

        let axes = self.read_axes(&file, &source)?;
        let mut grid = SourceGrid::new(source.clone(), axes);

        for (key, names) in variables {
            let field = self.read_field(&file, key, names, &source)?;
            debug!(
                file = %source,
                variable = field.name(),
                shape = ?field.shape(),
                missing = field.missing_count(),
                "Read variable"
            );
            grid = grid.with_field(key, field);
        }

        Ok(grid)
    }

    fn read_axes(&self, file: &netcdf::File, source: &str) -> Result<GridAxes> {
        let latitudes = read_coord(file, LATITUDE_VARIABLES, source)?;
        let longitudes = read_coord(file, LONGITUDE_VARIABLES, source)?;

        let time_var = find_variable(file, TIME_VARIABLES, source)?;
        let units = attr_string(&time_var, "units").ok_or_else(|| {
            ConversionError::TimeUnits(format!("<missing units on '{}'>", time_var.name()))
        })?;
        let raw_times: Vec<f64> = time_var.get_values(..)?;
        let times = TimeUnits::parse(&units)?.decode_all(&raw_times)?;

        Ok(GridAxes::new(times, latitudes, longitudes))
    }

    fn read_field(
        &self,
        file: &netcdf::File,
        key: &str,
        names: &[&str],
        source: &str,
    ) -> Result<GridField> {
        let var = find_variable(file, names, source).map_err(|_| {
            ConversionError::MissingVariable {
                name: key.to_string(),
                file: source.to_string(),
            }
        })?;

        // Leading length-1 axes such as the ensemble `number`
        let mut shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        while shape.len() > 3 && shape[0] == 1 {
            shape.remove(0);
        }

        let packing = Packing::from_variable(&var);
        let raw: Vec<f64> = var.get_values(..)?;
        let values = raw.into_iter().map(|v| packing.unpack(v)).collect();

        GridField::new(var.name(), shape, values)
    }
}

impl Default for NetCdfReader {
    fn default() -> Self {
        Self::new()
    }
}

/// CF packing and missing-value attributes of one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            missing_value: None,
        }
    }
}

impl Packing {
    fn from_variable(var: &netcdf::Variable) -> Self {
        Self {
            scale_factor: attr_f64(var, "scale_factor").unwrap_or(1.0),
            add_offset: attr_f64(var, "add_offset").unwrap_or(0.0),
            fill_value: attr_f64(var, "_FillValue"),
            missing_value: attr_f64(var, "missing_value"),
        }
    }

    /// Raw stored value to physical value, `None` for missing cells.
    pub fn unpack(&self, raw: f64) -> Option<f64> {
        if raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return None;
        }
        if self.fill_value.is_none() && raw.abs() >= DEFAULT_FILL_THRESHOLD {
            return None;
        }
        Some(raw * self.scale_factor + self.add_offset)
    }
}

fn find_variable<'f>(
    file: &'f netcdf::File,
    names: &[&str],
    source: &str,
) -> Result<netcdf::Variable<'f>> {
    names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| ConversionError::MissingVariable {
            name: names.join(" or "),
            file: source.to_string(),
        })
}

fn read_coord(file: &netcdf::File, names: &[&str], source: &str) -> Result<Vec<f64>> {
    let var = find_variable(file, names, source)?;
    let data: Vec<f64> = var.get_values(..)?;
    Ok(data)
}

fn attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Double(d) => Some(d),
            netcdf::AttributeValue::Float(f) => Some(f as f64),
            netcdf::AttributeValue::Short(s) => Some(s as f64),
            netcdf::AttributeValue::Int(i) => Some(i as f64),
            netcdf::AttributeValue::Longlong(l) => Some(l as f64),
            netcdf::AttributeValue::Schar(c) => Some(c as f64),
            _ => None,
        })
}

fn attr_string(var: &netcdf::Variable, name: &str) -> Option<String> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Str(s) => Some(s),
            _ => None,
        })
}
