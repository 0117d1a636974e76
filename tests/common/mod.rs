//! Synthesises CDS-shaped netCDF inputs for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const LATITUDES: [f64; 2] = [51.5, 51.25];
pub const LONGITUDES: [f64; 3] = [7.0, 7.25, 7.5];

/// 2024-06-01T00:00:00Z
pub const START_EPOCH_SECS: i64 = 1_717_200_000;

/// fdir of 3600 J/m² is 1.0 W/m² direct over one hour.
pub const FDIR_VALUE: f64 = 3600.0;
/// ssrd of 10800 J/m² leaves 2.0 W/m² diffuse.
pub const SSRD_VALUE: f64 = 10800.0;

/// Packing used for `t2m` when [`FileStyle::packed_t2m`] is set.
pub const T2M_SCALE: f64 = 0.01;
pub const T2M_OFFSET: f64 = 280.0;
pub const T2M_FILL: i16 = -32767;

pub struct GridSpec {
    pub time_steps: usize,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl GridSpec {
    pub fn new(time_steps: usize) -> Self {
        Self {
            time_steps,
            latitudes: LATITUDES.to_vec(),
            longitudes: LONGITUDES.to_vec(),
        }
    }

    pub fn with_latitudes(mut self, latitudes: &[f64]) -> Self {
        self.latitudes = latitudes.to_vec();
        self
    }

    pub fn with_longitudes(mut self, longitudes: &[f64]) -> Self {
        self.longitudes = longitudes.to_vec();
        self
    }

    pub fn cells(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    fn len(&self) -> usize {
        self.time_steps * self.cells()
    }
}

/// Naming and encoding choices seen across CDS download vintages.
#[derive(Clone, Copy)]
pub struct FileStyle {
    pub time: &'static str,
    pub latitude: &'static str,
    pub longitude: &'static str,
    pub t2m: &'static str,
    pub u100: &'static str,
    pub v100: &'static str,
    /// Prefix every field with a length-1 ensemble `number` dimension.
    pub ensemble_member: bool,
    /// Store `t2m` as packed shorts with the first cell set to `_FillValue`.
    pub packed_t2m: bool,
}

impl Default for FileStyle {
    fn default() -> Self {
        Self {
            time: "valid_time",
            latitude: "latitude",
            longitude: "longitude",
            t2m: "t2m",
            u100: "u100",
            v100: "v100",
            ensemble_member: false,
            packed_t2m: false,
        }
    }
}

impl FileStyle {
    /// Pre-2024 CDS naming: `time`, `lat`, `lon`, `2t`, `100u`, `100v`.
    pub fn legacy_names() -> Self {
        Self {
            time: "time",
            latitude: "lat",
            longitude: "lon",
            t2m: "2t",
            u100: "100u",
            v100: "100v",
            ..Self::default()
        }
    }

    fn field_dims(&self) -> Vec<&'static str> {
        let mut dims = Vec::with_capacity(4);
        if self.ensemble_member {
            dims.push("number");
        }
        dims.extend([self.time, self.latitude, self.longitude]);
        dims
    }
}

fn write_axes(
    file: &mut netcdf::FileMut,
    grid: &GridSpec,
    style: &FileStyle,
) -> Result<(), netcdf::Error> {
    file.add_attribute("Conventions", "CF-1.7")?;
    if style.ensemble_member {
        file.add_dimension("number", 1)?;
    }
    file.add_dimension(style.time, grid.time_steps)?;
    file.add_dimension(style.latitude, grid.latitudes.len())?;
    file.add_dimension(style.longitude, grid.longitudes.len())?;

    let times: Vec<i64> = (0..grid.time_steps as i64)
        .map(|t| START_EPOCH_SECS + t * 3600)
        .collect();
    let mut time_var = file.add_variable::<i64>(style.time, &[style.time])?;
    time_var.put_attribute("units", "seconds since 1970-01-01")?;
    time_var.put_attribute("calendar", "proleptic_gregorian")?;
    time_var.put_values(&times, ..)?;

    let mut lat_var = file.add_variable::<f64>(style.latitude, &[style.latitude])?;
    lat_var.put_attribute("units", "degrees_north")?;
    lat_var.put_values(&grid.latitudes, ..)?;

    let mut lon_var = file.add_variable::<f64>(style.longitude, &[style.longitude])?;
    lon_var.put_attribute("units", "degrees_east")?;
    lon_var.put_values(&grid.longitudes, ..)?;

    Ok(())
}

fn write_field(
    file: &mut netcdf::FileMut,
    style: &FileStyle,
    name: &str,
    units: &str,
    values: &[f64],
) -> Result<(), netcdf::Error> {
    let mut var = file.add_variable::<f64>(name, &style.field_dims())?;
    var.put_attribute("units", units)?;
    var.put_values(values, ..)?;
    Ok(())
}

fn write_packed_t2m(
    file: &mut netcdf::FileMut,
    style: &FileStyle,
    grid: &GridSpec,
) -> Result<(), netcdf::Error> {
    // Cell i holds 280 + i * 0.1 K, cell 0 is missing
    let packed: Vec<i16> = (0..grid.len())
        .map(|i| if i == 0 { T2M_FILL } else { (i * 10) as i16 })
        .collect();

    let mut var = file.add_variable::<i16>(style.t2m, &style.field_dims())?;
    var.put_attribute("units", "K")?;
    var.put_attribute("_FillValue", T2M_FILL)?;
    var.put_attribute("scale_factor", T2M_SCALE)?;
    var.put_attribute("add_offset", T2M_OFFSET)?;
    var.put_values(&packed, ..)?;
    Ok(())
}

/// Temperature rising by 0.1 K per cell, so every record is distinguishable.
fn temperatures(grid: &GridSpec) -> Vec<f64> {
    (0..grid.len()).map(|i| 280.0 + i as f64 * 0.1).collect()
}

fn write_accumulated(
    file: &mut netcdf::FileMut,
    grid: &GridSpec,
    style: &FileStyle,
) -> Result<(), netcdf::Error> {
    write_field(file, style, "ssrd", "J m**-2", &vec![SSRD_VALUE; grid.len()])?;
    write_field(file, style, "fdir", "J m**-2", &vec![FDIR_VALUE; grid.len()])
}

fn write_instantaneous(
    file: &mut netcdf::FileMut,
    grid: &GridSpec,
    style: &FileStyle,
) -> Result<(), netcdf::Error> {
    if style.packed_t2m {
        write_packed_t2m(file, style, grid)?;
    } else {
        write_field(file, style, style.t2m, "K", &temperatures(grid))?;
    }
    write_field(file, style, style.u100, "m s**-1", &vec![4.5; grid.len()])?;
    write_field(file, style, style.v100, "m s**-1", &vec![-1.5; grid.len()])
}

pub fn write_accum_file(
    path: &Path,
    grid: &GridSpec,
    style: &FileStyle,
) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    write_axes(&mut file, grid, style)?;
    write_accumulated(&mut file, grid, style)
}

pub fn write_instant_file(
    path: &Path,
    grid: &GridSpec,
    style: &FileStyle,
) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    write_axes(&mut file, grid, style)?;
    write_instantaneous(&mut file, grid, style)
}

pub fn write_combined_file(path: &Path, grid: &GridSpec) -> Result<(), netcdf::Error> {
    let style = FileStyle::default();
    let mut file = netcdf::create(path)?;
    write_axes(&mut file, grid, &style)?;
    write_accumulated(&mut file, grid, &style)?;
    write_instantaneous(&mut file, grid, &style)
}

/// Write `<base>_accum.nc` and `<base>_instant.nc` into `dir`.
pub fn write_split_pair(
    dir: &Path,
    base: &str,
    accum: &GridSpec,
    instant: &GridSpec,
) -> Result<(PathBuf, PathBuf), netcdf::Error> {
    let style = FileStyle::default();
    write_styled_pair(dir, base, accum, instant, &style, &style)
}

/// Like [`write_split_pair`] with a style per file.
pub fn write_styled_pair(
    dir: &Path,
    base: &str,
    accum: &GridSpec,
    instant: &GridSpec,
    accum_style: &FileStyle,
    instant_style: &FileStyle,
) -> Result<(PathBuf, PathBuf), netcdf::Error> {
    let accum_path = dir.join(format!("{}_accum.nc", base));
    let instant_path = dir.join(format!("{}_instant.nc", base));
    write_accum_file(&accum_path, accum, accum_style)?;
    write_instant_file(&instant_path, instant, instant_style)?;
    Ok((accum_path, instant_path))
}

/// Minimal config pointing at `input_dir`.
pub fn config_yaml(input_dir: &Path, base: &str) -> String {
    format!(
        "db_user: postgres\n\
         db_password: secret\n\
         db_port: 5432\n\
         db_name: weather\n\
         input_dir: {}\n\
         file_name_base: {}\n",
        input_dir.display(),
        base
    )
}
