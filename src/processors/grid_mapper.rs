use crate::error::{ConversionError, Result};
use crate::models::{CoordinateGrid, WeatherRecord};
use crate::processors::AlignedGrid;
use crate::utils::units::{diffuse_irradiance, direct_irradiance};

/// Joins accumulated and instantaneous fields into PSDM weather records.
#[derive(Clone, Copy)]
pub struct GridMapper<'a> {
    grid: &'a AlignedGrid,
    coordinates: &'a CoordinateGrid,
    interval_secs: u32,
}

impl<'a> GridMapper<'a> {
    pub fn new(
        grid: &'a AlignedGrid,
        coordinates: &'a CoordinateGrid,
        interval_secs: u32,
    ) -> Result<Self> {
        if coordinates.len() != grid.axes.cell_count() {
            return Err(ConversionError::ShapeMismatch {
                variable: "coordinates".to_string(),
                expected: vec![grid.axes.cell_count()],
                found: vec![coordinates.len()],
            });
        }
        if interval_secs == 0 {
            return Err(ConversionError::Config(
                "accumulation interval must be positive".to_string(),
            ));
        }

        Ok(Self {
            grid,
            coordinates,
            interval_secs,
        })
    }

    pub fn time_steps(&self) -> usize {
        self.grid.axes.times.len()
    }

    pub fn record_count(&self) -> usize {
        self.grid.axes.record_count()
    }

    /// Record for one cell. Indices must be within the grid.
    pub fn record_at(&self, time_idx: usize, lat_idx: usize, lon_idx: usize) -> WeatherRecord {
        let n_lon = self.grid.axes.longitudes.len();
        let coordinate = &self.coordinates.coordinates()[lat_idx * n_lon + lon_idx];
        let accumulated = &self.grid.accumulated;
        let instantaneous = &self.grid.instantaneous;

        let ssrd = accumulated.ssrd.get(time_idx, lat_idx, lon_idx);
        let fdir = accumulated.fdir.get(time_idx, lat_idx, lon_idx);

        WeatherRecord {
            time: self.grid.axes.times[time_idx],
            coordinate_id: coordinate.id,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            diffuse_irradiance: diffuse_irradiance(ssrd, fdir, self.interval_secs),
            direct_irradiance: direct_irradiance(fdir, self.interval_secs),
            temperature: instantaneous.t2m.get(time_idx, lat_idx, lon_idx),
            wind_velocity_u: instantaneous.u100.get(time_idx, lat_idx, lon_idx),
            wind_velocity_v: instantaneous.v100.get(time_idx, lat_idx, lon_idx),
        }
    }

    /// All records of one time step, latitude-major.
    pub fn records_for_time(&self, time_idx: usize) -> impl Iterator<Item = WeatherRecord> + 'a {
        let mapper = *self;
        let n_lat = self.grid.axes.latitudes.len();
        let n_lon = self.grid.axes.longitudes.len();
        (0..n_lat).flat_map(move |lat_idx| {
            (0..n_lon).map(move |lon_idx| mapper.record_at(time_idx, lat_idx, lon_idx))
        })
    }

    /// Every record of the grid, time-major.
    pub fn records(&self) -> impl Iterator<Item = WeatherRecord> + 'a {
        let mapper = *self;
        (0..self.time_steps()).flat_map(move |t| mapper.records_for_time(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccumulatedFields, GridAxes, GridField, InstantaneousFields};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn dense(name: &str, shape: &[usize], values: Vec<f64>) -> GridField {
        GridField::from_dense(name, shape.to_vec(), values).unwrap()
    }

    fn grid_2x1x2() -> AlignedGrid {
        let shape = [2, 1, 2];
        let times = vec![
            Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ];
        AlignedGrid {
            axes: GridAxes::new(times, vec![51.5], vec![7.0, 7.25]),
            accumulated: AccumulatedFields {
                ssrd: dense("ssrd", &shape, vec![7200.0, 3600.0, f64::NAN, 0.0]),
                fdir: dense("fdir", &shape, vec![3600.0, 0.0, 1800.0, 0.0]),
            },
            instantaneous: InstantaneousFields {
                t2m: dense("t2m", &shape, vec![290.0, 291.0, 292.0, 293.0]),
                u100: dense("u100", &shape, vec![1.0, 2.0, 3.0, 4.0]),
                v100: dense("v100", &shape, vec![-1.0, -2.0, f64::NAN, -4.0]),
            },
        }
    }

    #[test]
    fn test_one_record_per_cell_and_step() {
        let grid = grid_2x1x2();
        let coords = CoordinateGrid::from_axes(&grid.axes.latitudes, &grid.axes.longitudes).unwrap();
        let mapper = GridMapper::new(&grid, &coords, 3600).unwrap();

        let records: Vec<WeatherRecord> = mapper.records().collect();
        assert_eq!(records.len(), 4);
        assert_eq!(mapper.record_count(), 4);

        let keys: Vec<(u32, i32)> = records
            .iter()
            .map(|r| (chrono::Timelike::hour(&r.time), r.coordinate_id))
            .collect();
        assert_eq!(keys, vec![(11, 0), (11, 1), (12, 0), (12, 1)]);
    }

    #[test]
    fn test_unit_conversion_and_renaming() {
        let grid = grid_2x1x2();
        let coords = CoordinateGrid::from_axes(&grid.axes.latitudes, &grid.axes.longitudes).unwrap();
        let mapper = GridMapper::new(&grid, &coords, 3600).unwrap();

        let record = mapper.record_at(0, 0, 0);
        assert_eq!(record.direct_irradiance, Some(1.0));
        assert_eq!(record.diffuse_irradiance, Some(1.0));
        assert_eq!(record.temperature, Some(290.0));
        assert_eq!(record.wind_velocity_u, Some(1.0));
        assert_eq!(record.wind_velocity_v, Some(-1.0));
        assert_eq!(record.latitude, 51.5);
        assert_eq!(record.longitude, 7.0);
    }

    #[test]
    fn test_missing_cells_become_null() {
        let grid = grid_2x1x2();
        let coords = CoordinateGrid::from_axes(&grid.axes.latitudes, &grid.axes.longitudes).unwrap();
        let mapper = GridMapper::new(&grid, &coords, 3600).unwrap();

        let record = mapper.record_at(1, 0, 0);
        assert_eq!(record.diffuse_irradiance, None);
        assert_eq!(record.direct_irradiance, Some(0.5));
        assert_eq!(record.wind_velocity_v, None);
        assert_eq!(record.missing_fields(), vec!["diffuse_irradiance", "wind_velocity_v"]);
    }

    #[test]
    fn test_custom_accumulation_interval() {
        let grid = grid_2x1x2();
        let coords = CoordinateGrid::from_axes(&grid.axes.latitudes, &grid.axes.longitudes).unwrap();
        let mapper = GridMapper::new(&grid, &coords, 1800).unwrap();

        assert_eq!(mapper.record_at(0, 0, 0).direct_irradiance, Some(2.0));
        assert!(GridMapper::new(&grid, &coords, 0).is_err());
    }

    #[test]
    fn test_coordinate_count_must_match_grid() {
        let grid = grid_2x1x2();
        let coords = CoordinateGrid::from_axes(&[51.5], &[7.0]).unwrap();
        assert!(GridMapper::new(&grid, &coords, 3600).is_err());
    }
}
