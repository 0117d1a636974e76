use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, Result};
use crate::utils::constants::AXIS_TOLERANCE;
use crate::utils::coordinates::{normalize_longitude, validate_coordinates};

/// A grid point of the PSDM `coordinate` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(id: i32, latitude: f64, longitude: f64) -> Result<Self> {
        let longitude = normalize_longitude(longitude);
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            id,
            latitude,
            longitude,
        })
    }

    /// Point in (x, y) order as PostGIS expects it.
    pub fn xy(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }

    /// Ids are grid positions, so an id already stored elsewhere means the
    /// database holds a different grid.
    pub fn ensure_same_location(&self, stored_latitude: f64, stored_longitude: f64) -> Result<()> {
        let same = (self.latitude - stored_latitude).abs() <= AXIS_TOLERANCE
            && (self.longitude - normalize_longitude(stored_longitude)).abs() <= AXIS_TOLERANCE;
        if same {
            return Ok(());
        }

        Err(ConversionError::CoordinateConflict {
            id: self.id,
            stored_latitude,
            stored_longitude,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// Coordinates of a lat/lon grid with ids assigned latitude-major from 0.
#[derive(Debug, Clone)]
pub struct CoordinateGrid {
    coordinates: Vec<Coordinate>,
}

impl CoordinateGrid {
    pub fn from_axes(latitudes: &[f64], longitudes: &[f64]) -> Result<Self> {
        let cells = latitudes.len() * longitudes.len();
        if i32::try_from(cells).is_err() {
            return Err(ConversionError::InputFile(format!(
                "Grid of {} cells exceeds the coordinate id range",
                cells
            )));
        }

        let mut coordinates = Vec::with_capacity(cells);
        for (lat_idx, lat) in latitudes.iter().enumerate() {
            for (lon_idx, lon) in longitudes.iter().enumerate() {
                let id = (lat_idx * longitudes.len() + lon_idx) as i32;
                coordinates.push(Coordinate::new(id, *lat, *lon)?);
            }
        }

        Ok(Self { coordinates })
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}
