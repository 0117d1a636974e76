use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record field to PSDM `weathervalue` column, ICON naming.
pub const PSDM_COLUMNS: [(&str, &str); 7] = [
    ("time", "time"),
    ("coordinate_id", "coordinate_id"),
    ("diffuse_irradiance", "aswdifd_s"),
    ("direct_irradiance", "aswdir_s"),
    ("temperature", "t2m"),
    ("wind_velocity_u", "u131m"),
    ("wind_velocity_v", "v131m"),
];

/// One grid cell at one time step in PSDM terms.
///
/// Irradiances are W/m² averaged over the accumulation interval, temperature
/// is 2 m air temperature in Kelvin, wind components are m/s at hub height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub time: DateTime<Utc>,
    pub coordinate_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub diffuse_irradiance: Option<f64>,
    pub direct_irradiance: Option<f64>,
    pub temperature: Option<f64>,
    pub wind_velocity_u: Option<f64>,
    pub wind_velocity_v: Option<f64>,
}

impl WeatherRecord {
    /// Natural key of the `weathervalue` table
    pub fn key(&self) -> (DateTime<Utc>, i32) {
        (self.time, self.coordinate_id)
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.diffuse_irradiance.is_none() {
            missing.push("diffuse_irradiance");
        }
        if self.direct_irradiance.is_none() {
            missing.push("direct_irradiance");
        }
        if self.temperature.is_none() {
            missing.push("temperature");
        }
        if self.wind_velocity_u.is_none() {
            missing.push("wind_velocity_u");
        }
        if self.wind_velocity_v.is_none() {
            missing.push("wind_velocity_v");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
