use crate::error::{ConversionError, Result};

/// Map a longitude in `[0, 360)` onto `(-180, 180]`.
///
/// # Examples
/// ```
/// use cds_psdm_weather::utils::normalize_longitude;
///
/// assert_eq!(normalize_longitude(350.0), -10.0);
/// assert_eq!(normalize_longitude(7.5), 7.5);
/// ```
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

/// Validate WGS84 coordinate bounds
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ConversionError::InputFile(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ConversionError::InputFile(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    Ok(())
}

/// Compare two coordinate axes element-wise within `tolerance`
pub fn axes_match(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}
