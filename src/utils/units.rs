/// Convert an accumulated energy density (J/m²) into the average irradiance
/// (W/m²) over an accumulation interval.
///
/// # Examples
/// ```
/// use cds_psdm_weather::utils::accumulated_to_irradiance;
///
/// assert_eq!(accumulated_to_irradiance(3600.0, 3600), 1.0);
/// ```
pub fn accumulated_to_irradiance(joules_per_m2: f64, interval_secs: u32) -> f64 {
    joules_per_m2 / interval_secs as f64
}

/// Diffuse irradiance from total downward and direct accumulations.
pub fn diffuse_irradiance(
    ssrd: Option<f64>,
    fdir: Option<f64>,
    interval_secs: u32,
) -> Option<f64> {
    match (ssrd, fdir) {
        (Some(total), Some(direct)) => {
            Some(accumulated_to_irradiance(total - direct, interval_secs))
        }
        _ => None,
    }
}

pub fn direct_irradiance(fdir: Option<f64>, interval_secs: u32) -> Option<f64> {
    fdir.map(|v| accumulated_to_irradiance(v, interval_secs))
}
