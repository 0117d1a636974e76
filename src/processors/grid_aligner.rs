use std::collections::HashSet;
use tracing::debug;

use crate::error::{ConversionError, Result};
use crate::models::{AccumulatedFields, GridAxes, GridField, InstantaneousFields, SourceGrid};
use crate::utils::constants::AXIS_TOLERANCE;
use crate::utils::coordinates::axes_match;

/// Accumulated and instantaneous fields on one shared grid.
#[derive(Debug, Clone)]
pub struct AlignedGrid {
    pub axes: GridAxes,
    pub accumulated: AccumulatedFields,
    pub instantaneous: InstantaneousFields,
}

pub struct GridAligner {
    tolerance: f64,
}

impl GridAligner {
    pub fn new() -> Self {
        Self {
            tolerance: AXIS_TOLERANCE,
        }
    }

    /// Align the fields of an `_accum.nc` / `_instant.nc` pair.
    pub fn align_split(
        &self,
        mut accumulated: SourceGrid,
        mut instantaneous: SourceGrid,
    ) -> Result<AlignedGrid> {
        self.check_axes(&accumulated, &instantaneous)?;

        let accumulated_fields = AccumulatedFields {
            ssrd: accumulated.take_field("ssrd")?,
            fdir: accumulated.take_field("fdir")?,
        };
        let instantaneous_fields = InstantaneousFields {
            t2m: instantaneous.take_field("t2m")?,
            u100: instantaneous.take_field("u100")?,
            v100: instantaneous.take_field("v100")?,
        };

        self.finish(instantaneous.axes, accumulated_fields, instantaneous_fields)
    }

    /// Align the fields of a single file holding both variable groups.
    pub fn align_combined(&self, mut grid: SourceGrid) -> Result<AlignedGrid> {
        let accumulated_fields = AccumulatedFields {
            ssrd: grid.take_field("ssrd")?,
            fdir: grid.take_field("fdir")?,
        };
        let instantaneous_fields = InstantaneousFields {
            t2m: grid.take_field("t2m")?,
            u100: grid.take_field("u100")?,
            v100: grid.take_field("v100")?,
        };

        self.finish(grid.axes, accumulated_fields, instantaneous_fields)
    }

    fn finish(
        &self,
        axes: GridAxes,
        accumulated: AccumulatedFields,
        instantaneous: InstantaneousFields,
    ) -> Result<AlignedGrid> {
        let unique_times: HashSet<_> = axes.times.iter().collect();
        if unique_times.len() != axes.times.len() {
            return Err(ConversionError::InputFile(
                "Time axis contains duplicate time steps".to_string(),
            ));
        }

        for field in [
            &accumulated.ssrd,
            &accumulated.fdir,
            &instantaneous.t2m,
            &instantaneous.u100,
            &instantaneous.v100,
        ] {
            check_shape(&axes, field)?;
        }

        debug!(shape = ?axes.shape(), "Grid aligned");

        Ok(AlignedGrid {
            axes,
            accumulated,
            instantaneous,
        })
    }

    fn check_axes(&self, accumulated: &SourceGrid, instantaneous: &SourceGrid) -> Result<()> {
        let expected = instantaneous.axes.shape();
        let found = accumulated.axes.shape();
        if expected != found {
            return Err(ConversionError::ShapeMismatch {
                variable: format!("grid of {}", accumulated.source),
                expected,
                found,
            });
        }

        let (a, b) = (&accumulated.axes, &instantaneous.axes);
        if !axes_match(&a.latitudes, &b.latitudes, self.tolerance) {
            return Err(axis_differs("Latitude", accumulated, instantaneous));
        }
        if !axes_match(&a.longitudes, &b.longitudes, self.tolerance) {
            return Err(axis_differs("Longitude", accumulated, instantaneous));
        }
        if a.times != b.times {
            return Err(axis_differs("Time", accumulated, instantaneous));
        }

        Ok(())
    }
}

impl Default for GridAligner {
    fn default() -> Self {
        Self::new()
    }
}

fn check_shape(axes: &GridAxes, field: &GridField) -> Result<()> {
    let expected = axes.shape();
    if field.shape() != expected.as_slice() {
        return Err(ConversionError::ShapeMismatch {
            variable: field.name().to_string(),
            expected,
            found: field.shape().to_vec(),
        });
    }
    Ok(())
}

fn axis_differs(axis: &str, a: &SourceGrid, b: &SourceGrid) -> ConversionError {
    ConversionError::InputFile(format!(
        "{} axis of {} differs from {}",
        axis, a.source, b.source
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use chrono::{TimeZone, Utc};

    fn axes(n_time: usize, lats: &[f64], lons: &[f64]) -> GridAxes {
        let times = (0..n_time)
            .map(|h| Utc.with_ymd_and_hms(2024, 6, 1, h as u32, 0, 0).unwrap())
            .collect();
        GridAxes::new(times, lats.to_vec(), lons.to_vec())
    }

    fn field(name: &str, shape: &[usize]) -> GridField {
        let len = shape.iter().product();
        GridField::from_dense(name, shape.to_vec(), vec![1.0; len]).unwrap()
    }

    fn accum(axes: GridAxes) -> SourceGrid {
        let shape = axes.shape();
        SourceGrid::new("x_accum.nc", axes)
            .with_field("ssrd", field("ssrd", &shape))
            .with_field("fdir", field("fdir", &shape))
    }

    fn instant(axes: GridAxes) -> SourceGrid {
        let shape = axes.shape();
        SourceGrid::new("x_instant.nc", axes)
            .with_field("t2m", field("t2m", &shape))
            .with_field("u100", field("u100", &shape))
            .with_field("v100", field("v100", &shape))
    }

    #[test]
    fn test_align_matching_pair() {
        let grid = GridAligner::new()
            .align_split(
                accum(axes(2, &[51.0, 52.0], &[7.0, 8.0, 9.0])),
                instant(axes(2, &[51.0, 52.0], &[7.0, 8.0, 9.0])),
            )
            .unwrap();
        assert_eq!(grid.axes.shape(), vec![2, 2, 3]);
        assert_eq!(grid.axes.record_count(), 12);
    }

    #[test]
    fn test_grid_shape_mismatch() {
        let err = GridAligner::new()
            .align_split(
                accum(axes(2, &[51.0, 52.0], &[7.0, 8.0])),
                instant(axes(2, &[51.0, 52.0], &[7.0, 8.0, 9.0])),
            )
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InputFile);
        assert!(matches!(err, ConversionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_time_axis_mismatch() {
        let err = GridAligner::new()
            .align_split(
                accum(axes(3, &[51.0], &[7.0])),
                instant(axes(2, &[51.0], &[7.0])),
            )
            .unwrap_err();
        assert!(matches!(err, ConversionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_latitude_values_differ() {
        let err = GridAligner::new()
            .align_split(
                accum(axes(1, &[51.0, 52.5], &[7.0])),
                instant(axes(1, &[51.0, 52.0], &[7.0])),
            )
            .unwrap_err();
        assert!(err.to_string().contains("Latitude axis"));
    }

    #[test]
    fn test_variable_shape_mismatch() {
        let grid_axes = axes(2, &[51.0], &[7.0, 8.0]);
        let bad = SourceGrid::new("x_accum.nc", grid_axes.clone())
            .with_field("ssrd", field("ssrd", &[2, 1, 2]))
            .with_field("fdir", field("fdir", &[1, 2, 2]));

        let err = GridAligner::new()
            .align_split(bad, instant(grid_axes))
            .unwrap_err();
        match err {
            ConversionError::ShapeMismatch { variable, .. } => assert_eq!(variable, "fdir"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_combined_requires_all_fields() {
        let grid_axes = axes(1, &[51.0], &[7.0]);
        let err = GridAligner::new()
            .align_combined(accum(grid_axes))
            .unwrap_err();
        assert!(matches!(err, ConversionError::MissingVariable { .. }));
    }
}
