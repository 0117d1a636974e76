pub mod coordinate;
pub mod grid;
pub mod weather;

pub use coordinate::{Coordinate, CoordinateGrid};
pub use grid::{AccumulatedFields, GridAxes, GridField, InstantaneousFields, SourceGrid};
pub use weather::{WeatherRecord, PSDM_COLUMNS};
