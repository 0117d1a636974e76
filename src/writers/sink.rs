use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Coordinate, WeatherRecord};

/// Destination for converted weather data.
///
/// Writes must be idempotent on the natural keys: coordinate `id` and
/// weather `(time, coordinate_id)`. Coordinates are never moved.
#[async_trait]
pub trait WeatherSink: Send {
    /// Create whatever the destination needs before the first write.
    async fn prepare(&mut self) -> Result<()>;

    /// Insert unseen coordinates, returning how many were new. An id already
    /// stored at a different location is a `CoordinateConflict`.
    async fn write_coordinates(&mut self, coordinates: &[Coordinate]) -> Result<u64>;

    /// Upsert one batch, returning the number of rows affected.
    async fn write_records(&mut self, records: &[WeatherRecord]) -> Result<u64>;

    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
