use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Coordinate, WeatherRecord};
use crate::writers::WeatherSink;

/// In-process sink with upsert semantics, used for dry runs.
pub struct MemorySink {
    retain_records: bool,
    prepared: bool,
    finished: bool,
    batches: usize,
    records_received: u64,
    coordinates: BTreeMap<i32, Coordinate>,
    records: BTreeMap<(DateTime<Utc>, i32), WeatherRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            retain_records: true,
            prepared: false,
            finished: false,
            batches: 0,
            records_received: 0,
            coordinates: BTreeMap::new(),
            records: BTreeMap::new(),
        }
    }

    /// Count what arrives without keeping the records.
    pub fn counting() -> Self {
        Self {
            retain_records: false,
            ..Self::new()
        }
    }

    pub fn records_received(&self) -> u64 {
        self.records_received
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Distinct rows currently stored
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn coordinate_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn get(&self, time: DateTime<Utc>, coordinate_id: i32) -> Option<&WeatherRecord> {
        self.records.get(&(time, coordinate_id))
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherSink for MemorySink {
    async fn prepare(&mut self) -> Result<()> {
        self.prepared = true;
        Ok(())
    }

    async fn write_coordinates(&mut self, coordinates: &[Coordinate]) -> Result<u64> {
        for coordinate in coordinates {
            if let Some(stored) = self.coordinates.get(&coordinate.id) {
                coordinate.ensure_same_location(stored.latitude, stored.longitude)?;
            }
        }

        let mut inserted = 0;
        for coordinate in coordinates {
            if !self.coordinates.contains_key(&coordinate.id) {
                self.coordinates.insert(coordinate.id, coordinate.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn write_records(&mut self, records: &[WeatherRecord]) -> Result<u64> {
        self.batches += 1;
        self.records_received += records.len() as u64;
        if self.retain_records {
            for record in records {
                self.records.insert(record.key(), record.clone());
            }
        }
        Ok(records.len() as u64)
    }

    async fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
