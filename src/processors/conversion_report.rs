use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::models::WeatherRecord;

/// Counts gathered while mapping and writing one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub time_steps: usize,
    pub grid_cells: usize,
    pub coordinates_written: u64,
    pub records_mapped: usize,
    pub records_written: u64,
    pub incomplete_records: usize,
    pub missing_by_field: BTreeMap<&'static str, usize>,
    pub first_time: Option<DateTime<Utc>>,
    pub last_time: Option<DateTime<Utc>>,
}

impl ConversionReport {
    pub fn new(time_steps: usize, grid_cells: usize) -> Self {
        Self {
            time_steps,
            grid_cells,
            ..Self::default()
        }
    }

    pub fn expected_records(&self) -> usize {
        self.time_steps * self.grid_cells
    }

    pub fn record(&mut self, record: &WeatherRecord) {
        self.records_mapped += 1;

        let missing = record.missing_fields();
        if !missing.is_empty() {
            self.incomplete_records += 1;
        }
        for field in missing {
            *self.missing_by_field.entry(field).or_default() += 1;
        }

        self.first_time = Some(self.first_time.map_or(record.time, |t| t.min(record.time)));
        self.last_time = Some(self.last_time.map_or(record.time, |t| t.max(record.time)));
    }

    pub fn is_complete(&self) -> bool {
        self.records_mapped == self.expected_records()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Conversion Summary\n");
        summary.push_str("==================\n");
        summary.push_str(&format!("Time steps: {}\n", self.time_steps));
        summary.push_str(&format!("Grid cells: {}\n", self.grid_cells));

        if let (Some(first), Some(last)) = (self.first_time, self.last_time) {
            summary.push_str(&format!(
                "Period: {} to {}\n",
                first.format("%Y-%m-%dT%H:%M:%SZ"),
                last.format("%Y-%m-%dT%H:%M:%SZ")
            ));
        }

        summary.push_str(&format!("Coordinates inserted: {}\n", self.coordinates_written));
        summary.push_str(&format!(
            "Records mapped: {} (expected {})\n",
            self.records_mapped,
            self.expected_records()
        ));
        summary.push_str(&format!("Records written: {}\n", self.records_written));

        if self.incomplete_records > 0 {
            summary.push_str(&format!(
                "\nRecords with null values: {}\n",
                self.incomplete_records
            ));
            for (field, count) in &self.missing_by_field {
                summary.push_str(&format!("  {}: {}\n", field, count));
            }
        }

        summary
    }
}
