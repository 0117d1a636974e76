use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::CoordinateGrid;
use crate::processors::{AlignedGrid, ConversionReport, GridAligner, GridMapper};
use crate::readers::{
    locate_inputs, InputLayout, NetCdfReader, ACCUMULATED_VARIABLES, INSTANTANEOUS_VARIABLES,
};
use crate::settings::ConverterConfig;
use crate::utils::constants::{DEFAULT_ACCUMULATION_SECS, DEFAULT_BATCH_SIZE};
use crate::utils::progress::ProgressReporter;
use crate::utils::timer::StageTimer;
use crate::writers::WeatherSink;

/// Locate, read, align, map and write one CDS download.
pub struct ConversionPipeline {
    input_dir: PathBuf,
    file_name_base: String,
    batch_size: usize,
    accumulation_interval_secs: u32,
}

impl ConversionPipeline {
    pub fn new(input_dir: impl Into<PathBuf>, file_name_base: impl Into<String>) -> Self {
        Self {
            input_dir: input_dir.into(),
            file_name_base: file_name_base.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            accumulation_interval_secs: DEFAULT_ACCUMULATION_SECS,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.input_dir(), config.file_name_base.clone())
            .with_batch_size(config.batch_size)
            .with_accumulation_interval(config.accumulation_interval_secs)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_accumulation_interval(mut self, secs: u32) -> Self {
        self.accumulation_interval_secs = secs;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Read and align the input files. Touches no database.
    pub fn load(&self) -> Result<AlignedGrid> {
        let layout = locate_inputs(&self.input_dir, &self.file_name_base)?;
        info!(files = ?layout.paths(), "Found input files");

        let reader = NetCdfReader::new();
        let aligner = GridAligner::new();

        let timer = StageTimer::start("Loading netCDF files");
        let grid = match layout {
            InputLayout::Split {
                accumulated,
                instantaneous,
            } => {
                let accumulated = reader.read(&accumulated, ACCUMULATED_VARIABLES)?;
                let instantaneous = reader.read(&instantaneous, INSTANTANEOUS_VARIABLES)?;
                aligner.align_split(accumulated, instantaneous)?
            }
            InputLayout::Combined(path) => {
                let variables: Vec<_> = ACCUMULATED_VARIABLES
                    .iter()
                    .chain(INSTANTANEOUS_VARIABLES)
                    .copied()
                    .collect();
                aligner.align_combined(reader.read(&path, &variables)?)?
            }
        };
        timer.finish();

        info!(
            time_steps = grid.axes.times.len(),
            latitudes = grid.axes.latitudes.len(),
            longitudes = grid.axes.longitudes.len(),
            "Input grid loaded"
        );

        Ok(grid)
    }

    /// Load the inputs, then write them to `sink`.
    pub async fn run<S: WeatherSink>(
        &self,
        sink: &mut S,
        progress: Option<&ProgressReporter>,
    ) -> Result<ConversionReport> {
        let grid = self.load()?;
        self.write(&grid, sink, progress).await
    }

    /// Write an aligned grid: schema, coordinates, then weather batches.
    pub async fn write<S: WeatherSink>(
        &self,
        grid: &AlignedGrid,
        sink: &mut S,
        progress: Option<&ProgressReporter>,
    ) -> Result<ConversionReport> {
        let coordinates = CoordinateGrid::from_axes(&grid.axes.latitudes, &grid.axes.longitudes)?;
        if coordinates.is_empty() || grid.axes.times.is_empty() {
            warn!("Input grid is empty, no weather records will be written");
        }
        let mapper = GridMapper::new(grid, &coordinates, self.accumulation_interval_secs)?;
        let mut report = ConversionReport::new(mapper.time_steps(), coordinates.len());

        let timer = StageTimer::start("Database initialization");
        sink.prepare().await?;
        timer.finish();

        let timer = StageTimer::start("Creating coordinates");
        report.coordinates_written = sink.write_coordinates(coordinates.coordinates()).await?;
        timer.finish();

        if let Some(p) = progress {
            p.set_message(&format!(
                "Converting {} time steps of {} cells...",
                mapper.time_steps(),
                coordinates.len()
            ));
        }

        let timer = StageTimer::start("Converting weather data");
        let mut batch = Vec::with_capacity(self.batch_size);
        for time_idx in 0..mapper.time_steps() {
            for record in mapper.records_for_time(time_idx) {
                report.record(&record);
                batch.push(record);

                if batch.len() >= self.batch_size {
                    report.records_written += sink.write_records(&batch).await?;
                    batch.clear();
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if !batch.is_empty() {
            report.records_written += sink.write_records(&batch).await?;
        }
        timer.finish();

        sink.finish().await?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Converted {} records", report.records_mapped));
        }

        Ok(report)
    }
}
