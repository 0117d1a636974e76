pub mod conversion_pipeline;
pub mod conversion_report;
pub mod grid_aligner;
pub mod grid_mapper;

pub use conversion_pipeline::ConversionPipeline;
pub use conversion_report::ConversionReport;
pub use grid_aligner::{AlignedGrid, GridAligner};
pub use grid_mapper::GridMapper;
