use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Broad class of a fatal error, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    InputFile,
    Database,
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file error: {0}")]
    InputFile(String),

    #[error("netCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Missing variable '{name}' in {file}")]
    MissingVariable { name: String, file: String },

    #[error("Grid shape mismatch for '{variable}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        variable: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Invalid time units '{0}'")]
    TimeUnits(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(
        "Coordinate {id} is stored at ({stored_latitude}, {stored_longitude}) \
         but this grid places it at ({latitude}, {longitude})"
    )]
    CoordinateConflict {
        id: i32,
        stored_latitude: f64,
        stored_longitude: f64,
        latitude: f64,
        longitude: f64,
    },
}

impl ConversionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConversionError::Config(_)
            | ConversionError::ConfigSource(_)
            | ConversionError::Validation(_) => ErrorCategory::Config,
            ConversionError::Io(_)
            | ConversionError::InputFile(_)
            | ConversionError::NetCdf(_)
            | ConversionError::MissingVariable { .. }
            | ConversionError::ShapeMismatch { .. }
            | ConversionError::TimeUnits(_) => ErrorCategory::InputFile,
            ConversionError::Database(_) | ConversionError::CoordinateConflict { .. } => {
                ErrorCategory::Database
            }
        }
    }
}
