/// Input file name suffixes
pub const ACCUM_FILE_SUFFIX: &str = "_accum.nc";
pub const INSTANT_FILE_SUFFIX: &str = "_instant.nc";
pub const COMBINED_FILE_SUFFIX: &str = ".nc";

/// Coordinate variable names, in lookup order
pub const TIME_VARIABLES: &[&str] = &["valid_time", "time"];
pub const LATITUDE_VARIABLES: &[&str] = &["latitude", "lat"];
pub const LONGITUDE_VARIABLES: &[&str] = &["longitude", "lon"];

/// Accumulated CDS variables (J/m²)
pub const SSRD_VARIABLES: &[&str] = &["ssrd"];
pub const FDIR_VARIABLES: &[&str] = &["fdir"];

/// Instantaneous CDS variables
pub const T2M_VARIABLES: &[&str] = &["t2m", "2t"];
pub const U100_VARIABLES: &[&str] = &["u100", "100u"];
pub const V100_VARIABLES: &[&str] = &["v100", "100v"];

/// PSDM table names
pub const COORDINATE_TABLE: &str = "coordinate";
pub const WEATHER_TABLE: &str = "weathervalue";

/// Processing defaults
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const MAX_BATCH_SIZE: usize = 9000;
pub const DEFAULT_ACCUMULATION_SECS: u32 = 3600;
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const ENV_PREFIX: &str = "CDS_PSDM";

/// Axis values closer than this are considered identical
pub const AXIS_TOLERANCE: f64 = 1e-6;

/// WGS84 spatial reference id used for the coordinate column
pub const WGS84_SRID: i32 = 4326;
