pub mod constants;
pub mod coordinates;
pub mod logging;
pub mod progress;
pub mod time;
pub mod timer;
pub mod units;

pub use constants::*;
pub use coordinates::{axes_match, normalize_longitude, validate_coordinates};
pub use logging::init_logging;
pub use progress::ProgressReporter;
pub use time::{TimeStep, TimeUnits};
pub use timer::StageTimer;
pub use units::{accumulated_to_irradiance, diffuse_irradiance, direct_irradiance};
