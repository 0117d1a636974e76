use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Wall-clock timing for one pipeline stage.
pub struct StageTimer {
    description: &'static str,
    start: Instant,
}

impl StageTimer {
    pub fn start(description: &'static str) -> Self {
        debug!(stage = description, "stage started");
        Self {
            description,
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        info!(
            stage = self.description,
            elapsed_secs = elapsed.as_secs_f64(),
            "{} completed in {:.2} seconds",
            self.description,
            elapsed.as_secs_f64()
        );
        elapsed
    }
}
