use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::{ConversionError, Result};

/// Offsets beyond this do not fit an `i64` millisecond count.
const MAX_OFFSET_MILLIS: f64 = 9.2e18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStep {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeStep {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeStep::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(TimeStep::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeStep::Hours),
            "days" | "day" | "d" => Some(TimeStep::Days),
            _ => None,
        }
    }

    pub fn as_secs(&self) -> f64 {
        match self {
            TimeStep::Seconds => 1.0,
            TimeStep::Minutes => 60.0,
            TimeStep::Hours => 3600.0,
            TimeStep::Days => 86_400.0,
        }
    }
}

/// CF-convention time encoding, e.g. `seconds since 1970-01-01`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeUnits {
    pub step: TimeStep,
    pub epoch: DateTime<Utc>,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self> {
        let (step, reference) = units
            .split_once(" since ")
            .ok_or_else(|| ConversionError::TimeUnits(units.to_string()))?;

        let step =
            TimeStep::parse(step).ok_or_else(|| ConversionError::TimeUnits(units.to_string()))?;
        let epoch =
            parse_reference(reference).ok_or_else(|| ConversionError::TimeUnits(units.to_string()))?;

        Ok(Self { step, epoch })
    }

    /// Decode a raw time coordinate value into a UTC timestamp.
    pub fn to_datetime(&self, value: f64) -> Result<DateTime<Utc>> {
        if !value.is_finite() {
            return Err(ConversionError::InputFile(format!(
                "Non-finite time coordinate value: {}",
                value
            )));
        }

        let out_of_range =
            || ConversionError::InputFile(format!("Time coordinate {} is out of range", value));

        let millis = (value * self.step.as_secs() * 1000.0).round();
        if millis.abs() >= MAX_OFFSET_MILLIS {
            return Err(out_of_range());
        }

        Duration::try_milliseconds(millis as i64)
            .and_then(|offset| self.epoch.checked_add_signed(offset))
            .ok_or_else(out_of_range)
    }

    pub fn decode_all(&self, values: &[f64]) -> Result<Vec<DateTime<Utc>>> {
        values.iter().map(|v| self.to_datetime(*v)).collect()
    }
}

fn parse_reference(reference: &str) -> Option<DateTime<Utc>> {
    let cleaned = reference
        .trim()
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim()
        .replace('T', " ");

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
