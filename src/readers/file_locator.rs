use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConversionError, Result};
use crate::utils::constants::{ACCUM_FILE_SUFFIX, COMBINED_FILE_SUFFIX, INSTANT_FILE_SUFFIX};

/// How the CDS download for one `file_name_base` is laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLayout {
    /// `<base>_accum.nc` and `<base>_instant.nc`
    Split {
        accumulated: PathBuf,
        instantaneous: PathBuf,
    },
    /// `<base>.nc` holding both variable groups
    Combined(PathBuf),
}

impl InputLayout {
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            InputLayout::Split {
                accumulated,
                instantaneous,
            } => vec![accumulated.as_path(), instantaneous.as_path()],
            InputLayout::Combined(path) => vec![path.as_path()],
        }
    }
}

/// Find the input files, preferring the split accum/instant pair.
pub fn locate_inputs(input_dir: &Path, file_name_base: &str) -> Result<InputLayout> {
    if !input_dir.is_dir() {
        return Err(ConversionError::InputFile(format!(
            "Input directory {} does not exist",
            input_dir.display()
        )));
    }

    let accumulated = input_dir.join(format!("{}{}", file_name_base, ACCUM_FILE_SUFFIX));
    let instantaneous = input_dir.join(format!("{}{}", file_name_base, INSTANT_FILE_SUFFIX));
    let combined = input_dir.join(format!("{}{}", file_name_base, COMBINED_FILE_SUFFIX));

    debug!(
        accumulated = %accumulated.display(),
        instantaneous = %instantaneous.display(),
        combined = %combined.display(),
        "Looking for input files"
    );

    match (accumulated.is_file(), instantaneous.is_file()) {
        (true, true) => Ok(InputLayout::Split {
            accumulated,
            instantaneous,
        }),
        _ if combined.is_file() => Ok(InputLayout::Combined(combined)),
        (true, false) => Err(ConversionError::InputFile(format!(
            "Found {} but its companion {} is missing",
            accumulated.display(),
            instantaneous.display()
        ))),
        (false, true) => Err(ConversionError::InputFile(format!(
            "Found {} but its companion {} is missing",
            instantaneous.display(),
            accumulated.display()
        ))),
        (false, false) => Err(ConversionError::InputFile(format!(
            "No weather data files found for base name '{}' in {}. \
             Expected {}{} and {}{}, or {}{}",
            file_name_base,
            input_dir.display(),
            file_name_base,
            ACCUM_FILE_SUFFIX,
            file_name_base,
            INSTANT_FILE_SUFFIX,
            file_name_base,
            COMBINED_FILE_SUFFIX
        ))),
    }
}
