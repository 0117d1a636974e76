use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{ConversionError, Result};
use crate::utils::constants::{
    DEFAULT_ACCUMULATION_SECS, DEFAULT_BATCH_SIZE, DEFAULT_DB_HOST, ENV_PREFIX,
};

/// Contents of `config.yaml`.
///
/// Every key may be overridden by a `CDS_PSDM_<KEY>` environment variable,
/// e.g. `CDS_PSDM_DB_PASSWORD`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConverterConfig {
    #[validate(length(min = 1, message = "db_user must not be empty"))]
    pub db_user: String,

    pub db_password: String,

    #[serde(default = "default_db_host")]
    #[validate(length(min = 1, message = "db_host must not be empty"))]
    pub db_host: String,

    #[validate(range(min = 1, message = "db_port must be non-zero"))]
    pub db_port: u16,

    #[validate(length(min = 1, message = "db_name must not be empty"))]
    pub db_name: String,

    #[validate(length(min = 1, message = "input_dir must not be empty"))]
    pub input_dir: String,

    #[validate(length(min = 1, message = "file_name_base must not be empty"))]
    pub file_name_base: String,

    #[serde(default)]
    pub root_dir: Option<PathBuf>,

    #[serde(default = "default_batch_size")]
    #[validate(range(min = 1, max = 9000, message = "batch_size must be between 1 and 9000"))]
    pub batch_size: usize,

    #[serde(default = "default_accumulation_secs")]
    #[validate(range(min = 1, message = "accumulation_interval_secs must be positive"))]
    pub accumulation_interval_secs: u32,

    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_db_host() -> String {
    DEFAULT_DB_HOST.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_accumulation_secs() -> u32 {
    DEFAULT_ACCUMULATION_SECS
}

impl ConverterConfig {
    /// Load, validate and resolve a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConversionError::Config(format!(
                "Configuration file {} not found",
                path.display()
            )));
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ConverterConfig = settings.try_deserialize()?;
        config.validate()?;

        let cwd = std::env::current_dir()?;
        Ok(config.resolve_paths(&cwd))
    }

    /// Apply a command line batch size, re-checking the bounds.
    pub fn with_batch_size(mut self, batch_size: Option<usize>) -> Result<Self> {
        if let Some(size) = batch_size {
            self.batch_size = size;
            self.validate()?;
        }
        Ok(self)
    }

    /// Anchor `root_dir` at `cwd` and relative `input_dir`/`log_file` at `root_dir`.
    pub fn resolve_paths(mut self, cwd: &Path) -> Self {
        let root = match self.root_dir.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        };

        let input_dir = PathBuf::from(&self.input_dir);
        if input_dir.is_relative() {
            self.input_dir = root.join(input_dir).to_string_lossy().into_owned();
        }

        self.log_file = self.log_file.map(|p| if p.is_relative() { root.join(p) } else { p });
        self.root_dir = Some(root);
        self
    }

    pub fn input_dir(&self) -> &Path {
        Path::new(&self.input_dir)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }
}
