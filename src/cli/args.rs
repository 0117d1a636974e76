use clap::Parser;
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "cds-psdm-weather")]
#[command(about = "Convert CDS netCDF weather data into PSDM weather tables")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, help = "YAML configuration file")]
    pub config: PathBuf,

    #[arg(long, help = "Records per database batch (1-9000), overrides the config file")]
    pub batch_size: Option<usize>,

    #[arg(long, help = "Read and map the input without touching the database")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, help = "Log file path, overrides the config file")]
    pub log_file: Option<PathBuf>,
}
