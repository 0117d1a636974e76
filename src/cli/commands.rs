use std::io::IsTerminal;
use tracing::{error, info};

use crate::cli::args::Cli;
use crate::error::Result;
use crate::processors::{ConversionPipeline, ConversionReport};
use crate::settings::ConverterConfig;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{MemorySink, PostgresWriter};

pub async fn run(cli: Cli) -> Result<ConversionReport> {
    let config = ConverterConfig::load(&cli.config)?.with_batch_size(cli.batch_size)?;

    let log_file = cli.log_file.as_deref().or(config.log_file.as_deref());
    init_logging(cli.verbose, log_file)?;

    let result = convert(&config, cli.dry_run).await;
    if let Err(e) = &result {
        error!(category = ?e.category(), "{}", e);
    }
    result
}

async fn convert(config: &ConverterConfig, dry_run: bool) -> Result<ConversionReport> {
    info!(
        input_dir = %config.input_dir().display(),
        file_name_base = %config.file_name_base,
        batch_size = config.batch_size,
        dry_run,
        "Starting conversion"
    );

    let pipeline = ConversionPipeline::from_config(config);

    // Every input check happens here, before any database connection.
    let grid = pipeline.load()?;

    let silent = !std::io::stderr().is_terminal();
    let progress = ProgressReporter::new(
        grid.axes.times.len() as u64,
        "Converting weather data...",
        silent,
    );

    let report = if dry_run {
        let mut sink = MemorySink::counting();
        let report = pipeline.write(&grid, &mut sink, Some(&progress)).await?;
        println!("Dry run complete - no database writes performed");
        report
    } else {
        info!(
            host = %config.db_host,
            port = config.db_port,
            database = %config.db_name,
            "Connecting to PostgreSQL"
        );
        let mut writer = PostgresWriter::connect(config.connect_options()).await?;
        let report = pipeline.write(&grid, &mut writer, Some(&progress)).await?;
        writer.close().await;
        report
    };

    println!("\n{}", report.summary());
    Ok(report)
}
