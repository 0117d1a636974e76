use anyhow::Context;
use cds_psdm_weather::cli::{run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    run(cli)
        .await
        .with_context(|| format!("Conversion failed (config {})", config_path.display()))?;
    Ok(())
}
