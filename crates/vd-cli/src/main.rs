use clap::Parser;

use vd_cli::cli::Cli;
use vd_cli::logging;
use vd_core::services::deploy::Deployer;
use vd_core::services::provisioner::{Provisioner, SystemRunner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let _guard = logging::init(&cli.logging())?;

    let config = cli.load_config()?;
    let request = cli.deploy_request(&config);
    let provisioner = Provisioner::new(SystemRunner).with_venv_tool(cli.venv_tool(&config));
    let deployer = Deployer::new(provisioner);

    let summary = deployer.deploy(&request).await?;
    tracing::info!(
        vassals = summary.vassals.len(),
        available = %summary.available_path.display(),
        enabled = %summary.enabled_path.display(),
        "site_enabled"
    );

    Ok(())
}
